use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

/// Classification labels used to filter which entities a magnet may dock with.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags(pub SmallVec<[String; 2]>);

impl Tags {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// True if at least one of `wanted` is carried.
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        wanted.iter().any(|w| self.has_tag(w))
    }
}
