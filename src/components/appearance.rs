//! Per-entity appearance data consumed by the rendering layer.
//!
//! Gameplay systems write small enumerated values keyed by a visual layer;
//! a renderer (not part of this crate) maps them to sprites. The docking
//! visuals only ever write [`DockingVisualState`] into the
//! [`VisualLayer::Base`] and [`VisualLayer::Lights`] layers.

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualLayer {
    Base,
    Lights,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DockingVisualState {
    Docked,
    Undocked,
}

#[derive(Component, Clone, Debug, Default)]
pub struct Appearance {
    pub data: FxHashMap<VisualLayer, DockingVisualState>,
}

impl Appearance {
    /// Set a layer's value. Returns true if the stored value changed.
    pub fn set_data(&mut self, layer: VisualLayer, state: DockingVisualState) -> bool {
        self.data.insert(layer, state) != Some(state)
    }

    pub fn get_data(&self, layer: VisualLayer) -> Option<DockingVisualState> {
        self.data.get(&layer).copied()
    }
}
