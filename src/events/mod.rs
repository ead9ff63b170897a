//! Event types exchanged across systems.
//!
//! Submodules:
//! - [`dock`] – dock/undock notifications written by the connector and read by
//!   the visual state sync
pub mod dock;
