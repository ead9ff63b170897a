//! ECS resources made available to systems.
//!
//! Overview
//! - `joints` – owner of every weld joint, keyed by joint id
//! - `magnetconfig` – magnet defaults and force tuning, loadable from INI
//! - `spatialgrid` – uniform hash grid answering range queries
//! - `worldtime` – simulation time and delta
pub mod joints;
pub mod magnetconfig;
pub mod spatialgrid;
pub mod worldtime;
