//! HTTP handlers for the voxel relay.

pub mod generate;
pub mod health;
pub mod metrics;
