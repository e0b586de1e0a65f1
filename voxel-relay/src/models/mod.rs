//! Request and payload models for the voxel relay.

pub mod generate;
pub mod voxel;

pub use generate::GenerateRequest;
pub use voxel::Voxel;
