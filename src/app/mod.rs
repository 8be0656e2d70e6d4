//! Application layer: runs kernel effects against the live collaborators.

pub mod engine;

pub use engine::SyncEngine;
