//! blocksync - keeps a visual block-editing surface coherent with a runtime.
//!
//! Module layout:
//! - kernel: headless core (state/action/effect, toolbox, metrics, prompt)
//! - kernel::services: collaborator ports, event bus, headless adapters
//! - app: the synchronization engine that runs kernel effects against the collaborators
//! - replay: scripted replay of runtime/surface events (used by the CLI)

pub mod app;
pub mod kernel;
pub mod replay;
