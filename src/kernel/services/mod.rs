//! Services layer (ports + adapters).
//!
//! - `ports`: collaborator contracts and event payloads (kernel-facing).
//! - `adapters`: headless implementations and the settings loader.

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{kernel_bus, EmitContext, KernelBusReceiver, KernelBusSender, KernelMessage};
