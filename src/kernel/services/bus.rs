use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::ports::{RuntimeEvent, SurfaceEvent, TargetInfo};

/// Runtime state as it was when an event was emitted, not when the engine gets to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitContext {
    pub editing_target: Option<TargetInfo>,
    pub dynamic_blocks_xml: String,
}

#[derive(Debug)]
pub enum KernelMessage {
    Runtime {
        event: RuntimeEvent,
        context: EmitContext,
    },
    Surface(SurfaceEvent),
}

#[derive(Clone, Debug)]
pub struct KernelBusSender {
    tx: Sender<KernelMessage>,
}

pub struct KernelBusReceiver {
    rx: Receiver<KernelMessage>,
}

pub fn kernel_bus() -> (KernelBusSender, KernelBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (KernelBusSender { tx }, KernelBusReceiver { rx })
}

impl KernelBusSender {
    pub fn send(&self, msg: KernelMessage) -> Result<(), mpsc::SendError<KernelMessage>> {
        self.tx.send(msg)
    }

    pub fn send_runtime(
        &self,
        event: RuntimeEvent,
        context: EmitContext,
    ) -> Result<(), mpsc::SendError<KernelMessage>> {
        self.send(KernelMessage::Runtime { event, context })
    }

    pub fn send_surface(&self, event: SurfaceEvent) -> Result<(), mpsc::SendError<KernelMessage>> {
        self.send(KernelMessage::Surface(event))
    }
}

impl KernelBusReceiver {
    pub fn try_recv(&mut self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }
}
