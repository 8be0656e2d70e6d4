use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use super::SyncEngine;
use crate::kernel::error::Result;
use crate::kernel::services::ports::{EditorSurface, Runtime};
use crate::kernel::Action;

const MAX_BUS_DRAIN_PER_TICK: usize = 4096;

impl<R: Runtime, S: EditorSurface> SyncEngine<R, S> {
    /// Drains the bus, then delivers a settled targets update once its window has elapsed.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        let mut changed = self.pump(now)? > 0;
        changed |= self.poll_targets_debounce(now)?;
        Ok(changed)
    }

    /// Handles queued collaborator events in arrival order; returns how many were handled.
    pub fn pump(&mut self, now: Instant) -> Result<usize> {
        let mut handled = 0usize;
        while handled < MAX_BUS_DRAIN_PER_TICK {
            match self.rx.try_recv() {
                Ok(msg) => {
                    handled += 1;
                    self.handle_message(msg, now)?;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(handled)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.store.state().pending_targets.deadline()
    }

    fn poll_targets_debounce(&mut self, now: Instant) -> Result<bool> {
        let Some(deadline) = self.next_deadline() else {
            return Ok(false);
        };
        if now < deadline {
            return Ok(false);
        }

        let overshoot = now.duration_since(deadline);
        if overshoot.as_millis() > 5 {
            tracing::debug!(
                overshoot_ms = overshoot.as_millis() as u64,
                "targets update debounce overshoot"
            );
        }

        self.dispatch_kernel(Action::Tick { now })
    }
}
