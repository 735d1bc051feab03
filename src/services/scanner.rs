//! Single-flight scan gate
//!
//! At most one scan is in flight. A ticket taken from an idle gate moves it
//! to `AwaitingCooldown`; dropping the ticket once the decision is rendered
//! starts the cooldown, after which the gate returns to `Idle`. `resume`
//! forces the gate back to `Idle` at any time.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Idle,
    AwaitingCooldown,
}

#[derive(Debug)]
struct GateInner {
    state: ScanState,
    /// Bumped on every transition out of `Idle` and on resume, so a stale
    /// cooldown timer cannot release a newer scan.
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct ScanGate {
    inner: Arc<Mutex<GateInner>>,
    cooldown: Duration,
}

/// Proof that the holder owns the in-flight slot
#[derive(Debug)]
pub struct ScanTicket {
    gate: ScanGate,
    generation: u64,
}

impl ScanGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GateInner {
                state: ScanState::Idle,
                generation: 0,
            })),
            cooldown,
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> ScanState {
        self.lock().state
    }

    /// Take the in-flight slot, or `None` while another scan holds it or
    /// the cooldown is running.
    pub fn try_begin(&self) -> Option<ScanTicket> {
        let mut inner = self.lock();
        if inner.state != ScanState::Idle {
            return None;
        }
        inner.state = ScanState::AwaitingCooldown;
        inner.generation += 1;
        Some(ScanTicket {
            gate: self.clone(),
            generation: inner.generation,
        })
    }

    /// Force the gate back to `Idle` (app returned to the foreground)
    pub fn resume(&self) {
        let mut inner = self.lock();
        if inner.state != ScanState::Idle {
            tracing::debug!("Scan lock released by resume");
        }
        inner.state = ScanState::Idle;
        inner.generation += 1;
    }

    fn release(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation == generation && inner.state == ScanState::AwaitingCooldown {
            inner.state = ScanState::Idle;
        }
    }
}

impl Drop for ScanTicket {
    fn drop(&mut self) {
        let gate = self.gate.clone();
        let generation = self.generation;

        if gate.cooldown.is_zero() {
            gate.release(generation);
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(gate.cooldown).await;
                    gate.release(generation);
                });
            }
            // No runtime to time the cooldown on
            Err(_) => gate.release(generation),
        }
    }
}
