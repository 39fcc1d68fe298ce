//! Resource loading seam.
//!
//! Defenders and attackers only enter the registry once their visual has
//! been materialized. The engine issues a [`LoadRequest`] per creation and
//! drains [`LoadCompletion`]s at the top of every tick. Completion order is
//! up to the loader and need not match request order.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use rampart_core::enums::DefenderKind;
use rampart_core::error::LoadError;
use rampart_core::types::VisualHandle;

/// Identifies one outstanding load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

/// What is being loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Defender(DefenderKind),
    Attacker,
}

impl AssetKind {
    pub fn path(self) -> String {
        match self {
            AssetKind::Defender(kind) => format!("models/defenders/{}.glb", kind.asset_name()),
            AssetKind::Attacker => "models/attackers/drone.glb".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub asset: AssetKind,
    pub path: String,
}

impl LoadRequest {
    pub fn new(ticket: LoadTicket, asset: AssetKind) -> Self {
        Self {
            ticket,
            asset,
            path: asset.path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadCompletion {
    pub ticket: LoadTicket,
    pub result: Result<VisualHandle, LoadError>,
}

/// Asynchronous resource loader consumed by the engine.
///
/// `request` must not block. `drain_completed` appends every completion that
/// is ready, in whatever order the loader finished them.
pub trait ResourceLoader: Send {
    fn request(&mut self, request: LoadRequest);
    fn drain_completed(&mut self, out: &mut Vec<LoadCompletion>);
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Box<L> {
    fn request(&mut self, request: LoadRequest) {
        (**self).request(request);
    }

    fn drain_completed(&mut self, out: &mut Vec<LoadCompletion>) {
        (**self).drain_completed(out);
    }
}

// --- Instant ---

/// Completes every request successfully on the next drain, in request order.
#[derive(Debug, Default)]
pub struct InstantLoader {
    queue: VecDeque<LoadRequest>,
    next_visual: u64,
}

impl InstantLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceLoader for InstantLoader {
    fn request(&mut self, request: LoadRequest) {
        self.queue.push_back(request);
    }

    fn drain_completed(&mut self, out: &mut Vec<LoadCompletion>) {
        for request in self.queue.drain(..) {
            self.next_visual += 1;
            out.push(LoadCompletion {
                ticket: request.ticket,
                result: Ok(VisualHandle(self.next_visual)),
            });
        }
    }
}

// --- Manual ---

#[derive(Debug, Default)]
struct ManualState {
    outstanding: Vec<LoadRequest>,
    ready: VecDeque<LoadCompletion>,
    next_visual: u64,
}

/// Loader whose completions are driven by a [`ManualLoaderHandle`]. Used by
/// tests and by drivers that load assets on another thread.
#[derive(Debug, Default)]
pub struct ManualLoader {
    state: Arc<Mutex<ManualState>>,
}

/// Controls a [`ManualLoader`] from outside the engine.
#[derive(Debug, Clone)]
pub struct ManualLoaderHandle {
    state: Arc<Mutex<ManualState>>,
}

fn lock(state: &Mutex<ManualState>) -> MutexGuard<'_, ManualState> {
    // A panic while holding the lock leaves plain data behind; keep going.
    state.lock().unwrap_or_else(|e| e.into_inner())
}

impl ManualLoader {
    pub fn new() -> (Self, ManualLoaderHandle) {
        let loader = Self::default();
        let handle = ManualLoaderHandle {
            state: Arc::clone(&loader.state),
        };
        (loader, handle)
    }
}

impl ResourceLoader for ManualLoader {
    fn request(&mut self, request: LoadRequest) {
        lock(&self.state).outstanding.push(request);
    }

    fn drain_completed(&mut self, out: &mut Vec<LoadCompletion>) {
        out.extend(lock(&self.state).ready.drain(..));
    }
}

impl ManualLoaderHandle {
    /// Requests not yet completed or failed, in request order.
    pub fn requests(&self) -> Vec<LoadRequest> {
        lock(&self.state).outstanding.clone()
    }

    /// Finish `ticket` successfully. `false` if it is not outstanding.
    pub fn complete(&self, ticket: LoadTicket) -> bool {
        let mut state = lock(&self.state);
        if !take_outstanding(&mut state, ticket) {
            return false;
        }
        state.next_visual += 1;
        let visual = VisualHandle(state.next_visual);
        state.ready.push_back(LoadCompletion {
            ticket,
            result: Ok(visual),
        });
        true
    }

    /// Fail `ticket`. `false` if it is not outstanding.
    pub fn fail(&self, ticket: LoadTicket, reason: &str) -> bool {
        let mut state = lock(&self.state);
        let Some(index) = state.outstanding.iter().position(|r| r.ticket == ticket) else {
            return false;
        };
        let request = state.outstanding.remove(index);
        state.ready.push_back(LoadCompletion {
            ticket,
            result: Err(LoadError::LoadFailed {
                path: request.path,
                reason: reason.to_string(),
            }),
        });
        true
    }

    /// Finish every outstanding request in request order. Returns how many.
    pub fn complete_all(&self) -> usize {
        let tickets: Vec<LoadTicket> = self.requests().iter().map(|r| r.ticket).collect();
        tickets.into_iter().filter(|&t| self.complete(t)).count()
    }
}

fn take_outstanding(state: &mut ManualState, ticket: LoadTicket) -> bool {
    match state.outstanding.iter().position(|r| r.ticket == ticket) {
        Some(index) => {
            state.outstanding.remove(index);
            true
        }
        None => false,
    }
}

// --- Retry policy ---

/// Re-requests failed loads from the inner loader until `max_attempts` have
/// been made, then surfaces the failure. The engine itself never retries.
#[derive(Debug)]
pub struct Retrying<L> {
    inner: L,
    max_attempts: u32,
    attempts: HashMap<LoadTicket, (LoadRequest, u32)>,
    scratch: Vec<LoadCompletion>,
}

impl<L: ResourceLoader> Retrying<L> {
    pub fn new(inner: L, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            attempts: HashMap::new(),
            scratch: Vec::new(),
        }
    }
}

impl<L: ResourceLoader> ResourceLoader for Retrying<L> {
    fn request(&mut self, request: LoadRequest) {
        self.attempts.insert(request.ticket, (request.clone(), 1));
        self.inner.request(request);
    }

    fn drain_completed(&mut self, out: &mut Vec<LoadCompletion>) {
        self.inner.drain_completed(&mut self.scratch);
        for completion in self.scratch.drain(..) {
            if completion.result.is_err() {
                if let Some((request, attempts)) = self.attempts.get_mut(&completion.ticket) {
                    if *attempts < self.max_attempts {
                        *attempts += 1;
                        debug!(
                            ticket = completion.ticket.0,
                            path = %request.path,
                            attempt = *attempts,
                            "retrying failed load"
                        );
                        self.inner.request(request.clone());
                        continue;
                    }
                }
            }
            self.attempts.remove(&completion.ticket);
            out.push(completion);
        }
    }
}
