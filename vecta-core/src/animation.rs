//! Animation Driver
//!
//! Cooperative, frame-driven animation of a single scalar node.
//!
//! The host owns a frame service (the [`FrameScheduler`] boundary): the
//! driver asks it for the next frame, and the host later calls
//! [`AnimationDriver::on_frame`] with that frame's handle. Every tick writes
//! `(θ + step) mod 2π` into the target with one `set_value`, which runs a
//! full propagation.
//!
//! # Cancellation
//!
//! `stop` clears the running flag and cancels the scheduled frame. A frame
//! that was already in flight when `stop` ran carries a handle the driver no
//! longer expects, so it is ignored and nothing is written.
//!
//! [`FrameQueue`] is an in-process frame service, and [`run_frames`] pumps a
//! shared [`FrameTarget`] from a tokio interval.

use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexSet;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use crate::error::{GraphError, UpdateError};
use crate::graph::{Graph, NodeId};

/// Opaque identifier of one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// A service that calls back once per frame until cancelled.
pub trait FrameScheduler {
    /// Ask for one callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Unknown or already-delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame requests waiting for the host's next frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    pending: IndexSet<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every request due on this frame, oldest first.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.shift_remove(&handle);
    }
}

/// Advances a scalar node by a fixed step on every frame while running.
#[derive(Debug)]
pub struct AnimationDriver {
    target: NodeId,
    step: f64,
    running: bool,
    scheduled: Option<FrameHandle>,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(target: NodeId, step: f64) -> Self {
        Self {
            target,
            step,
            running: false,
            scheduled: None,
            ticks: 0,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of ticks that wrote into the target.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start animating. Returns false if already running.
    pub fn start(&mut self, frames: &mut dyn FrameScheduler) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.scheduled = Some(frames.request_frame());
        info!(target_node = ?self.target, step = self.step, "animation started");
        true
    }

    /// Stop animating. Returns false if already stopped.
    pub fn stop(&mut self, frames: &mut dyn FrameScheduler) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        if let Some(handle) = self.scheduled.take() {
            frames.cancel_frame(handle);
        }
        info!(target_node = ?self.target, ticks = self.ticks, "animation stopped");
        true
    }

    /// Flip between running and stopped. Returns the new running state.
    pub fn toggle(&mut self, frames: &mut dyn FrameScheduler) -> bool {
        if self.running {
            self.stop(frames);
        } else {
            self.start(frames);
        }
        self.running
    }

    /// Handle a delivered frame.
    ///
    /// Returns `Ok(true)` if the target was advanced. Frames delivered after
    /// `stop`, or carrying a handle other than the scheduled one, are ignored.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        graph: &mut Graph,
        frames: &mut dyn FrameScheduler,
    ) -> Result<bool, GraphError> {
        if !self.running || self.scheduled != Some(handle) {
            trace!(frame = ?handle, "ignoring stale frame");
            return Ok(false);
        }
        self.scheduled = None;

        let advanced = self.advance(graph);
        if let Err(err) = advanced {
            self.running = false;
            return Err(err);
        }

        self.ticks += 1;
        self.scheduled = Some(frames.request_frame());
        Ok(true)
    }

    fn advance(&self, graph: &mut Graph) -> Result<(), GraphError> {
        let value = graph
            .value(self.target)
            .ok_or(GraphError::UnknownNode(self.target))?;
        let current = value.as_scalar().ok_or_else(|| GraphError::Update {
            node: self.target,
            source: UpdateError::TypeMismatch {
                node: self.target,
                expected: "scalar",
                found: value.kind_name(),
            },
        })?;
        let next = (current + self.step).rem_euclid(TAU);
        graph.set_value(self.target, next)?;
        Ok(())
    }
}

/// Something that can be pumped once per frame.
pub trait FrameTarget {
    /// Deliver one frame. Returns false once no further frames are wanted.
    fn frame(&mut self) -> bool;
}

/// Pump `target` once per `period` until it goes idle or `stop` is set.
///
/// The lock is taken once per frame and never held across an await.
/// Returns the number of frames delivered.
pub async fn run_frames<T>(
    target: Arc<Mutex<T>>,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) -> u64
where
    T: FrameTarget,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut delivered = 0;

    loop {
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                if *stop.borrow() {
                    break;
                }
                let more = target.lock().frame();
                delivered += 1;
                if !more {
                    break;
                }
            }
        }
    }

    debug!(delivered, "frame loop finished");
    delivered
}
