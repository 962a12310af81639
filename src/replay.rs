// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Timed, pausable replay of traversal steps
//!
//! A [`Replayer`] collects [`Frame`]s, freezes them with
//! [`ready`](Replayer::ready) and steps through them in
//! [`play`](Replayer::play), sleeping for the pacing interval after each
//! step. The cursor yields one extra step without a frame before reporting
//! completion.
//!
//! Every [`ready`](Replayer::ready) and [`reset`](Replayer::reset) starts a
//! new generation. A play loop only advances the cursor of the generation it
//! started in, so a loop suspended across a reset wakes up, notices and
//! stops.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};

/// Pending work of a single frame
pub type FrameFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback receiving the operation count on completion and on reset
pub type ReadyCallback = Arc<dyn Fn(ReplayReport) + Send + Sync>;

/// One replay step; may run again on a later playback
#[derive(Clone)]
pub struct Frame(Arc<dyn Fn() -> FrameFuture + Send + Sync>);

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Frame")
    }
}

impl Frame {
    /// Frame running a synchronous effect
    pub fn new(effect: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(move || {
            effect();
            Box::pin(std::future::ready(()))
        }))
    }

    /// Frame running an asynchronous effect to completion
    pub fn from_async<F, Fut>(effect: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(effect())))
    }

    fn run(&self) -> FrameFuture {
        (self.0)()
    }
}

/// Summary handed to the ready callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    /// Frames executed in this playback, zero after a reset
    pub operations: usize,
}

struct Player {
    generation: u64,
    frames: Arc<[Frame]>,
    cursor: usize,
}

struct State {
    frames: Vec<Frame>,
    is_paused: bool,
    is_ready: bool,
    operations: usize,
    player: Option<Player>,
    generation: u64,
    timeout: Duration,
    on_ready: Option<ReadyCallback>,
}

enum Step {
    Halt,
    Run { generation: u64, frame: Option<Frame> },
    Finished { report: ReplayReport, callback: Option<ReadyCallback> },
}

/// Handle to a replay sequence; clones control the same sequence
#[derive(Clone)]
pub struct Replayer {
    inner: Arc<Mutex<State>>,
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl fmt::Debug for Replayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Replayer")
            .field("frames", &state.frames.len())
            .field("is_paused", &state.is_paused)
            .field("is_ready", &state.is_ready)
            .field("operations", &state.operations)
            .field("timeout", &state.timeout)
            .finish_non_exhaustive()
    }
}

impl Replayer {
    /// Create an idle replayer pacing steps by `timeout`
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State {
                frames: Vec::new(),
                is_paused: false,
                is_ready: false,
                operations: 0,
                player: None,
                generation: 0,
                timeout,
                on_ready: None,
            })),
        }
    }

    /// Set the callback invoked on completion and on reset
    #[must_use]
    pub fn on_ready(self, callback: impl Fn(ReplayReport) + Send + Sync + 'static) -> Self {
        self.lock().on_ready = Some(Arc::new(callback));
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a frame; ignored once the replayer is ready
    pub fn add(&self, frame: Frame) -> &Self {
        let mut state = self.lock();
        if state.is_ready {
            trace!("replayer ready, dropping frame");
        } else {
            state.frames.push(frame);
        }
        self
    }

    /// Freeze the frames and start a new playback generation
    pub fn ready(&self) -> &Self {
        let mut state = self.lock();
        state.generation += 1;
        state.player = Some(Player {
            generation: state.generation,
            frames: Arc::from(state.frames.clone()),
            cursor: 0,
        });
        state.is_ready = true;
        debug!(frames = state.frames.len(), generation = state.generation, "replayer ready");
        self
    }

    /// Step through the frames until done, paused or reset
    pub async fn play(&self) {
        loop {
            match self.next_step() {
                Step::Halt => return,
                Step::Finished { report, callback } => {
                    debug!(operations = report.operations, "replay finished");
                    if let Some(callback) = callback {
                        callback(report);
                    }
                    return;
                }
                Step::Run { generation, frame } => {
                    if let Some(frame) = frame {
                        frame.run().await;
                        if !self.record_operation(generation) {
                            return;
                        }
                    }
                    let timeout = self.timeout();
                    tokio::time::sleep(timeout).await;
                    if !self.is_current(generation) {
                        trace!(generation, "replay generation retired");
                        return;
                    }
                }
            }
        }
    }

    fn next_step(&self) -> Step {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.is_paused {
            return Step::Halt;
        }
        let Some(player) = state.player.as_mut() else {
            return Step::Halt;
        };

        if player.cursor > player.frames.len() {
            return Step::Finished {
                report: ReplayReport {
                    operations: state.operations,
                },
                callback: state.on_ready.clone(),
            };
        }

        let index = player.cursor;
        player.cursor += 1;
        trace!(index, generation = player.generation, "replay step");
        Step::Run {
            generation: player.generation,
            frame: player.frames.get(index).cloned(),
        }
    }

    fn record_operation(&self, generation: u64) -> bool {
        let mut state = self.lock();
        if state.generation != generation {
            return false;
        }
        state.operations += 1;
        true
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock()
            .player
            .as_ref()
            .is_some_and(|p| p.generation == generation)
    }

    /// Stop scheduling further steps; the current step finishes
    pub fn pause(&self) -> &Self {
        self.lock().is_paused = true;
        self
    }

    /// Allow steps again; call [`play`](Self::play) to continue
    pub fn unpause(&self) -> &Self {
        self.lock().is_paused = false;
        self
    }

    /// Drop all frames and progress and notify the callback with zero
    pub fn reset(&self) -> &Self {
        let callback = {
            let mut state = self.lock();
            state.frames.clear();
            state.is_paused = false;
            state.is_ready = false;
            state.operations = 0;
            state.player = None;
            state.generation += 1;
            state.on_ready.clone()
        };
        debug!("replayer reset");
        if let Some(callback) = callback {
            callback(ReplayReport { operations: 0 });
        }
        self
    }

    /// Change the pacing interval, effective from the next step
    pub fn set_timeout(&self, timeout: Duration) -> &Self {
        self.lock().timeout = timeout;
        self
    }

    /// Current pacing interval
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.lock().timeout
    }

    /// Frames executed so far
    #[must_use]
    pub fn operations(&self) -> usize {
        self.lock().operations
    }

    /// Whether steps are currently held back
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.lock().is_paused
    }

    /// Whether the frame list is frozen
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.lock().is_ready
    }

    /// Number of frames collected
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().frames.len()
    }

    /// Whether no frames were collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Frame {
        let counter = Arc::clone(counter);
        Frame::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test]
    async fn test_play_before_ready_is_noop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let replayer = Replayer::default();
        replayer.add(counting(&counter));
        replayer.play().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(replayer.operations(), 0);
    }

    #[tokio::test]
    async fn test_add_after_ready_is_dropped() {
        let counter = Arc::new(AtomicUsize::new(0));
        let replayer = Replayer::default();
        replayer.add(counting(&counter)).ready();
        replayer.add(counting(&counter));
        assert_eq!(replayer.len(), 1);

        replayer.play().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_replay_completes() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let replayer = Replayer::default().on_ready(move |r| sink.lock().unwrap().push(r));
        replayer.ready().play().await;
        assert_eq!(*reports.lock().unwrap(), vec![ReplayReport { operations: 0 }]);
    }

    #[test]
    fn test_reset_clears_state() {
        let counter = Arc::new(AtomicUsize::new(0));
        let replayer = Replayer::new(Duration::from_millis(5));
        replayer.add(counting(&counter)).ready().pause();
        replayer.reset();
        assert!(replayer.is_empty());
        assert!(!replayer.is_paused());
        assert!(!replayer.is_ready());
        assert_eq!(replayer.timeout(), Duration::from_millis(5));
    }
}
