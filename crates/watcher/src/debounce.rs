//! Per-path debouncing
//!
//! One task owns all per-path state. Raw events bump the path's generation
//! and (re)arm a timer task; timers hold no reference to that state and only
//! report back `{path, generation}` through the owner's timer inbox. A fired
//! timer whose generation no longer matches has been superseded and is
//! dropped. The window slides: every relevant event restarts the delay, so a
//! path is emitted only after it has been quiet for the full delay.

use crate::event::RawEvent;
use paperlink_core::TIMER_QUEUE_CAPACITY;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Message sent by a timer task when its delay elapses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerFired {
    pub path: PathBuf,
    pub generation: u64,
}

/// Per-path debounce state
#[derive(Debug)]
struct PathState {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Debounce engine state; only ever touched by the task running `run`
pub struct Debouncer {
    delay: Duration,
    states: HashMap<PathBuf, PathState>,
    timer_tx: mpsc::Sender<TimerFired>,
    shutdown: watch::Receiver<bool>,
}

impl Debouncer {
    /// Create the engine and the receiving end of its timer inbox
    pub fn new(
        delay: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, mpsc::Receiver<TimerFired>) {
        let (timer_tx, timer_rx) = mpsc::channel(TIMER_QUEUE_CAPACITY);
        let engine = Self {
            delay,
            states: HashMap::new(),
            timer_tx,
            shutdown,
        };
        (engine, timer_rx)
    }

    /// Spawn the engine loop, emitting stable paths into `stable_tx`
    pub fn spawn(
        delay: Duration,
        raw_rx: mpsc::Receiver<RawEvent>,
        stable_tx: mpsc::Sender<PathBuf>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let (engine, timer_rx) = Self::new(delay, shutdown);
        tokio::spawn(engine.run(raw_rx, timer_rx, stable_tx))
    }

    /// Current generation of `path`, if it has pending state
    pub fn generation(&self, path: &Path) -> Option<u64> {
        self.states.get(path).map(|s| s.generation)
    }

    /// Number of paths with a pending timer
    pub fn pending(&self) -> usize {
        self.states.values().filter(|s| s.timer.is_some()).count()
    }

    /// Handle a raw event: cancel the path's timer, bump its generation, re-arm
    pub fn on_raw_event(&mut self, event: RawEvent) {
        if !event.op.is_relevant() {
            trace!(file = %event.path.display(), op = ?event.op, "ignoring raw event");
            return;
        }

        let state = self
            .states
            .entry(event.path.clone())
            .or_insert(PathState {
                generation: 0,
                timer: None,
            });

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        state.generation += 1;
        let generation = state.generation;

        trace!(file = %event.path.display(), generation, "debounce timer armed");
        state.timer = Some(spawn_timer(
            self.delay,
            TimerFired {
                path: event.path,
                generation,
            },
            self.timer_tx.clone(),
            self.shutdown.clone(),
        ));
    }

    /// Handle a fired timer; returns the path if the timer is still current
    pub fn on_timer_fired(&mut self, msg: TimerFired) -> Option<PathBuf> {
        match self.states.get(&msg.path) {
            Some(state) if state.generation == msg.generation => {
                self.states.remove(&msg.path);
                debug!(file = %msg.path.display(), generation = msg.generation, "file stable");
                Some(msg.path)
            }
            Some(state) => {
                trace!(
                    file = %msg.path.display(),
                    generation = msg.generation,
                    current = state.generation,
                    "discarding superseded timer"
                );
                None
            }
            None => None,
        }
    }

    /// Engine loop: multiplexes raw events, timer messages and shutdown
    pub async fn run(
        mut self,
        mut raw_rx: mpsc::Receiver<RawEvent>,
        mut timer_rx: mpsc::Receiver<TimerFired>,
        stable_tx: mpsc::Sender<PathBuf>,
    ) {
        let mut shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                biased;

                _ = shutdown_signaled(&mut shutdown) => break,

                Some(msg) = timer_rx.recv() => {
                    let Some(path) = self.on_timer_fired(msg) else {
                        continue;
                    };
                    tokio::select! {
                        biased;

                        _ = shutdown_signaled(&mut shutdown) => break,
                        sent = stable_tx.send(path) => {
                            if sent.is_err() {
                                debug!("stable path receiver dropped, stopping debounce engine");
                                break;
                            }
                        }
                    }
                }

                event = raw_rx.recv() => match event {
                    Some(event) => self.on_raw_event(event),
                    None => {
                        debug!("raw event source closed, stopping debounce engine");
                        break;
                    }
                },
            }
        }

        for state in self.states.values_mut() {
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
        }
        debug!(pending = self.states.len(), "debounce engine stopped");
    }
}

fn spawn_timer(
    delay: Duration,
    msg: TimerFired,
    timer_tx: mpsc::Sender<TimerFired>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let stopped = *shutdown.borrow();
        if stopped {
            return;
        }
        tokio::select! {
            _ = timer_tx.send(msg) => {}
            _ = shutdown_signaled(&mut shutdown) => {}
        }
    })
}

/// Resolves once shutdown is requested or its sender is gone
pub(crate) async fn shutdown_signaled(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
