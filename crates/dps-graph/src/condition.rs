// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Graph change notification.
//!
//! The listener fires a [`ChangeNotifier`] whenever an advertisement changes
//! the cached graph. [`GuardCondition`] is the default notifier: a
//! manually-triggered flag that wakes any thread blocked in
//! [`GuardCondition::wait`].

use crate::error::Result;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Signal fired once per graph update that changed a cached record.
pub trait ChangeNotifier: Send + Sync {
    fn trigger(&self) -> Result<()>;
}

/// Manually-triggered condition used as the graph guard.
pub struct GuardCondition {
    /// Unique identifier for this condition
    id: u64,
    state: Mutex<GuardState>,
    cond: Condvar,
}

#[derive(Default)]
struct GuardState {
    triggered: bool,
    /// Number of times the condition has been set to `true`.
    generation: u64,
}

impl GuardCondition {
    /// Create a new GuardCondition with trigger_value = false
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

        Self {
            id,
            state: Mutex::new(GuardState::default()),
            cond: Condvar::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Set the trigger value.
    ///
    /// When set to `true`, every thread blocked in [`wait`](Self::wait)
    /// wakes up.
    pub fn set_trigger_value(&self, value: bool) {
        let mut state = self.state.lock();
        state.triggered = value;
        if value {
            state.generation = state.generation.wrapping_add(1);
            self.cond.notify_all();
        }
    }

    #[must_use]
    pub fn get_trigger_value(&self) -> bool {
        self.state.lock().triggered
    }

    /// Read and reset the trigger value in one step.
    pub fn take_trigger(&self) -> bool {
        std::mem::take(&mut self.state.lock().triggered)
    }

    /// How many times the condition has been triggered since creation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Block until the condition is triggered or `timeout` elapses.
    ///
    /// Returns the trigger value observed on wake-up; `None` waits forever.
    /// The trigger is left set, call [`take_trigger`](Self::take_trigger)
    /// to consume it.
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut state = self.state.lock();

        while !state.triggered {
            match deadline {
                Some(deadline) => {
                    if self.cond.wait_until(&mut state, deadline).timed_out() {
                        break;
                    }
                }
                None => self.cond.wait(&mut state),
            }
        }

        state.triggered
    }
}

impl ChangeNotifier for GuardCondition {
    fn trigger(&self) -> Result<()> {
        self.set_trigger_value(true);
        Ok(())
    }
}

impl Default for GuardCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GuardCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardCondition")
            .field("id", &self.id)
            .field("triggered", &self.get_trigger_value())
            .finish()
    }
}
