// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded retry for content that has not arrived yet.
//!
//! The state machine owns no timers. Each failed attempt returns the delay
//! before the next one, and the engine schedules it on the host.
//!
//! ```
//! use understory_marquee::{Retry, RetryPolicy, RetryState, RetryStep};
//!
//! let mut retry = Retry::new(RetryPolicy {
//!     initial_delay_ms: 100.0,
//!     multiplier: 2.0,
//!     max_attempts: 2,
//! });
//! assert_eq!(retry.fail(), RetryStep::RetryAfter(100.0));
//! assert_eq!(retry.fail(), RetryStep::RetryAfter(200.0));
//! assert_eq!(retry.fail(), RetryStep::GiveUp);
//! assert_eq!(retry.state(), RetryState::Failed { attempts: 2 });
//! ```

use serde::{Deserialize, Serialize};

/// Retry schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: f64,
    /// Factor applied to the delay after each retry.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Number of retries after the initial attempt.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            multiplier: default_multiplier(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_initial_delay_ms() -> f64 {
    500.0
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_max_attempts() -> u32 {
    10
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> f64 {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        self.initial_delay_ms * self.multiplier.powi(exponent)
    }
}

/// Where a [`Retry`] stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Waiting for content; `attempt` retries have been scheduled so far.
    Waiting {
        /// Retries scheduled so far.
        attempt: u32,
    },
    /// Content arrived.
    Ready,
    /// Every retry was used up.
    Failed {
        /// Retries that were made.
        attempts: u32,
    },
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryStep {
    /// Try again after this many milliseconds.
    RetryAfter(f64),
    /// Stop trying.
    GiveUp,
}

/// Bounded retry state machine.
#[derive(Debug, Clone)]
pub struct Retry {
    policy: RetryPolicy,
    state: RetryState,
}

impl Retry {
    /// Start waiting with the given policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RetryState::Waiting { attempt: 0 },
        }
    }

    /// Current state.
    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Record a failed attempt and decide what comes next.
    pub fn fail(&mut self) -> RetryStep {
        match self.state {
            RetryState::Waiting { attempt } if attempt < self.policy.max_attempts => {
                let next = attempt + 1;
                self.state = RetryState::Waiting { attempt: next };
                RetryStep::RetryAfter(self.policy.delay_for(next))
            }
            RetryState::Waiting { attempt } => {
                self.state = RetryState::Failed { attempts: attempt };
                RetryStep::GiveUp
            }
            RetryState::Failed { .. } | RetryState::Ready => RetryStep::GiveUp,
        }
    }

    /// Record success.
    pub fn succeed(&mut self) {
        self.state = RetryState::Ready;
    }
}
