//! Per-stage timing.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use super::{BuildContext, Plugin};
use crate::Result;

/// Durations recorded by a [`TimingPlugin`], in completion order.
#[derive(Debug, Clone, Default)]
pub struct Timings {
    entries: Arc<Mutex<Vec<(String, Duration)>>>,
}

impl Timings {
    pub fn entries(&self) -> Vec<(String, Duration)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn total(&self) -> Duration {
        self.entries().iter().map(|(_, d)| *d).sum()
    }
}

/// Plugin that measures how long each completed stage took.
#[derive(Debug, Default)]
pub struct TimingPlugin {
    started: Mutex<HashMap<String, Instant>>,
    timings: Timings,
}

impl TimingPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the recorded durations, readable after the run.
    pub fn timings(&self) -> Timings {
        self.timings.clone()
    }
}

impl Plugin for TimingPlugin {
    fn name(&self) -> &'static str {
        "timing"
    }

    fn on_before_phase(&self, phase: &str, _ctx: &mut BuildContext<'_>) -> Result<()> {
        self.started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(phase.to_string(), Instant::now());
        Ok(())
    }

    fn on_after_phase(&self, phase: &str, _ctx: &mut BuildContext<'_>) -> Result<()> {
        let started = self
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(phase);
        if let Some(start) = started {
            let elapsed = start.elapsed();
            tracing::debug!(stage = phase, ?elapsed, "stage finished");
            self.timings
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((phase.to_string(), elapsed));
        }
        Ok(())
    }
}
