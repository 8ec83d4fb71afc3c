use std::time::{Duration, Instant};

/// Measures one pipeline phase. The elapsed time is logged when the timer
/// goes out of scope, on success and error paths alike.
pub struct PhaseTimer {
    phase: &'static str,
    started: Instant,
}

impl PhaseTimer {
    pub fn start(phase: &'static str) -> Self {
        tracing::info!(phase, "phase started");
        Self {
            phase,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        tracing::info!(
            phase = self.phase,
            secs = self.elapsed().as_secs_f64(),
            "phase finished"
        );
    }
}
