use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};

use super::parse::CounterValue;
use super::tween::Tween;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Running { started: Instant },
    Complete,
}

/// Count-up animation for a single stat display.
///
/// Starts the first time the element becomes visible and never restarts:
/// visibility reported while running or after completion is ignored.
/// Displays without a number render verbatim.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    display: String,
    target: Option<(CounterValue, Tween)>,
    phase: Phase,
}

impl CounterAnimation {
    pub fn new(display: &str, duration: Duration) -> Self {
        let target = match CounterValue::parse(display) {
            Ok(value) => {
                let tween = Tween::new(0.0, value.value, duration);
                Some((value, tween))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Counter display will not animate");
                None
            }
        };

        Self {
            display: display.to_string(),
            target,
            phase: Phase::Pending,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Report that the element became visible. Returns true only for the
    /// call that actually starts the animation.
    pub fn mark_visible(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Pending {
            return false;
        }
        self.phase = match self.target {
            Some(_) => Phase::Running { started: now },
            None => Phase::Complete,
        };
        true
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::Pending
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Text to show at `now`
    pub fn frame(&mut self, now: Instant) -> String {
        let Some((value, tween)) = &self.target else {
            return self.display.clone();
        };

        match self.phase {
            Phase::Pending => value.render(0.0),
            Phase::Complete => value.render_final(),
            Phase::Running { started } => {
                let elapsed = now.saturating_duration_since(started);
                if tween.is_complete(elapsed) {
                    self.phase = Phase::Complete;
                    value.render_final()
                } else {
                    value.render(tween.value_at(elapsed))
                }
            }
        }
    }

    /// Drive the animation to completion, handing each frame to `sink`.
    ///
    /// Starts the animation if it has not started yet. A completed animation
    /// emits its final frame once and returns.
    pub async fn run<F>(&mut self, frame_interval: Duration, mut sink: F)
    where
        F: FnMut(&str),
    {
        self.mark_visible(Instant::now());

        let mut ticker = interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let frame = self.frame(Instant::now());
            sink(&frame);
            if self.is_complete() {
                break;
            }
        }
    }
}
