use std::time::Duration;

/// Cubic ease-out: fast start, gentle landing. Input is clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Interpolates between two numbers over a fixed duration
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    easing: fn(f64) -> f64,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            easing: ease_out_cubic,
        }
    }

    pub fn with_easing(mut self, easing: fn(f64) -> f64) -> Self {
        self.easing = easing;
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear progress through the duration in `[0, 1]`
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }

    /// Eased value; exactly `to` once the duration has elapsed
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let progress = self.progress(elapsed);
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * (self.easing)(progress)
    }
}
