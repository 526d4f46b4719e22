use std::time::Duration;

/// Frame time tracker for the debug overlay.
///
/// Keeps the last `capacity` frame durations in a ring buffer.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    /// Number of samples currently held.
    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }

    fn samples(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.samples().iter().sum();
        total / count as u32
    }

    /// Average frame time in milliseconds.
    pub fn average_ms(&self) -> f64 {
        self.average().as_secs_f64() * 1000.0
    }

    /// Frames per second over the held samples; zero before any are recorded.
    pub fn fps(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    pub fn max(&self) -> Duration {
        self.samples().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.samples().iter().copied().min().unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.max(), Duration::ZERO);
    }

    #[test]
    fn averages_recorded_frames() {
        let mut timer = FrameTimer::new(4);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(30));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert!((timer.fps() - 50.0).abs() < 1e-6);
        assert!((timer.average_ms() - 20.0).abs() < 1e-9);
        assert_eq!(timer.min(), Duration::from_millis(10));
        assert_eq!(timer.max(), Duration::from_millis(30));
    }

    #[test]
    fn ring_buffer_drops_oldest() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(100));
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(10));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.max(), Duration::from_millis(10));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut timer = FrameTimer::new(0);
        timer.record(Duration::from_millis(5));
        assert_eq!(timer.count(), 1);
    }
}
