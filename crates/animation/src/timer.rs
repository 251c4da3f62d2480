use std::collections::VecDeque;
use std::time::Duration;

/// Sliding-window frame-time tracker feeding the on-screen readout.
#[derive(Debug)]
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    window: usize,
}

impl FrameTimer {
    pub fn new(window: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(window),
            window: window.max(1),
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().sum();
        total / self.samples.len() as u32
    }

    pub fn worst(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn best(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    /// Frames per second over the window; 0.0 until a sample arrives.
    pub fn fps(&self) -> f32 {
        let avg = self.average();
        if avg.is_zero() {
            0.0
        } else {
            1.0 / avg.as_secs_f32()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_window_statistics() {
        let mut timer = FrameTimer::new(3);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.worst(), Duration::from_millis(30));
        assert_eq!(timer.best(), Duration::from_millis(10));
    }

    #[test]
    fn window_slides() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
    }

    #[test]
    fn fps_from_average() {
        let mut timer = FrameTimer::new(4);
        assert_eq!(timer.fps(), 0.0);
        timer.record(Duration::from_millis(20));
        assert!((timer.fps() - 50.0).abs() < 0.5);
    }
}
