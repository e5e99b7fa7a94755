use std::thread;
use std::time::{Duration, Instant};

/// Sleeps out the remainder of each frame so ticks run at a fixed rate.
pub struct FrameTimer {
    last: Instant,
    frame: Duration,
}

impl FrameTimer {
    pub fn new(rate_hz: u32) -> Self {
        Self {
            last: Instant::now(),
            frame: Duration::from_secs(1) / rate_hz.max(1),
        }
    }

    /// Block until one frame has elapsed since the previous call.
    pub fn tick(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame {
            thread::sleep(self.frame - elapsed);
        }
        self.last = Instant::now();
    }
}
