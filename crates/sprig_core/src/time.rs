//! Fixed-tick accumulator.
//!
//! Logic runs at a fixed ticks-per-second rate regardless of how long a
//! rendered frame takes. Wall-clock time is fed in with `begin_frame`, and the
//! host loops on `should_step` to consume it in whole ticks.

use std::time::Duration;

pub struct TickClock {
    ticks_per_second: u32,
    duration_per_tick: Duration,
    pub max_lag: Duration,
    lag: Duration,
    pub tick_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
}

impl TickClock {
    pub fn new(ticks_per_second: u32) -> Self {
        assert!(ticks_per_second > 0, "ticks_per_second must be > 0");
        let duration_per_tick = Duration::from_secs(1) / ticks_per_second;
        Self {
            ticks_per_second,
            duration_per_tick,
            max_lag: Duration::from_millis(250),
            lag: Duration::ZERO,
            tick_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
        }
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    pub fn duration_per_tick(&self) -> Duration {
        self.duration_per_tick
    }

    pub fn seconds_per_tick(&self) -> f32 {
        self.duration_per_tick.as_secs_f32()
    }

    pub fn begin_frame(&mut self, elapsed: Duration) {
        let mut elapsed = elapsed;
        // Spiral-of-death cap
        if elapsed > self.max_lag {
            log::warn!(
                "Frame took {:.1}ms, capping lag to {}ms",
                elapsed.as_secs_f64() * 1000.0,
                self.max_lag.as_millis()
            );
            elapsed = self.max_lag;
        }

        self.lag += elapsed;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    pub fn should_step(&mut self) -> bool {
        if self.lag >= self.duration_per_tick {
            self.lag -= self.duration_per_tick;
            self.tick_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Fraction of a tick left unconsumed after the last `should_step`.
    pub fn interpolation_alpha(&self) -> f32 {
        self.lag.as_secs_f32() / self.duration_per_tick.as_secs_f32()
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(60)
    }
}
