//! Variable frame time to fixed simulation steps

use std::time::Duration;

/// Accumulates frame time and hands it out in fixed steps
#[derive(Debug, Clone)]
pub struct TickClock {
    /// Length of one fixed step
    pub fixed_step: Duration,
    /// Time since start
    pub time: Duration,
    /// Time of the last frame
    pub delta_time: Duration,
    /// Frames seen
    pub frame: u64,
    /// Fixed steps taken
    pub fixed_ticks: u64,
    /// Steps allowed per frame before the backlog is dropped
    pub max_steps_per_frame: u32,
    accumulator: Duration,
}

impl TickClock {
    pub fn new(fixed_step: Duration) -> Self {
        Self {
            fixed_step,
            time: Duration::ZERO,
            delta_time: Duration::ZERO,
            frame: 0,
            fixed_ticks: 0,
            max_steps_per_frame: 8,
            accumulator: Duration::ZERO,
        }
    }

    /// Record a frame of `dt` and return how many fixed steps are due
    pub fn update(&mut self, dt: Duration) -> u32 {
        self.delta_time = dt;
        self.time += dt;
        self.frame = self.frame.wrapping_add(1);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.fixed_step && !self.fixed_step.is_zero() {
            self.accumulator -= self.fixed_step;
            steps += 1;
            if steps == self.max_steps_per_frame {
                // spiral of death guard
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        self.fixed_ticks += u64::from(steps);
        steps
    }

    /// Leftover time as a fraction of a step, for render interpolation
    pub fn alpha(&self) -> f32 {
        if self.fixed_step.is_zero() {
            return 0.0;
        }
        self.accumulator.as_secs_f32() / self.fixed_step.as_secs_f32()
    }
}
