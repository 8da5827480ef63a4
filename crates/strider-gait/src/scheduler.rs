//! Fixed-cadence driver for the gait generator.
//!
//! The host calls [`ControlLoop::step`] once per control tick; the loop reads
//! its clock, turns the reading into `dt` and runs exactly one
//! [`GaitGenerator::update`].

use strider_core::{ControlTime, ElapsedSource, GaitError, TickTimer};

use crate::command::MotionCommand;
use crate::generator::{GaitGenerator, LocomotionFrame};

/// Pairs a [`GaitGenerator`] with an elapsed-time source.
#[derive(Debug, Clone)]
pub struct ControlLoop<C: ElapsedSource> {
    generator: GaitGenerator,
    clock: C,
    timer: TickTimer,
    ticks: u64,
}

impl<C: ElapsedSource> ControlLoop<C> {
    pub const fn new(generator: GaitGenerator, clock: C) -> Self {
        Self {
            generator,
            clock,
            timer: TickTimer::new(),
            ticks: 0,
        }
    }

    /// Run one tick at the clock's current reading.
    pub fn step(&mut self, command: MotionCommand) -> Result<&LocomotionFrame, GaitError> {
        let now = self.clock.elapsed();
        self.step_at(now, command)
    }

    /// Run one tick at an explicit reading. The first tick after
    /// construction or [`ControlLoop::reset_timer`] has `dt = 0`.
    pub fn step_at(
        &mut self,
        now: ControlTime,
        command: MotionCommand,
    ) -> Result<&LocomotionFrame, GaitError> {
        let dt = self.timer.tick(now);
        self.ticks += 1;
        self.generator.update(dt, command)
    }

    /// Forget the last reading, e.g. after the loop was paused.
    pub const fn reset_timer(&mut self) {
        self.timer.reset();
    }

    /// Ticks run so far, including rejected ones.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub const fn generator(&self) -> &GaitGenerator {
        &self.generator
    }

    pub const fn generator_mut(&mut self) -> &mut GaitGenerator {
        &mut self.generator
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn into_generator(self) -> GaitGenerator {
        self.generator
    }
}
