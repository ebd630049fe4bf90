//! Bounded wait for external content.
//!
//! Asset streaming happens outside the core. The frame driver ticks a
//! [`ReadinessGate`] every frame until the content layer reports it is done,
//! or until the timeout elapses, in which case the world starts anyway in a
//! degraded state. Nothing ever blocks.
//!
//! [`Simulation::update`](crate::simulation::Simulation::update) does the
//! ticking. The continuation that should run once loading is over, fallback
//! included, goes in
//! [`Simulation::on_settled`](crate::simulation::Simulation::on_settled);
//! drivers that prefer polling can read [`ReadinessGate::state`] instead.

use bevy_ecs::prelude::Resource;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Waiting,
    Ready,
    TimedOut,
}

#[derive(Resource, Debug, Clone)]
pub struct ReadinessGate {
    timeout: f32,
    waited: f32,
    state: Readiness,
    /// Failures reported while waiting.
    errors: Vec<String>,
}

impl ReadinessGate {
    pub fn new(timeout: f32) -> Self {
        Self {
            timeout: timeout.max(0.0),
            waited: 0.0,
            state: Readiness::Waiting,
            errors: Vec::new(),
        }
    }

    /// The content layer finished (successfully or not).
    pub fn mark_ready(&mut self) {
        if self.state == Readiness::Waiting {
            self.state = Readiness::Ready;
        }
    }

    /// Record a recoverable content failure. Loading keeps going.
    pub fn report_error(&mut self, error: impl Into<String>) {
        let error = error.into();
        warn!("Content failed to load: {}", error);
        self.errors.push(error);
    }

    /// Advance the wait. Returns the state after this tick.
    pub fn tick(&mut self, dt: f32) -> Readiness {
        if self.state == Readiness::Waiting {
            self.waited += dt.max(0.0);
            if self.waited >= self.timeout {
                self.state = Readiness::TimedOut;
                warn!(
                    "Content not ready after {:.1}s, continuing without it",
                    self.waited
                );
            }
        }
        self.state
    }

    pub fn state(&self) -> Readiness {
        self.state
    }

    pub fn is_settled(&self) -> bool {
        self.state != Readiness::Waiting
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}
