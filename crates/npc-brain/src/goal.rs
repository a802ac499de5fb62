//! Goals
//!
//! A goal is a named objective scored by its considerations and gated by a
//! reselection cooldown measured in simulation seconds.

use crate::consideration::Consideration;

/// Named objective with ordered considerations and a cooldown.
#[derive(Debug)]
pub struct Goal {
    name: String,
    considerations: Vec<Box<dyn Consideration>>,
    cooldown_seconds: f32,
    last_selected_at: f32,
}

impl Goal {
    /// Creates a goal with no considerations and no cooldown.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            considerations: Vec::new(),
            cooldown_seconds: 0.0,
            last_selected_at: f32::NEG_INFINITY,
        }
    }

    pub fn with_cooldown(mut self, cooldown_seconds: f32) -> Self {
        self.cooldown_seconds = cooldown_seconds;
        self
    }

    pub fn with_consideration(mut self, consideration: impl Consideration + 'static) -> Self {
        self.considerations.push(Box::new(consideration));
        self
    }

    pub fn with_boxed_consideration(mut self, consideration: Box<dyn Consideration>) -> Self {
        self.considerations.push(consideration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn considerations(&self) -> &[Box<dyn Consideration>] {
        &self.considerations
    }

    pub fn cooldown_seconds(&self) -> f32 {
        self.cooldown_seconds
    }

    /// Simulation time of the last selection, `-inf` if never selected.
    pub fn last_selected_at(&self) -> f32 {
        self.last_selected_at
    }

    /// True while `now - last_selected < cooldown`.
    pub fn is_on_cooldown(&self, now_seconds: f32) -> bool {
        now_seconds - self.last_selected_at < self.cooldown_seconds
    }

    pub fn mark_selected(&mut self, now_seconds: f32) {
        self.last_selected_at = now_seconds;
    }
}
