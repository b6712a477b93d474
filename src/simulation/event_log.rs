//! Event logging system for displaying recent agent state changes.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::agent::StateTransition;

/// A logged state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// World time when the transition happened
    pub time: f32,
    /// Index of the agent in the world's agent list
    pub agent: usize,
    /// Colony of the agent
    pub owner_id: u32,
    /// What happened
    pub transition: StateTransition,
}

impl LoggedEvent {
    /// Human-readable description of the event.
    pub fn description(&self) -> String {
        let what = match self.transition {
            StateTransition::FoundForeignScent => "smelled a foreign colony, heading home",
            StateTransition::ReachedNest => "reached its nest",
            StateTransition::ResumedExploring => "left its nest to explore",
        };
        format!("[{:.1}s] agent {} (colony {}) {}", self.time, self.agent, self.owner_id, what)
    }
}

/// Bounded history of state transitions, newest first.
///
/// A capacity of zero keeps nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<LoggedEvent>,
    capacity: usize,
}

impl EventLog {
    /// Creates an empty log holding at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records an event, dropping the oldest one once the log is full.
    pub fn log(&mut self, event: LoggedEvent) {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    /// All retained events, newest first.
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.events
    }

    /// The `n` newest events.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter().take(n)
    }
}
