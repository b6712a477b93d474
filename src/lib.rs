//! # Stigmergy - Scent-Trail Colony Simulation
//!
//! Colonies of simple agents explore a bounded arena, leave decaying scent
//! behind them and follow their own colony's scent back to the nest once they
//! run into another colony's trail.
//!
//! ## Features
//!
//! - Uniform-grid scent field with continuous deposit, linear decay and
//!   radius queries filtered by owner
//! - Three-state agent controller (exploring, returning, resting)
//! - Lost-trail grace period before falling back to a straight nest bearing
//! - Elastic reflection off the arena walls
//! - Seedable, world-owned random generator for reproducible runs
//! - JSON-loadable parameters
//!
//! ## Core Modules
//!
//! - [`simulation::scent_field`] - Spatial index of scent samples
//! - [`simulation::agent`] - Agent state machine and movement
//! - [`simulation::nest`] - Nest zones and agent spawning
//! - [`simulation::world`] - Per-tick orchestration

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agent state machine and movement.
    pub mod agent;
    /// Errors raised while configuring a simulation.
    pub mod error;
    /// Bounded log of recent agent state transitions.
    pub mod event_log;
    /// Geometric utility functions for distances, steering and wall bounces.
    pub mod geometric_utils;
    /// Trait for entities that occupy a point in the arena.
    ///
    /// The [`locatable::Locatable`] trait is implemented by every positioned
    /// entity (Agent, Nest, ScentSample).
    pub mod locatable;
    /// Nest zones and agent spawning.
    pub mod nest;
    /// Simulation parameters.
    pub mod params;
    /// Decaying scent samples.
    pub mod scent;
    /// Uniform-grid scent field with radius queries.
    pub mod scent_field;
    /// The world that ties field, nests and agents together.
    pub mod world;
}
