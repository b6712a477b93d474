//! Agent behavior, state, and movement.
//!
//! Agents explore the arena leaving scent behind them. Smelling another
//! colony's scent sends them home along their own trail; after a short rest
//! inside the nest they set out again.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometric_utils::{self, EPSILON_SQUARED};
use super::locatable::Locatable;
use super::nest::{Nest, NestHandle, Rgba};
use super::params::Params;
use super::scent::ScentSample;
use super::scent_field::{OwnerFilter, ScentField};

/// Navigation state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgentState {
    /// Wandering randomly and laying scent.
    #[default]
    Exploring,
    /// Following its own colony's scent back home.
    ReturningToNest,
    /// Waiting inside the home nest.
    RestingAtNest,
}

impl AgentState {
    /// All states, in lifecycle order.
    pub const ALL: [Self; 3] = [
        Self::Exploring,
        Self::ReturningToNest,
        Self::RestingAtNest,
    ];
}

/// A state change reported by [`Agent::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateTransition {
    /// Exploring -> returning: foreign scent detected.
    FoundForeignScent,
    /// Returning -> resting: the agent entered its nest.
    ReachedNest,
    /// Resting -> exploring: the rest period ended.
    ResumedExploring,
}

impl StateTransition {
    /// State the agent is in after the transition.
    pub fn target(self) -> AgentState {
        match self {
            StateTransition::FoundForeignScent => AgentState::ReturningToNest,
            StateTransition::ReachedNest => AgentState::RestingAtNest,
            StateTransition::ResumedExploring => AgentState::Exploring,
        }
    }
}

/// A scent-laying, nest-returning agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Position of the body center.
    pub pos: Array1<f32>,
    /// Velocity (units per second).
    pub velocity: Array1<f32>,
    /// Heading in radians.
    pub heading: f32,
    /// Travel speed.
    pub speed: f32,
    /// Current navigation state.
    pub state: AgentState,
    /// Handle of the home nest.
    pub home: NestHandle,
    /// Colony id written into deposited scent.
    pub owner_id: u32,
    /// Colony color.
    pub color: Rgba,
    /// Last direction the agent trusted; followed for a while when the trail is lost.
    pub last_good_direction: Array1<f32>,
    /// Time spent following `last_good_direction` without smelling the trail.
    pub lost_trail_timer: f32,
    /// Remaining rest time while inside the nest.
    pub rest_timer: f32,
}

impl Agent {
    /// Creates an exploring agent at the center of `nest`.
    ///
    /// # Arguments
    ///
    /// * `nest` - Home nest; provides position, colony id and color
    /// * `home` - Handle of `nest` in the world
    /// * `heading` - Initial heading in radians
    /// * `speed` - Travel speed
    pub fn new(nest: &Nest, home: NestHandle, heading: f32, speed: f32) -> Self {
        let direction = geometric_utils::from_angle(heading);

        Self {
            pos: nest.pos.clone(),
            velocity: &direction * speed,
            heading,
            speed,
            state: AgentState::Exploring,
            home,
            owner_id: nest.id,
            color: nest.color,
            last_good_direction: direction,
            lost_trail_timer: 0.0,
            rest_timer: 0.0,
        }
    }

    /// Advances the agent by `dt` seconds.
    ///
    /// Runs the behavior of the current state, then moves the agent and keeps
    /// it inside the arena.
    ///
    /// # Arguments
    ///
    /// * `dt` - Time step in seconds
    /// * `params` - Simulation parameters
    /// * `field` - Scent field to deposit into and query
    /// * `nest` - The agent's home nest
    /// * `rng` - Random generator for wandering and fresh headings
    ///
    /// # Returns
    ///
    /// The state transition taken during this step, if any.
    pub fn update(
        &mut self,
        dt: f32,
        params: &Params,
        field: &mut ScentField,
        nest: &Nest,
        rng: &mut impl Rng,
    ) -> Option<StateTransition> {
        let transition = match self.state {
            AgentState::Exploring => self.update_exploring(dt, params, field, nest, rng),
            AgentState::ReturningToNest => self.update_returning(dt, params, field, nest),
            AgentState::RestingAtNest => self.update_resting(dt, nest, rng),
        };

        self.advance(dt, params);
        transition
    }

    fn update_exploring(
        &mut self,
        dt: f32,
        params: &Params,
        field: &mut ScentField,
        nest: &Nest,
        rng: &mut impl Rng,
    ) -> Option<StateTransition> {
        let jitter: f32 = rng.random_range(-1.0..=1.0);
        self.heading += jitter * params.wander_strength * dt;

        let direction = geometric_utils::from_angle(self.heading);
        self.velocity = &direction * self.speed;
        self.last_good_direction = direction;

        field.insert(&self.pos, self.owner_id, params.deposit_strength);

        let foreign = field.query(
            &self.pos,
            params.detection_radius,
            self.owner_id,
            OwnerFilter::Foreign,
        );
        if foreign.is_empty() {
            return None;
        }

        self.state = AgentState::ReturningToNest;
        self.lost_trail_timer = 0.0;
        // first guess; refined by the trail from the next tick on
        if let Some(to_nest) = geometric_utils::normalize(&(&nest.pos - &self.pos)) {
            self.velocity = &to_nest * self.speed;
            self.last_good_direction = to_nest;
        }
        Some(StateTransition::FoundForeignScent)
    }

    fn update_returning(
        &mut self,
        dt: f32,
        params: &Params,
        field: &ScentField,
        nest: &Nest,
    ) -> Option<StateTransition> {
        let trail = field.query(
            &self.pos,
            params.detection_radius,
            self.owner_id,
            OwnerFilter::Own,
        );

        if let Some(target) = trail_centroid(&trail) {
            if let Some(direction) = geometric_utils::normalize(&(&target - &self.pos)) {
                self.velocity = &direction * self.speed;
                self.last_good_direction = direction;
                self.lost_trail_timer = 0.0;
            }
        } else if self.lost_trail_timer < params.max_lost_trail_wander_time
            && geometric_utils::length_squared(&self.last_good_direction) > EPSILON_SQUARED
        {
            self.velocity = &self.last_good_direction * self.speed;
            self.lost_trail_timer += dt;
        } else {
            self.velocity = match geometric_utils::normalize(&(&nest.pos - &self.pos)) {
                Some(to_nest) => to_nest * self.speed,
                None => Array1::zeros(2),
            };
        }

        if nest.is_position_inside(&self.pos) {
            self.state = AgentState::RestingAtNest;
            self.rest_timer = params.rest_duration;
            self.velocity = Array1::zeros(2);
            return Some(StateTransition::ReachedNest);
        }
        None
    }

    fn update_resting(
        &mut self,
        dt: f32,
        nest: &Nest,
        rng: &mut impl Rng,
    ) -> Option<StateTransition> {
        self.rest_timer -= dt;
        if self.rest_timer > 0.0 {
            return None;
        }

        self.state = AgentState::Exploring;
        self.heading = rng.random_range(0.0..std::f32::consts::TAU);
        self.pos = nest.pos.clone();

        let direction = geometric_utils::from_angle(self.heading);
        self.velocity = &direction * self.speed;
        self.last_good_direction = direction;
        Some(StateTransition::ResumedExploring)
    }

    /// Integrates velocity, bounces off the arena walls and refreshes the heading.
    fn advance(&mut self, dt: f32, params: &Params) {
        self.pos += &(&self.velocity * dt);

        geometric_utils::reflect_in_box_mut(
            &mut self.pos,
            &mut self.velocity,
            params.agent_size,
            params.box_width,
            params.box_height,
        );

        if geometric_utils::length_squared(&self.velocity) > EPSILON_SQUARED {
            self.heading = geometric_utils::heading_of(&self.velocity);
        }
    }
}

impl Locatable for Agent {
    fn pos(&self) -> &Array1<f32> {
        &self.pos
    }
}

/// Center of a set of trail samples, weighted by strength.
///
/// Falls back to the plain mean of the positions when the total strength is
/// not positive, which can happen right after a decay step.
///
/// # Returns
///
/// `None` for an empty set.
pub fn trail_centroid(samples: &[&ScentSample]) -> Option<Array1<f32>> {
    if samples.is_empty() {
        return None;
    }

    let mut weighted: Array1<f32> = Array1::zeros(2);
    let mut total_strength = 0.0;
    for sample in samples {
        weighted.scaled_add(sample.strength, &sample.pos);
        total_strength += sample.strength;
    }

    if total_strength > 0.0 {
        return Some(weighted / total_strength);
    }

    let mut sum: Array1<f32> = Array1::zeros(2);
    for sample in samples {
        sum += &sample.pos;
    }
    Some(sum / samples.len() as f32)
}
