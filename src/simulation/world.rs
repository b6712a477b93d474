//! The world: scent field, nests and agents advanced together.
//!
//! Every tick first decays the scent field, then updates each agent in list
//! order against the decayed field. The world owns the only random generator
//! and hands it to every agent update, so a seeded world replays exactly.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::agent::{Agent, AgentState};
use super::error::SimulationError;
use super::event_log::{EventLog, LoggedEvent};
use super::geometric_utils;
use super::nest::{Nest, NestHandle};
use super::params::Params;
use super::scent::ScentSample;
use super::scent_field::ScentField;

/// The complete simulation state.
#[derive(Debug, Clone)]
pub struct World {
    /// All agents, updated in this order every tick.
    pub agents: Vec<Agent>,
    /// Scent deposited by the agents.
    pub field: ScentField,
    /// Total simulation time elapsed.
    pub time: f32,
    nests: Vec<Nest>,
    params: Params,
    rng: StdRng,
    event_log: EventLog,
}

impl World {
    /// Creates a world with `n_nests` randomly placed nests and
    /// `agents_per_nest` agents at each of them.
    ///
    /// Nests are placed uniformly in `[nest_margin, extent - nest_margin)` on
    /// both axes and take their colors from the palette in order.
    pub fn new(params: Params) -> Result<Self, SimulationError> {
        params.validate()?;

        if params.n_nests == 0 {
            return Err(SimulationError::invalid("n_nests", "at least one nest is required"));
        }
        let margin = params.nest_margin;
        if margin < 0.0 || 2.0 * margin >= params.box_width.min(params.box_height) {
            return Err(SimulationError::invalid(
                "nest_margin",
                format!("{margin} leaves no room for nests in the arena"),
            ));
        }

        let mut rng = seeded_rng(params.seed);
        let nests = (0..params.n_nests)
            .map(|i| {
                let pos = geometric_utils::vec2(
                    rng.random_range(margin..params.box_width - margin),
                    rng.random_range(margin..params.box_height - margin),
                );
                Nest::new(i as u32, pos, params.nest_color(i), params.nest_radius)
            })
            .collect();

        Ok(Self::populate(params, nests, rng))
    }

    /// Creates a world around the given nests, spawning `agents_per_nest`
    /// agents at each of them.
    ///
    /// Nest ids must be unique since they tag scent ownership.
    pub fn with_nests(params: Params, nests: Vec<Nest>) -> Result<Self, SimulationError> {
        params.validate()?;

        let mut seen = HashSet::new();
        for nest in &nests {
            if !seen.insert(nest.id) {
                return Err(SimulationError::invalid(
                    "nests",
                    format!("duplicate nest id {}", nest.id),
                ));
            }
        }

        let rng = seeded_rng(params.seed);
        Ok(Self::populate(params, nests, rng))
    }

    fn populate(params: Params, nests: Vec<Nest>, mut rng: StdRng) -> Self {
        let mut agents = Vec::with_capacity(nests.len() * params.agents_per_nest);
        for (i, nest) in nests.iter().enumerate() {
            for _ in 0..params.agents_per_nest {
                agents.push(nest.spawn_agent(NestHandle(i), params.movement_speed, &mut rng));
            }
        }

        info!(
            nests = nests.len(),
            agents = agents.len(),
            width = params.box_width,
            height = params.box_height,
            seed = ?params.seed,
            "world created"
        );

        Self {
            agents,
            field: ScentField::from_params(&params),
            time: 0.0,
            nests,
            event_log: EventLog::new(params.event_log_size),
            params,
            rng,
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Decays the scent field once, then updates every agent in list order.
    /// `dt = 0` leaves scent strengths and positions untouched. Negative or
    /// non-finite values are not rejected; they produce meaningless but
    /// memory-safe state.
    pub fn tick(&mut self, dt: f32) {
        self.field.decay(dt);
        self.time += dt;

        let Self {
            agents,
            field,
            time,
            nests,
            params,
            rng,
            event_log,
        } = self;

        for (index, agent) in agents.iter_mut().enumerate() {
            let Some(nest) = nests.get(agent.home.index()) else {
                warn!(agent = index, home = agent.home.index(), "agent has no home nest, skipped");
                continue;
            };
            if let Some(transition) = agent.update(dt, params, field, nest, rng) {
                debug!(
                    agent = index,
                    owner = agent.owner_id,
                    ?transition,
                    "agent changed state"
                );
                event_log.log(LoggedEvent {
                    time: *time,
                    agent: index,
                    owner_id: agent.owner_id,
                    transition,
                });
            }
        }
    }

    /// Spawns one more agent at the nest behind `home`.
    ///
    /// # Returns
    ///
    /// The index of the new agent, or `None` if the handle is unknown.
    pub fn spawn_agent(&mut self, home: NestHandle) -> Option<usize> {
        let nest = self.nests.get(home.index())?;
        let agent = nest.spawn_agent(home, self.params.movement_speed, &mut self.rng);
        self.agents.push(agent);
        Some(self.agents.len() - 1)
    }

    /// All nests, indexed by [`NestHandle`].
    pub fn nests(&self) -> &[Nest] {
        &self.nests
    }

    /// The nest behind a handle.
    pub fn nest(&self, handle: NestHandle) -> Option<&Nest> {
        self.nests.get(handle.index())
    }

    /// Home nest of an agent.
    pub fn home_of(&self, agent: &Agent) -> Option<&Nest> {
        self.nest(agent.home)
    }

    /// Parameters the world was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Recent state transitions, newest first.
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Iterates over every live scent sample.
    pub fn samples(&self) -> impl Iterator<Item = &ScentSample> {
        self.field.samples()
    }

    /// Number of agents currently in `state`.
    pub fn count_in_state(&self, state: AgentState) -> usize {
        self.agents.iter().filter(|agent| agent.state == state).count()
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
