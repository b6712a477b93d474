use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::SimulationError;
use super::nest::Rgba;
use super::scent_field::{self, MAX_GRID_CELLS};

/// Simulation parameters that control arena, colony and scent behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Arena width.
    pub box_width: f32,
    /// Arena height.
    pub box_height: f32,
    /// Side length of one scent grid cell.
    pub cell_size: f32,
    /// Number of nests placed by [`World::new`](super::world::World::new).
    pub n_nests: usize,
    /// Agents spawned at every nest.
    pub agents_per_nest: usize,
    /// Radius of the circular nest zone.
    pub nest_radius: f32,
    /// Minimum distance between a randomly placed nest and the arena edge.
    pub nest_margin: f32,
    /// Colony colors, assigned to nests in order and cycled when exhausted.
    pub nest_colors: Vec<Rgba>,
    /// Radius within which agents sense scent.
    pub detection_radius: f32,
    /// Agent travel speed (units per second).
    pub movement_speed: f32,
    /// Side length of an agent's square body.
    pub agent_size: f32,
    /// Maximum heading perturbation per second while exploring (radians).
    pub wander_strength: f32,
    /// Strength of the sample an exploring agent leaves every tick.
    pub deposit_strength: f32,
    /// Strength lost by every scent sample per second.
    pub pheromone_decay_rate: f32,
    /// Strength at which a sample is drawn fully opaque.
    pub max_pheromone_strength: f32,
    /// How long a returning agent keeps its last heading after losing the trail (seconds).
    pub max_lost_trail_wander_time: f32,
    /// Time an agent spends inside its nest before exploring again (seconds).
    pub rest_duration: f32,
    /// Seed for the world's random generator. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Number of state transitions kept in the event log.
    pub event_log_size: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            box_width: 1200.0,
            box_height: 800.0,
            cell_size: 20.0,
            n_nests: 2,
            agents_per_nest: 50,
            nest_radius: 30.0,
            nest_margin: 100.0,
            nest_colors: Rgba::PALETTE.to_vec(),
            detection_radius: 20.0,
            movement_speed: 50.0,
            agent_size: 5.0,
            wander_strength: 1.5,
            deposit_strength: 1.0,
            pheromone_decay_rate: 0.5,
            max_pheromone_strength: 10.0,
            max_lost_trail_wander_time: 1.5,
            rest_duration: 2.0,
            seed: None,
            event_log_size: 20,
        }
    }
}

impl Params {
    /// Checks that every parameter is usable.
    ///
    /// Sizes and the cell size must be finite and strictly positive; rates,
    /// radii and durations must be finite and non-negative. Agents must be
    /// smaller than the arena and the scent grid may hold at most
    /// [`MAX_GRID_CELLS`] cells.
    pub fn validate(&self) -> Result<(), SimulationError> {
        positive("box_width", self.box_width)?;
        positive("box_height", self.box_height)?;
        positive("cell_size", self.cell_size)?;
        positive("nest_radius", self.nest_radius)?;
        positive("deposit_strength", self.deposit_strength)?;
        positive("max_pheromone_strength", self.max_pheromone_strength)?;
        non_negative("detection_radius", self.detection_radius)?;
        non_negative("movement_speed", self.movement_speed)?;
        non_negative("agent_size", self.agent_size)?;
        non_negative("wander_strength", self.wander_strength)?;
        non_negative("pheromone_decay_rate", self.pheromone_decay_rate)?;
        non_negative("max_lost_trail_wander_time", self.max_lost_trail_wander_time)?;
        non_negative("rest_duration", self.rest_duration)?;

        if self.agent_size >= self.box_width.min(self.box_height) {
            return Err(SimulationError::invalid(
                "agent_size",
                format!(
                    "{} does not fit in a {} x {} arena",
                    self.agent_size, self.box_width, self.box_height
                ),
            ));
        }
        if scent_field::grid_dimensions(self.box_width, self.box_height, self.cell_size).is_none() {
            return Err(SimulationError::invalid(
                "cell_size",
                format!(
                    "{} splits a {} x {} arena into more than {MAX_GRID_CELLS} cells",
                    self.cell_size, self.box_width, self.box_height
                ),
            ));
        }

        if self.nest_colors.is_empty() {
            return Err(SimulationError::invalid(
                "nest_colors",
                "at least one color is required",
            ));
        }
        Ok(())
    }

    /// Loads parameters from a JSON file. Missing fields take their default value.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Color for the nest at `index`, cycling through the palette.
    pub fn nest_color(&self, index: usize) -> Rgba {
        self.nest_colors[index % self.nest_colors.len()]
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            field,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            field,
            format!("must be finite and >= 0, got {value}"),
        ))
    }
}
