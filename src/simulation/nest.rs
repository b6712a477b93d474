//! Nests: fixed circular home zones that spawn agents.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::geometric_utils;
use super::locatable::Locatable;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Opaque red.
    pub const RED: Self = Self::opaque(255, 0, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::opaque(0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::opaque(0, 128, 0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::opaque(255, 255, 0);
    /// Opaque purple.
    pub const PURPLE: Self = Self::opaque(128, 0, 128);

    /// Default colony palette.
    pub const PALETTE: [Self; 5] = [Self::RED, Self::BLUE, Self::GREEN, Self::YELLOW, Self::PURPLE];

    /// Creates a fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Linearly blends the color channels toward black by `amount` in `[0, 1]`.
    /// Alpha is kept.
    pub fn darken(self, amount: f32) -> Self {
        let keep = 1.0 - amount.clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * keep).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }
}

/// Stable handle of a nest inside the world's nest list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestHandle(pub usize);

impl NestHandle {
    /// Position of the nest in the world's nest list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A circular nest zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nest {
    /// Colony id. Agents of this nest tag their scent with it.
    pub id: u32,
    /// Center of the zone.
    pub pos: Array1<f32>,
    /// Colony color, inherited by spawned agents.
    pub color: Rgba,
    /// Radius of the zone.
    pub radius: f32,
}

impl Nest {
    /// Darkening applied to the colony color when drawing the nest itself.
    const FILL_DARKEN: f32 = 0.4;

    /// Creates a new nest.
    pub fn new(id: u32, pos: Array1<f32>, color: Rgba, radius: f32) -> Self {
        Self {
            id,
            pos,
            color,
            radius,
        }
    }

    /// Spawns an agent at the nest center heading in a uniformly random direction.
    ///
    /// The nest keeps no record of the agent; ownership passes to the caller.
    ///
    /// # Arguments
    ///
    /// * `home` - Handle under which this nest is stored in the world
    /// * `speed` - Travel speed of the new agent
    /// * `rng` - Random generator used for the initial heading
    pub fn spawn_agent(&self, home: NestHandle, speed: f32, rng: &mut impl Rng) -> Agent {
        let heading = rng.random_range(0.0..std::f32::consts::TAU);
        Agent::new(self, home, heading, speed)
    }

    /// Returns `true` if `pos` lies inside the circular zone (boundary included).
    pub fn is_position_inside(&self, pos: &Array1<f32>) -> bool {
        geometric_utils::distance_squared(&self.pos, pos) <= self.radius * self.radius
    }

    /// Color used to draw the nest zone.
    pub fn fill_color(&self) -> Rgba {
        self.color.darken(Self::FILL_DARKEN)
    }
}

impl Locatable for Nest {
    fn pos(&self) -> &Array1<f32> {
        &self.pos
    }
}
