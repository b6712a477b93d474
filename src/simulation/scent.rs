//! Scent samples left behind by agents.
//!
//! A sample is a point deposit tagged with the depositing colony. It only ever
//! lives inside a [`ScentField`](super::scent_field::ScentField) bucket.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::locatable::Locatable;

/// A decaying scent deposit.
///
/// Samples start with the deposit strength and lose strength linearly over
/// time. The field evicts a sample as soon as its strength drops to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScentSample {
    /// Position in 2D space where the sample was deposited.
    pub pos: Array1<f32>,
    /// Id of the nest whose agent left this sample.
    pub owner_id: u32,
    /// Remaining strength.
    pub strength: f32,
    /// Seconds since deposit.
    pub age: f32,
}

impl ScentSample {
    /// Creates a fresh sample with zero age.
    pub fn new(pos: Array1<f32>, owner_id: u32, strength: f32) -> Self {
        Self {
            pos,
            owner_id,
            strength,
            age: 0.0,
        }
    }

    /// Ages the sample by `dt` and removes `rate * dt` of its strength.
    pub fn decay(&mut self, rate: f32, dt: f32) {
        self.strength -= rate * dt;
        self.age += dt;
    }

    /// Checks if this sample has faded out.
    ///
    /// # Returns
    ///
    /// `true` if strength is <= 0, `false` otherwise.
    pub fn is_expired(&self) -> bool {
        self.strength <= 0.0
    }
}

impl Locatable for ScentSample {
    fn pos(&self) -> &Array1<f32> {
        &self.pos
    }
}
