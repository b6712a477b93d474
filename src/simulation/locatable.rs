//! Trait for entities that occupy a point in the arena.
//!
//! Implemented by agents, nests and scent samples so hosts and helpers can treat
//! anything with a position uniformly.

use ndarray::Array1;

use super::geometric_utils;

/// Trait for entities with a position in 2D space.
pub trait Locatable {
    /// Returns a reference to the entity's position.
    ///
    /// # Returns
    ///
    /// A reference to the 2D position vector.
    fn pos(&self) -> &Array1<f32>;

    /// Euclidean distance between this entity and another one.
    fn distance_to(&self, other: &dyn Locatable) -> f32 {
        geometric_utils::distance(self.pos(), other.pos())
    }
}
