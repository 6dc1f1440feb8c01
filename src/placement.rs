//! Seeded random drop positions for quick-added components.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::components::Vec3;
use crate::config::PlacementConfig;

/// Picks where a quick-added component lands.
///
/// Positions are uniform over a square of side `spread` centred on the
/// origin, at a fixed `drop_height`. The same seed always yields the same
/// sequence of positions.
#[derive(Debug, Clone)]
pub struct DropPlacer {
    rng: StdRng,
    spread: f64,
    drop_height: f64,
}

impl DropPlacer {
    /// Creates a placer.
    ///
    /// # Arguments
    ///
    /// * `seed` - Random seed for reproducible placement
    /// * `spread` - Side length of the drop square (negative values are treated as 0)
    /// * `drop_height` - Height of every drop position
    pub fn new(seed: u64, spread: f64, drop_height: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            spread: spread.max(0.0),
            drop_height,
        }
    }

    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(config.seed, config.spread, config.drop_height)
    }

    /// Draws the next drop position.
    pub fn next_position(&mut self) -> Vec3 {
        let half = self.spread / 2.0;
        let x = self.rng.random::<f64>() * self.spread - half;
        let z = self.rng.random::<f64>() * self.spread - half;
        [x, self.drop_height, z]
    }
}

impl Default for DropPlacer {
    fn default() -> Self {
        Self::from_config(&PlacementConfig::default())
    }
}
