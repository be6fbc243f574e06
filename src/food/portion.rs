//! Portion size estimation
//!
//! The estimator is a strategy trait so the current reference-portion
//! placeholder can later be replaced by a real image-based estimator
//! without touching the matcher or calculator contracts.

use std::sync::Mutex;

use image::DynamicImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::table::FoodTable;

/// Portion assumed when a food has no standard portion entry
pub const DEFAULT_PORTION_G: f64 = 100.0;

/// Lower bound of the sampled variation factor
const VARIATION_MIN: f64 = 0.7;
/// Upper bound of the sampled variation factor
const VARIATION_MAX: f64 = 1.3;

/// Strategy for estimating the consumed mass of a matched food
pub trait PortionEstimator: Send + Sync {
    /// Estimated portion mass in grams
    ///
    /// `image` is available for estimators that measure from pixels; the
    /// reference implementation ignores it.
    fn estimate(&self, image: Option<&DynamicImage>, food_key: &str, table: &FoodTable) -> f64;
}

/// Reference-portion estimator
///
/// Looks up the standard portion for the food (default 100 g) and applies
/// a uniformly sampled variation factor in [0.7, 1.3]. Not derived from
/// image content.
pub struct ReferencePortionEstimator {
    rng: Mutex<StdRng>,
}

impl ReferencePortionEstimator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded construction for reproducible estimates
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for ReferencePortionEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PortionEstimator for ReferencePortionEstimator {
    fn estimate(&self, _image: Option<&DynamicImage>, food_key: &str, table: &FoodTable) -> f64 {
        let standard = table.standard_portion(food_key).unwrap_or(DEFAULT_PORTION_G);
        let variation = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(VARIATION_MIN..=VARIATION_MAX),
            // A poisoned lock only means another estimate panicked; fall
            // back to the standard portion.
            Err(_) => 1.0,
        };
        super::calculator::round1(standard * variation)
    }
}
