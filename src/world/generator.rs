//! Per-tile terrain derivation.
//!
//! Everything produced here is a pure function of `(seed, x, y)`: altitude
//! comes from the shared noise field, resources and forest cover from two
//! tile-local streams salted with different prime pairs.

use crate::noise::NoiseField;
use crate::rng::{mix_seed, SeededRng};

use super::tile::{Resources, Tile};

const ALTITUDE_FREQUENCY: f64 = 0.1;
const ALTITUDE_SCALE: f64 = 30.0;
const ALTITUDE_OFFSET: f64 = 10.0;

const RESOURCE_PRIMES: (i32, i32) = (73_856_093, 19_349_663);
const FOREST_PRIMES: (i32, i32) = (83_492_791, 39_916_801);

const FOREST_MIN_ALTITUDE: i32 = -3;
const FOREST_FREQUENCY: f64 = 0.05;
const FOREST_NOISE_THRESHOLD: f64 = 0.3;
const FOREST_ROLL_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    seed: i32,
    noise: NoiseField,
}

impl TerrainGenerator {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            noise: NoiseField::new(seed),
        }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn altitude_at(&self, x: i32, y: i32) -> i32 {
        let sample = self
            .noise
            .sample(x as f64 * ALTITUDE_FREQUENCY, y as f64 * ALTITUDE_FREQUENCY);
        (sample * ALTITUDE_SCALE - ALTITUDE_OFFSET).round() as i32
    }

    pub fn generate(&self, x: i32, y: i32) -> Tile {
        let altitude = self.altitude_at(x, y);

        let mut resource_rng = tile_stream(self.seed, x, y, RESOURCE_PRIMES);
        let resources = roll_resources(altitude, &mut resource_rng);

        let mut is_forest = false;
        let mut forest_health = 0.0;
        if altitude > FOREST_MIN_ALTITUDE {
            let mut forest_rng = tile_stream(self.seed, x, y, FOREST_PRIMES);
            let forest_noise = self
                .noise
                .sample(x as f64 * FOREST_FREQUENCY, y as f64 * FOREST_FREQUENCY);
            let roll = forest_rng.next_f64();
            if forest_noise > FOREST_NOISE_THRESHOLD && roll > FOREST_ROLL_THRESHOLD {
                is_forest = true;
                forest_health = forest_rng.next_int(70, 100) as f64;
            }
        }

        Tile {
            x,
            y,
            altitude,
            resources,
            is_forest,
            forest_health,
            structure: None,
        }
    }
}

fn tile_stream(seed: i32, x: i32, y: i32, primes: (i32, i32)) -> SeededRng {
    let salt = x.wrapping_mul(primes.0) ^ y.wrapping_mul(primes.1);
    SeededRng::new(mix_seed(seed, salt))
}

/// Mineral deposits for a tile at `altitude`. Tighter bands win.
pub fn roll_resources(altitude: i32, rng: &mut SeededRng) -> Resources {
    let depth = altitude.abs();
    let stone = rng.next_int(50, 150) as f64;
    let iron = if depth < 5 {
        rng.next_int(20, 80) as f64
    } else if depth < 10 {
        rng.next_int(5, 30) as f64
    } else {
        0.0
    };
    let uranium = if depth < 3 {
        rng.next_int(1, 10) as f64
    } else if depth < 8 {
        rng.next_int(0, 5) as f64
    } else {
        0.0
    };
    Resources {
        stone,
        iron,
        uranium,
    }
}
