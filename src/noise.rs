//! Seeded 2D gradient noise used for terrain shape.

use crate::rng::SeededRng;

const TABLE_SIZE: usize = 256;

#[derive(Clone)]
pub struct NoiseField {
    permutation: [u8; TABLE_SIZE * 2],
}

impl NoiseField {
    pub fn new(seed: i32) -> Self {
        let mut table = [0u8; TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates shuffle
        let mut rng = SeededRng::from_world_seed(seed);
        for i in (1..TABLE_SIZE).rev() {
            let j = rng.next_int(0, i as i64) as usize;
            table.swap(i, j);
        }

        let mut permutation = [0u8; TABLE_SIZE * 2];
        for (i, slot) in permutation.iter_mut().enumerate() {
            *slot = table[i % TABLE_SIZE];
        }
        Self { permutation }
    }

    /// Sample the field at real coordinates. Output lies roughly in `[-1, 1]`
    /// and is exactly zero on lattice points.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = (x_floor as i64 & 255) as usize;
        let yi = (y_floor as i64 & 255) as usize;
        let xf = x - x_floor;
        let yf = y - y_floor;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.permutation;
        let a = p[xi] as usize + yi;
        let b = p[xi + 1] as usize + yi;
        let aa = p[a];
        let ab = p[a + 1];
        let ba = p[b];
        let bb = p[b + 1];

        let x1 = lerp(u, grad(aa, xf, yf), grad(ba, xf - 1.0, yf));
        let x2 = lerp(u, grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0));
        lerp(v, x1, x2)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("head", &&self.permutation[..8])
            .finish()
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}
