//! Wheel encoder simulation.
//!
//! Integrates commanded wheel angular velocities into cumulative encoder
//! angles, with optional multiplicative slip noise for realism.

use crate::runtime::WheelPositions;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Simulated encoder pair reporting cumulative wheel angles in radians.
pub struct EncoderBank {
    left: f32,
    right: f32,
    /// Slip noise standard deviation (multiplicative on each delta)
    slip_stddev: f32,
    rng: SmallRng,
}

impl EncoderBank {
    /// Create an encoder bank.
    ///
    /// A seed of 0 draws entropy for non-deterministic runs; any other seed
    /// makes the slip noise reproducible.
    pub fn new(slip_stddev: f32, seed: u64) -> Self {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Self {
            left: 0.0,
            right: 0.0,
            slip_stddev,
            rng,
        }
    }

    /// Integrate one timestep of the commanded wheel velocities.
    pub fn integrate(&mut self, left_omega: f32, right_omega: f32, dt: f32) -> WheelPositions {
        self.left += left_omega * dt * self.slip_factor();
        self.right += right_omega * dt * self.slip_factor();
        self.positions()
    }

    /// Current cumulative positions.
    pub fn positions(&self) -> WheelPositions {
        WheelPositions::new(self.left, self.right)
    }

    fn slip_factor(&mut self) -> f32 {
        if self.slip_stddev == 0.0 {
            return 1.0;
        }
        let n: f32 = self.rng.sample(StandardNormal);
        1.0 + n * self.slip_stddev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_noiseless_integration_is_exact() {
        let mut encoders = EncoderBank::new(0.0, 42);

        for _ in 0..100 {
            encoders.integrate(5.8, 5.8, 0.032);
        }

        let positions = encoders.positions();
        assert!((positions.left - 5.8 * 3.2).abs() < 1e-3);
        assert!((positions.right - 5.8 * 3.2).abs() < 1e-3);
    }

    #[test]
    fn test_opposite_velocities_diverge() {
        let mut encoders = EncoderBank::new(0.0, 42);
        let positions = encoders.integrate(1.0, -1.0, 0.5);

        assert!((positions.left - 0.5).abs() < EPSILON);
        assert!((positions.right + 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let mut a = EncoderBank::new(0.05, 7);
        let mut b = EncoderBank::new(0.05, 7);

        for _ in 0..50 {
            let pa = a.integrate(2.0, 2.0, 0.032);
            let pb = b.integrate(2.0, 2.0, 0.032);
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn test_slip_noise_stays_near_truth() {
        let mut encoders = EncoderBank::new(0.02, 42);

        for _ in 0..1000 {
            encoders.integrate(5.0, 5.0, 0.01);
        }

        // 50 rad of true travel with 2% slip noise
        let positions = encoders.positions();
        assert!((positions.left - 50.0).abs() < 1.0);
        assert!((positions.right - 50.0).abs() < 1.0);
    }
}
