//! Sampling bias
//!
//! Reweights a probability distribution toward (or away from) a group of
//! target indices. The decoder uses it to control harmonic rhythm.

use std::f64::consts::FRAC_PI_4;

use crate::error::{HarmonizerError, Result};

/// Weight that removes all mass from the targets.
pub const SUPPRESS: f32 = -1.0;

/// Weight that moves all mass onto the targets.
pub const FORCE: f32 = 1.0;

/// Distribution reweighting primitive
///
/// Boundary contract: weight `0` leaves the distribution unchanged and weight
/// `1` gives the targets all of the mass. Implementations may interpolate
/// however they like in between.
pub trait SamplingBias: Send + Sync {
    fn adjust(&self, probs: &[f32], targets: &[usize], weight: f32) -> Result<Vec<f32>>;
}

/// Gamma-sampling reweighting.
///
/// The targets' combined mass `p` becomes `p^e` with
/// `e = tan(pi/4 * (1 - weight))`, and both groups are rescaled
/// proportionally so the result still sums to one. Weights run from `-1`
/// (targets removed) through `0` (unchanged) to `1` (targets forced).
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaBias;

impl SamplingBias for GammaBias {
    fn adjust(&self, probs: &[f32], targets: &[usize], weight: f32) -> Result<Vec<f32>> {
        if !(SUPPRESS..=FORCE).contains(&weight) {
            return Err(HarmonizerError::BiasFailure {
                reason: format!("weight {weight} outside -1..=1"),
            });
        }
        if let Some(&bad) = targets.iter().find(|&&t| t >= probs.len()) {
            return Err(HarmonizerError::BiasFailure {
                reason: format!("target {bad} outside distribution of {}", probs.len()),
            });
        }
        if weight == 0.0 || targets.is_empty() {
            return Ok(probs.to_vec());
        }

        let mut is_target = vec![false; probs.len()];
        for &t in targets {
            is_target[t] = true;
        }
        let target_count = is_target.iter().filter(|&&t| t).count();

        let target_mass: f64 = probs
            .iter()
            .zip(&is_target)
            .filter(|&(_, &t)| t)
            .map(|(&p, _)| f64::from(p))
            .sum::<f64>()
            .clamp(0.0, 1.0);

        let exponent = (FRAC_PI_4 * (1.0 - f64::from(weight))).tan();
        let new_mass = target_mass.powf(exponent);

        let rest_mass = 1.0 - target_mass;
        let rest_scale = if rest_mass > 0.0 {
            (1.0 - new_mass) / rest_mass
        } else {
            0.0
        };

        Ok(probs
            .iter()
            .zip(&is_target)
            .map(|(&p, &target)| {
                let p = f64::from(p);
                let adjusted = if !target {
                    p * rest_scale
                } else if target_mass > 0.0 {
                    p * new_mass / target_mass
                } else {
                    new_mass / target_count as f64
                };
                adjusted as f32
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PROBS: [f32; 3] = [0.1, 0.7, 0.2];

    #[test]
    fn test_zero_weight_is_identity() {
        assert_eq!(GammaBias.adjust(&PROBS, &[1], 0.0).unwrap(), PROBS.to_vec());
    }

    #[test]
    fn test_force_moves_all_mass() {
        let adjusted = GammaBias.adjust(&PROBS, &[2], FORCE).unwrap();
        assert_relative_eq!(adjusted[2], 1.0, epsilon = 1e-6);
        assert_relative_eq!(adjusted[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(adjusted[1], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_force_onto_zero_probability_target() {
        let adjusted = GammaBias.adjust(&[0.0, 1.0], &[0], FORCE).unwrap();
        assert_relative_eq!(adjusted[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(adjusted[1], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_suppress_removes_target() {
        let adjusted = GammaBias.adjust(&PROBS, &[0], SUPPRESS).unwrap();
        assert_relative_eq!(adjusted[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(adjusted[1], 0.7 / 0.9, epsilon = 1e-5);
        assert_relative_eq!(adjusted[2], 0.2 / 0.9, epsilon = 1e-5);
    }

    #[test]
    fn test_partial_weight_boosts_target_and_keeps_sum() {
        let adjusted = GammaBias.adjust(&PROBS, &[2], 0.5).unwrap();
        assert!(adjusted[2] > PROBS[2]);
        assert!(adjusted[2] < 1.0);
        assert_relative_eq!(adjusted.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        // Non-targets keep their relative proportions.
        assert_relative_eq!(adjusted[1] / adjusted[0], 7.0, epsilon = 1e-4);
    }

    #[test]
    fn test_target_mass_grows_with_weight() {
        let mut previous = 0.0;
        for weight in [-0.5, 0.0, 0.25, 0.5, 0.75, 1.0] {
            let mass = GammaBias.adjust(&PROBS, &[0], weight).unwrap()[0];
            assert!(mass >= previous, "weight {weight} gave {mass} < {previous}");
            previous = mass;
        }
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(GammaBias.adjust(&PROBS, &[3], 0.5).is_err());
        assert!(GammaBias.adjust(&PROBS, &[0], 1.5).is_err());
        assert!(GammaBias.adjust(&PROBS, &[0], f32::NAN).is_err());
    }
}
