//! Unit normalization of raw result rows.
//!
//! Conversion always produces a new [`SensorSeries`] from a [`RawSeries`];
//! the raw rows are left untouched, so a series can never be scaled twice.

use super::model::{Axis, Quantity, RawSeries, Sample, SensorSeries};

/// m/s² per g.
pub const STANDARD_GRAVITY: f64 = 9.81;

pub const METERS_TO_MILLIMETERS: f64 = 1000.0;

/// Derive display-unit fields for `quantity`.
///
/// * acceleration: keeps m/s² and adds the g value as `amplitude_alt`
/// * deformation: meters become millimeters
/// * velocity: unchanged
pub fn normalize(raw: &RawSeries, quantity: Quantity, axis: Axis, sensor: usize) -> SensorSeries {
    let samples = raw
        .samples
        .iter()
        .map(|r| match quantity {
            Quantity::Acceleration => Sample {
                frequency: r.frequency,
                amplitude: r.amplitude,
                amplitude_alt: Some(r.amplitude / STANDARD_GRAVITY),
                phase: r.phase,
            },
            Quantity::Deformation => Sample {
                frequency: r.frequency,
                amplitude: r.amplitude * METERS_TO_MILLIMETERS,
                amplitude_alt: None,
                phase: r.phase,
            },
            Quantity::Velocity => Sample {
                frequency: r.frequency,
                amplitude: r.amplitude,
                amplitude_alt: None,
                phase: r.phase,
            },
        })
        .collect();

    SensorSeries {
        quantity,
        axis,
        sensor,
        source: raw.source.clone(),
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawSample;
    use std::path::PathBuf;

    fn raw(amplitudes: &[f64]) -> RawSeries {
        RawSeries {
            source: PathBuf::from("DIMM1x.txt"),
            header: String::new(),
            samples: amplitudes
                .iter()
                .enumerate()
                .map(|(i, &amplitude)| RawSample {
                    frequency: (i + 1) as f64,
                    amplitude,
                    phase: -90.0,
                })
                .collect(),
        }
    }

    #[test]
    fn acceleration_adds_g_and_keeps_si() {
        let input = raw(&[9.81, 2.0, 0.0]);
        let out = normalize(&input, Quantity::Acceleration, Axis::Z, 3);
        for (r, s) in input.samples.iter().zip(&out.samples) {
            assert_eq!(s.amplitude, r.amplitude);
            assert_eq!(s.amplitude_alt, Some(r.amplitude / 9.81));
        }
        assert!((out.samples[0].amplitude_alt.unwrap_or_default() - 1.0).abs() < 1e-12);
        assert_eq!(out.sensor, 3);
        assert_eq!(out.axis, Axis::Z);
    }

    #[test]
    fn deformation_is_scaled_to_millimeters_once() {
        let input = raw(&[0.002, 1.5e-6]);
        let out = normalize(&input, Quantity::Deformation, Axis::X, 1);
        assert_eq!(out.samples[0].amplitude, 1000.0 * 0.002);
        assert_eq!(out.samples[1].amplitude, 1000.0 * 1.5e-6);
        assert!(out.samples.iter().all(|s| s.amplitude_alt.is_none()));

        // Normalizing the same raw rows again gives the same values, not 1e6×.
        let again = normalize(&input, Quantity::Deformation, Axis::X, 1);
        assert_eq!(out, again);
        assert_eq!(input.samples[0].amplitude, 0.002);
    }

    #[test]
    fn velocity_passes_through() {
        let input = raw(&[0.25]);
        let out = normalize(&input, Quantity::Velocity, Axis::Y, 8);
        assert_eq!(out.samples[0].amplitude, 0.25);
        assert_eq!(out.samples[0].phase, -90.0);
        assert_eq!(out.samples[0].frequency, 1.0);
    }
}
