//! Write a synthetic simulation folder for trying out the viewer.
//!
//! Usage: `generate_sample [OUTPUT_DIR] [QUANTITY...]` (default `sample_sim`, all
//! quantities). Leaving a quantity out gives a folder the viewer only partly loads.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use freq_response_viewer::data::assembler::{load_quantity, quantity_dir};
use freq_response_viewer::data::describe::render_report;
use freq_response_viewer::data::model::{Axis, Quantity, RawSample, RawSeries, SENSOR_COUNT};
use freq_response_viewer::data::modes::{modes_path, write_modes};
use freq_response_viewer::data::reader::write_series;
use freq_response_viewer::data::summary::report_path;

/// Resonances shared by every response: (frequency Hz, damping ratio).
const MODES: [(f64, f64); 4] = [(42.5, 0.03), (118.0, 0.02), (236.5, 0.025), (371.0, 0.04)];

/// Single-degree-of-freedom magnitude and phase (degrees) at `f`.
fn resonance(f: f64, fn_: f64, zeta: f64) -> (f64, f64) {
    let r = f / fn_;
    let re = 1.0 - r * r;
    let im = 2.0 * zeta * r;
    (1.0 / (re * re + im * im).sqrt(), -im.atan2(re).to_degrees())
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Typical magnitude of each quantity in solver units.
fn base_level(quantity: Quantity) -> f64 {
    match quantity {
        Quantity::Velocity => 2e-3,
        Quantity::Deformation => 5e-6,
        Quantity::Acceleration => 1.5,
    }
}

fn generate_response(frequencies: &[f64], quantity: Quantity, rng: &mut SimpleRng) -> RawSeries {
    let gains: Vec<f64> = MODES.iter().map(|_| rng.uniform(0.05, 1.0)).collect();
    let level = base_level(quantity);

    let samples = frequencies
        .iter()
        .map(|&f| {
            let (mut amplitude, mut phase, mut weight) = (0.0, 0.0, 0.0);
            for (&(fn_, zeta), gain) in MODES.iter().zip(&gains) {
                let (magnitude, angle) = resonance(f, fn_, zeta);
                amplitude += gain * magnitude;
                phase += gain * magnitude * angle;
                weight += gain * magnitude;
            }
            let noise = 1.0 + rng.uniform(-0.02, 0.02);
            RawSample {
                frequency: f,
                amplitude: level * amplitude * noise / 10.0,
                phase: phase / weight,
            }
        })
        .collect();

    RawSeries {
        source: PathBuf::new(),
        header: String::new(),
        samples,
    }
}

fn write_quantity(folder: &Path, quantity: Quantity, frequencies: &[f64], rng: &mut SimpleRng) -> Result<()> {
    let dir = quantity_dir(folder, quantity);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    for axis in Axis::ALL {
        for sensor in 1..=SENSOR_COUNT {
            let series = generate_response(frequencies, quantity, rng);
            let path = dir.join(format!("DIMM{sensor}{axis}.txt"));
            fs::write(&path, write_series(&series, quantity))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    let dataset = load_quantity(folder, quantity)
        .with_context(|| format!("Generated {quantity} data does not load back"))?;
    for axis in Axis::ALL {
        let path = report_path(folder, quantity, axis);
        fs::write(&path, render_report(quantity, axis, dataset.axis(axis)))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args.next().map_or_else(|| PathBuf::from("sample_sim"), PathBuf::from);
    let mut quantities = args
        .map(|a| a.parse::<Quantity>().map_err(|e| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;
    if quantities.is_empty() {
        quantities = Quantity::ALL.to_vec();
    }
    let mut rng = SimpleRng::new(42);

    // 5 Hz → 500 Hz, step 2.5
    let frequencies: Vec<f64> = (0..=198).map(|i| 5.0 + i as f64 * 2.5).collect();

    for &quantity in &quantities {
        write_quantity(&output, quantity, &frequencies, &mut rng)?;
    }

    let modes: Vec<f64> = MODES.iter().map(|&(f, _)| f).collect();
    let path = modes_path(&output);
    fs::write(&path, write_modes(&modes)).with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "Wrote {} quantities × {} axes × {} sensors ({} frequencies each) to {}",
        quantities.len(),
        Axis::ALL.len(),
        SENSOR_COUNT,
        frequencies.len(),
        output.display()
    );
    Ok(())
}
