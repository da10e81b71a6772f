//! Writes synthetic stopped-flow data for trying the viewer.
//!
//! Two runs of an A → B → C mechanism with different rate constants are
//! written as `sample_kintek.txt` (tab-delimited) and `sample_prodata.csv`
//! (comma-delimited) into the directory given as the first argument.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Concentrations of A, B and C at time `t` for A → B → C, starting from pure A.
fn populations(t: f64, k1: f64, k2: f64) -> [f64; 3] {
    let a = (-k1 * t).exp();
    let b = if (k2 - k1).abs() < 1e-12 {
        k1 * t * a
    } else {
        k1 / (k2 - k1) * ((-k1 * t).exp() - (-k2 * t).exp())
    };
    [a, b, 1.0 - a - b]
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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Run {
    times: Vec<f64>,
    wavelengths: Vec<f64>,
    matrix: Vec<Vec<f64>>,
}

/// Absorbance matrix for one run: rows are time points, columns wavelengths.
fn simulate(k1: f64, k2: f64, noise: f64, rng: &mut SimpleRng) -> Run {
    // 1 ms to 2 s, log-spaced like a stopped-flow acquisition.
    let times: Vec<f64> = (0..120)
        .map(|i| 1e-3 * 2000f64.powf(i as f64 / 119.0))
        .collect();
    let wavelengths: Vec<f64> = (0..=100).map(|i| 300.0 + i as f64 * 4.0).collect();

    // (centre nm, width nm, amplitude) per species.
    let bands = [(360.0, 30.0, 0.9), (450.0, 40.0, 0.6), (540.0, 35.0, 0.8)];

    let matrix = times
        .iter()
        .map(|&t| {
            let c = populations(t, k1, k2);
            wavelengths
                .iter()
                .map(|&w| {
                    let signal: f64 = c
                        .iter()
                        .zip(&bands)
                        .map(|(&ci, &(mu, sigma, amp))| ci * gaussian(w, mu, sigma, amp))
                        .sum();
                    signal + rng.gauss(0.0, noise)
                })
                .collect()
        })
        .collect();

    Run {
        times,
        wavelengths,
        matrix,
    }
}

fn write_run(run: &Run, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let header = std::iter::once("Time".to_string()).chain(run.wavelengths.iter().map(|w| w.to_string()));
    writer.write_record(header)?;
    for (t, row) in run.times.iter().zip(&run.matrix) {
        let record = std::iter::once(t.to_string()).chain(row.iter().map(|v| format!("{v:.6}")));
        writer.write_record(record)?;
    }
    writer.flush()?;

    info!(
        "Wrote {} time points x {} wavelengths to {}",
        run.times.len(),
        run.wavelengths.len(),
        path.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    let fast = simulate(40.0, 4.0, 0.003, &mut rng);
    write_run(&fast, &out_dir.join("sample_kintek.txt"), b'\t')?;

    let slow = simulate(15.0, 2.0, 0.003, &mut rng);
    write_run(&slow, &out_dir.join("sample_prodata.csv"), b',')?;

    println!("Wrote sample_kintek.txt and sample_prodata.csv to {}", out_dir.display());
    Ok(())
}
