use crate::generator::template::ricker;
use anyhow::{ensure, Context};
use beamcore::array::{centroid, RecordingEpoch, SensorDataset, SensorSite};
use beamcore::RunParameters;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Configuration for generating a synthetic sensor array recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub sensors: usize,
    pub sample_rate: f64,
    /// Absolute time of the first sample.
    pub epoch_start: f64,
    /// Recording length in seconds.
    pub duration: f64,
    pub center_latitude: f64,
    pub center_longitude: f64,
    /// Ring radius in degrees.
    pub aperture: f64,
    /// Largest per-sensor clock offset in seconds.
    pub start_jitter: f64,
    /// Seconds after `epoch_start` at which the wavefront crosses the centroid.
    pub arrival: f64,
    pub frequency: f64,
    pub amplitude: f64,
    pub noise: f64,
    pub seed: u64,
    /// Slowness and back azimuth of the synthetic wavefront.
    pub wave: RunParameters,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sensors: 9,
            sample_rate: 40.0,
            epoch_start: 1_708_968_343.0,
            duration: 1200.025,
            center_latitude: 64.77,
            center_longitude: -146.89,
            aperture: 0.05,
            start_jitter: 0.0,
            arrival: 600.0,
            frequency: 2.0,
            amplitude: 1.0,
            noise: 0.05,
            seed: 0,
            wave: default_wave(),
        }
    }
}

pub fn default_wave() -> RunParameters {
    RunParameters {
        slowness: 0.06,
        back_azimuth: 135.0,
        ..RunParameters::default()
    }
}

impl GeneratorConfig {
    pub fn sample_count(&self) -> usize {
        (self.duration * self.sample_rate).round() as usize + 1
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.sensors > 0, "generator needs at least one sensor");
        ensure!(
            self.sample_rate.is_finite() && self.sample_rate > 0.0,
            "sample rate must be positive"
        );
        ensure!(
            self.duration.is_finite() && self.duration > 0.0,
            "duration must be positive"
        );
        ensure!(
            self.start_jitter >= 0.0 && self.noise >= 0.0,
            "jitter and noise must not be negative"
        );
        Ok(())
    }

    fn positions(&self) -> Vec<(f64, f64)> {
        if self.sensors == 1 {
            return vec![(self.center_latitude, self.center_longitude)];
        }
        (0..self.sensors)
            .map(|index| {
                let angle = 2.0 * PI * index as f64 / self.sensors as f64;
                (
                    self.center_latitude + self.aperture * angle.cos(),
                    self.center_longitude + self.aperture * angle.sin(),
                )
            })
            .collect()
    }
}

/// Builds a dataset in which a single wavelet sweeps across the array.
///
/// Sensor `i` records the wavelet at `arrival - shift_i`, so beaming with
/// the generator's own wave parameters lines every copy up at `arrival`.
pub fn build_dataset(config: &GeneratorConfig) -> anyhow::Result<SensorDataset> {
    config.validate()?;
    let sample_count = config.sample_count();
    let positions = config.positions();
    let mut rng = StdRng::seed_from_u64(config.seed);

    let sites: Vec<SensorSite> = positions
        .iter()
        .map(|&(latitude, longitude)| {
            let jitter = if config.start_jitter > 0.0 {
                rng.gen_range(-config.start_jitter..=config.start_jitter)
            } else {
                0.0
            };
            SensorSite::new(config.epoch_start + jitter, latitude, longitude)
        })
        .collect();

    let (average_lat, average_lon) = centroid(&sites);
    let slowness = config.wave.slowness_vector();
    let arrival = config.epoch_start + config.arrival;

    let mut samples = Array2::<f64>::zeros((sites.len(), sample_count));
    for (site, mut row) in sites.iter().zip(samples.rows_mut()) {
        let shift =
            slowness.time_shift(site.latitude - average_lat, site.longitude - average_lon);
        let local_arrival = arrival - shift;
        for (index, value) in row.iter_mut().enumerate() {
            let t = site.start_time + index as f64 / config.sample_rate;
            let jitter = if config.noise > 0.0 {
                rng.gen_range(-config.noise..config.noise)
            } else {
                0.0
            };
            *value = config.amplitude * ricker(t - local_arrival, config.frequency) + jitter;
        }
    }

    let epoch = RecordingEpoch {
        start: config.epoch_start,
        end: config.epoch_start + config.duration,
    };
    SensorDataset::new(config.sample_rate, epoch, sites, samples)
        .context("assembling synthetic sensor dataset")
}
