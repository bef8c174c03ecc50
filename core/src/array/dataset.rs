use crate::array::geometry::centroid;
use crate::prelude::{BeamError, BeamResult};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Location and clock of one sensor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensorSite {
    /// Absolute time of the first sample, in seconds.
    pub start_time: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl SensorSite {
    pub fn new(start_time: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            start_time,
            latitude,
            longitude,
        }
    }
}

/// Nominal start/end of the recording epoch the dataset was cut from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RecordingEpoch {
    pub start: f64,
    pub end: f64,
}

impl RecordingEpoch {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Read-only handle over a fixed set of sensor recordings sharing one
/// sample rate and one sample count.
///
/// Row `i` of `samples` belongs to `sites[i]`.
#[derive(Debug, Clone)]
pub struct SensorDataset {
    sample_rate: f64,
    epoch: RecordingEpoch,
    sites: Vec<SensorSite>,
    samples: Array2<f64>,
}

impl SensorDataset {
    pub fn new(
        sample_rate: f64,
        epoch: RecordingEpoch,
        sites: Vec<SensorSite>,
        samples: Array2<f64>,
    ) -> BeamResult<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(BeamError::Dataset(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        if sites.is_empty() {
            return Err(BeamError::Dataset("dataset has no sensors".into()));
        }
        if samples.nrows() != sites.len() {
            return Err(BeamError::Dataset(format!(
                "{} sample rows for {} sensors",
                samples.nrows(),
                sites.len()
            )));
        }
        if samples.ncols() == 0 {
            return Err(BeamError::Dataset("recordings hold no samples".into()));
        }
        if let Some(index) = sites.iter().position(|site| {
            let values = [site.start_time, site.latitude, site.longitude];
            !values.iter().all(|value| value.is_finite())
        }) {
            return Err(BeamError::Dataset(format!(
                "sensor {} has non-finite metadata",
                index
            )));
        }

        Ok(Self {
            sample_rate,
            epoch,
            sites,
            samples,
        })
    }

    /// Builds a dataset where every sensor starts at the epoch start.
    pub fn with_common_start(
        sample_rate: f64,
        epoch: RecordingEpoch,
        positions: &[(f64, f64)],
        samples: Array2<f64>,
    ) -> BeamResult<Self> {
        let sites = positions
            .iter()
            .map(|&(latitude, longitude)| SensorSite::new(epoch.start, latitude, longitude))
            .collect();
        Self::new(sample_rate, epoch, sites, samples)
    }

    pub fn sensor_count(&self) -> usize {
        self.sites.len()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.ncols()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn epoch(&self) -> RecordingEpoch {
        self.epoch
    }

    pub fn sites(&self) -> &[SensorSite] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> Option<&SensorSite> {
        self.sites.get(index)
    }

    /// Mean sensor position as `(latitude, longitude)`.
    pub fn centroid(&self) -> (f64, f64) {
        centroid(&self.sites)
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.samples.row(index)
    }

    /// Absolute time of the last sample of sensor `index`.
    pub fn end_time(&self, index: usize) -> Option<f64> {
        self.site(index).map(|site| {
            site.start_time + (self.sample_count() - 1) as f64 / self.sample_rate
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> RecordingEpoch {
        RecordingEpoch {
            start: 100.0,
            end: 100.9,
        }
    }

    #[test]
    fn dataset_rejects_row_count_mismatch() {
        let samples = Array2::<f64>::zeros((3, 10));
        let result = SensorDataset::with_common_start(10.0, epoch(), &[(0.0, 0.0)], samples);
        assert!(matches!(result, Err(BeamError::Dataset(_))));
    }

    #[test]
    fn dataset_rejects_non_positive_rate() {
        let samples = Array2::<f64>::zeros((1, 10));
        let result = SensorDataset::with_common_start(0.0, epoch(), &[(0.0, 0.0)], samples);
        assert!(matches!(result, Err(BeamError::Dataset(_))));
    }

    #[test]
    fn dataset_rejects_empty_recordings() {
        let samples = Array2::<f64>::zeros((1, 0));
        let result = SensorDataset::with_common_start(10.0, epoch(), &[(0.0, 0.0)], samples);
        assert!(matches!(result, Err(BeamError::Dataset(_))));
    }

    #[test]
    fn end_time_spans_sample_count() {
        let samples = Array2::<f64>::zeros((2, 10));
        let dataset =
            SensorDataset::with_common_start(10.0, epoch(), &[(0.0, 0.0), (1.0, 1.0)], samples)
                .unwrap();
        assert_eq!(dataset.sensor_count(), 2);
        assert!((dataset.end_time(1).unwrap() - 100.9).abs() < 1e-9);
        assert!(dataset.end_time(2).is_none());
    }
}
