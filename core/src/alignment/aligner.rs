use crate::alignment::window::AlignmentWindow;
use crate::array::dataset::SensorDataset;
use crate::array::geometry::RunParameters;
use crate::prelude::{BeamError, BeamResult};
use crate::telemetry::log::LogManager;
use std::ops::Range;

/// Per-sensor placement of a recording on the beam's sample grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorAlignment {
    pub index: usize,
    pub shift: f64,
    pub shifted_start: f64,
    pub shifted_end: f64,
    /// Input sample read for beam slot 0.
    pub sample_offset: usize,
    /// Beam slots this sensor has data for.
    pub valid_outputs: Range<usize>,
}

impl SensorAlignment {
    /// Input sample index feeding beam slot `output`.
    pub fn input_index(&self, output: usize) -> usize {
        output + self.sample_offset
    }
}

/// Everything the beamformer needs to lay recordings onto a common grid.
#[derive(Debug, Clone)]
pub struct AlignmentPlan {
    pub window: AlignmentWindow,
    pub sample_rate: f64,
    /// Number of beam slots.
    pub length: usize,
    pub sensors: Vec<SensorAlignment>,
}

impl AlignmentPlan {
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }
}

/// Computes per-sensor time shifts and the common overlap window.
pub struct TimeAligner {
    logger: LogManager,
}

impl TimeAligner {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("aligner"),
        }
    }

    /// Shifts each sensor by the projection of its centroid-relative
    /// position onto the slowness vector.
    pub fn shifts(dataset: &SensorDataset, params: &RunParameters) -> Vec<f64> {
        let (average_lat, average_lon) = dataset.centroid();
        let slowness = params.slowness_vector();
        dataset
            .sites()
            .iter()
            .map(|site| {
                slowness.time_shift(site.latitude - average_lat, site.longitude - average_lon)
            })
            .collect()
    }

    pub fn align(
        &self,
        dataset: &SensorDataset,
        params: &RunParameters,
    ) -> BeamResult<AlignmentPlan> {
        let shifts = Self::shifts(dataset, params);
        self.logger.detail(&format!(
            "slowness {:.4} s/km back azimuth {:.2} deg",
            params.slowness, params.back_azimuth
        ));
        self.align_with_shifts(dataset, &shifts)
    }

    /// Builds the plan from explicit per-sensor shifts in seconds.
    pub fn align_with_shifts(
        &self,
        dataset: &SensorDataset,
        shifts: &[f64],
    ) -> BeamResult<AlignmentPlan> {
        if shifts.len() != dataset.sensor_count() {
            return Err(BeamError::Parameter(format!(
                "{} shifts for {} sensors",
                shifts.len(),
                dataset.sensor_count()
            )));
        }
        if let Some(index) = shifts.iter().position(|shift| !shift.is_finite()) {
            return Err(BeamError::Geometry(format!(
                "sensor {} has a non-finite time shift",
                index
            )));
        }

        let recording_span = (dataset.sample_count() - 1) as f64 / dataset.sample_rate();
        let intervals: Vec<(f64, f64)> = dataset
            .sites()
            .iter()
            .zip(shifts)
            .map(|(site, shift)| {
                let start = site.start_time + shift;
                (start, start + recording_span)
            })
            .collect();

        let window = AlignmentWindow::intersect(intervals.iter().copied());
        if window.is_degenerate() {
            return Err(BeamError::Geometry(format!(
                "no common overlap: beam start {:.6} beam end {:.6}",
                window.beam_start, window.beam_end
            )));
        }

        let rate = dataset.sample_rate();
        let offsets: Vec<usize> = intervals
            .iter()
            .map(|&(start, _)| ((window.beam_start - start) * rate).round().max(0.0) as usize)
            .collect();

        let nominal = (window.duration() * rate).round() as usize + 1;
        let available = offsets
            .iter()
            .map(|&offset| dataset.sample_count().saturating_sub(offset))
            .min()
            .unwrap_or(0);
        let length = nominal.min(available);
        if length == 0 {
            return Err(BeamError::Geometry(
                "overlap window rounds to zero samples".into(),
            ));
        }
        if length < nominal {
            self.logger.caution(&format!(
                "window trimmed from {} to {} samples by grid rounding",
                nominal, length
            ));
        }

        let sensors = intervals
            .iter()
            .zip(shifts)
            .zip(&offsets)
            .enumerate()
            .map(|(index, ((&(shifted_start, shifted_end), &shift), &sample_offset))| {
                let covered = dataset.sample_count().saturating_sub(sample_offset);
                SensorAlignment {
                    index,
                    shift,
                    shifted_start,
                    shifted_end,
                    sample_offset,
                    valid_outputs: 0..covered.min(length),
                }
            })
            .collect();

        self.logger.record(&format!(
            "beam start {:.6} beam end {:.6} length {:.6} s ({} samples)",
            window.beam_start,
            window.beam_end,
            window.duration(),
            length
        ));

        Ok(AlignmentPlan {
            window,
            sample_rate: rate,
            length,
            sensors,
        })
    }
}

impl Default for TimeAligner {
    fn default() -> Self {
        Self::new()
    }
}
