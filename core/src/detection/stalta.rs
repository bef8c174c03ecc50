use crate::detection::event::{DetectionEvent, DetectionReport, DetectorState};
use crate::prelude::{BeamError, BeamResult};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Window lengths (in samples past the current one) and trigger ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StaLtaConfig {
    pub sta_length: usize,
    pub lta_length: usize,
    pub threshold: f64,
}

impl Default for StaLtaConfig {
    fn default() -> Self {
        Self {
            sta_length: 40,
            lta_length: 400,
            threshold: 2.5,
        }
    }
}

impl StaLtaConfig {
    pub fn validate(&self, buffer_len: usize) -> BeamResult<()> {
        if buffer_len == 0 {
            return Err(BeamError::Parameter("cannot scan an empty beam".into()));
        }
        if self.lta_length < self.sta_length {
            return Err(BeamError::Parameter(format!(
                "lta length {} is shorter than sta length {}",
                self.lta_length, self.sta_length
            )));
        }
        if self.lta_length >= buffer_len {
            return Err(BeamError::Parameter(format!(
                "lta length {} does not fit a beam of {} samples",
                self.lta_length, buffer_len
            )));
        }
        if !self.threshold.is_finite() {
            return Err(BeamError::Parameter(format!(
                "threshold {} is not finite",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Short-term over long-term average onset detector.
///
/// At every index from `lta_length` onwards the mean of the trailing
/// `sta_length + 1` samples is divided by the mean of the trailing
/// `lta_length + 1` samples. A ratio above the threshold opens an event, a
/// ratio at or below it closes the open one. Indices where the long-term
/// mean is exactly zero have no ratio; they are skipped and leave the state
/// untouched.
pub struct StaLtaDetector {
    config: StaLtaConfig,
    logger: LogManager,
}

impl StaLtaDetector {
    pub fn new(config: StaLtaConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("stalta"),
        }
    }

    pub fn scan(&self, buffer: &[f64]) -> BeamResult<DetectionReport> {
        self.config.validate(buffer.len())?;

        let sta_len = self.config.sta_length;
        let lta_len = self.config.lta_length;
        let mut state = DetectorState::Quiet;
        let mut events: Vec<DetectionEvent> = Vec::new();
        let mut skipped = 0;

        for i in lta_len..buffer.len() {
            let sta = window_mean(&buffer[i - sta_len..=i]);
            let lta = window_mean(&buffer[i - lta_len..=i]);
            if lta == 0.0 {
                skipped += 1;
                continue;
            }
            let ratio = sta / lta;

            match state {
                DetectorState::Quiet if ratio > self.config.threshold => {
                    self.logger
                        .record(&format!("signal found starting at {} (ratio {:.3})", i, ratio));
                    events.push(DetectionEvent {
                        start: i,
                        end: None,
                        peak_ratio: ratio,
                    });
                    state = DetectorState::InSignal;
                }
                DetectorState::InSignal => {
                    if let Some(event) = events.last_mut() {
                        if ratio <= self.config.threshold {
                            self.logger.record(&format!("signal ended at {}", i));
                            event.end = Some(i);
                            state = DetectorState::Quiet;
                        } else if ratio > event.peak_ratio {
                            event.peak_ratio = ratio;
                        }
                    }
                }
                DetectorState::Quiet => {}
            }
        }

        if skipped > 0 {
            self.logger
                .caution(&format!("{} samples skipped with a zero long-term average", skipped));
        }

        Ok(DetectionReport {
            count: events.len(),
            events,
            skipped,
            final_state: state,
        })
    }
}

fn window_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(sta_length: usize, lta_length: usize, threshold: f64) -> StaLtaDetector {
        StaLtaDetector::new(StaLtaConfig {
            sta_length,
            lta_length,
            threshold,
        })
    }

    fn step(length: usize, at: usize, low: f64, high: f64) -> Vec<f64> {
        (0..length)
            .map(|i| if i < at { low } else { high })
            .collect()
    }

    #[test]
    fn energy_step_opens_exactly_one_event_at_the_step() {
        let buffer = step(100, 50, 1.0, 10.0);
        let report = detector(4, 20, 1.05).scan(&buffer).unwrap();

        assert_eq!(report.count, 1);
        assert_eq!(report.events[0].start, 50);
        assert_eq!(report.events[0].end, Some(69));
        assert!(report.events[0].peak_ratio > 3.0);
        assert_eq!(report.final_state, DetectorState::Quiet);
        assert!(report.open_event().is_none());
    }

    #[test]
    fn event_still_open_at_end_of_scan_is_counted() {
        let buffer = step(60, 50, 1.0, 10.0);
        let report = detector(4, 20, 1.05).scan(&buffer).unwrap();

        assert_eq!(report.count, 1);
        assert_eq!(report.final_state, DetectorState::InSignal);
        let open = report.open_event().unwrap();
        assert_eq!(open.start, 50);
        assert!(open.is_open());
    }

    #[test]
    fn ratio_equal_to_threshold_does_not_trigger() {
        let buffer = vec![2.0; 50];
        let report = detector(3, 10, 1.0).scan(&buffer).unwrap();
        assert_eq!(report.count, 0);
        assert_eq!(report.final_state, DetectorState::Quiet);
    }

    #[test]
    fn zero_long_term_average_is_skipped() {
        let buffer = vec![0.0; 50];
        let report = detector(2, 10, 1.5).scan(&buffer).unwrap();
        assert_eq!(report.count, 0);
        assert_eq!(report.skipped, 40);
        assert_eq!(report.final_state, DetectorState::Quiet);
    }

    #[test]
    fn skipped_samples_do_not_disturb_a_later_onset() {
        let buffer = step(80, 30, 0.0, 1.0);
        let report = detector(2, 10, 1.5).scan(&buffer).unwrap();

        assert_eq!(report.skipped, 20);
        assert_eq!(report.count, 1);
        assert_eq!(report.events[0].start, 30);
    }

    #[test]
    fn two_separate_bursts_give_two_events() {
        let mut buffer = vec![1.0; 200];
        for value in &mut buffer[60..70] {
            *value = 8.0;
        }
        for value in &mut buffer[140..150] {
            *value = 8.0;
        }
        let report = detector(3, 30, 2.0).scan(&buffer).unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(report.events[0].start, 60);
        assert_eq!(report.events[1].start, 140);
        assert!(report.events.iter().all(|event| event.end.is_some()));
    }

    #[test]
    fn lta_shorter_than_sta_is_rejected() {
        let result = detector(10, 5, 2.0).scan(&[1.0; 50]);
        assert!(matches!(result, Err(BeamError::Parameter(_))));
    }

    #[test]
    fn lta_as_long_as_beam_is_rejected() {
        let result = detector(2, 50, 2.0).scan(&[1.0; 50]);
        assert!(matches!(result, Err(BeamError::Parameter(_))));
    }

    #[test]
    fn empty_beam_is_rejected() {
        let result = detector(0, 0, 2.0).scan(&[]);
        assert!(matches!(result, Err(BeamError::Parameter(_))));
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let result = detector(1, 2, f64::NAN).scan(&[1.0; 10]);
        assert!(matches!(result, Err(BeamError::Parameter(_))));
    }
}
