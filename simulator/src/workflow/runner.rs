use crate::workflow::config::WorkflowConfig;
use crate::workflow::report::{BeamSummary, RunReport};
use anyhow::Context;
use beamcore::telemetry::MetricsRecorder;
use beamcore::{
    Beam, BeamResult, BeamType, Beamformer, SensorDataset, StaLtaDetector, TimeAligner,
};

pub struct Runner {
    config: WorkflowConfig,
    metrics: MetricsRecorder,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: MetricsRecorder::new(),
        }
    }

    /// Aligns the dataset, forms the coherent and the incoherent beam one
    /// after the other, then scans the configured beam for onsets.
    pub fn execute(&self, dataset: &SensorDataset, workers: usize) -> anyhow::Result<RunReport> {
        let plan = self
            .track(TimeAligner::new().align(dataset, &self.config.parameters))
            .context("aligning sensor recordings")?;

        let mut beamformer = Beamformer::new(workers);
        if let Some(limit) = self.config.max_beam_samples {
            beamformer = beamformer.with_max_samples(limit);
        }

        let coherent = self
            .track(beamformer.form(BeamType::Coherent, dataset, &plan))
            .context("forming coherent beam")?;
        self.metrics.record_beam(coherent.len(), plan.sensor_count());

        let incoherent = self
            .track(beamformer.form(BeamType::Incoherent, dataset, &plan))
            .context("forming incoherent beam")?;
        self.metrics
            .record_beam(incoherent.len(), plan.sensor_count());

        let scanned: &Beam = match self.config.detect_on {
            BeamType::Coherent => &coherent,
            BeamType::Incoherent => &incoherent,
        };
        let detection = self
            .track(StaLtaDetector::new(self.config.detector).scan(scanned.samples()))
            .context("scanning beam for onsets")?;
        self.metrics.record_events(detection.count);

        let onset_times = detection
            .events
            .iter()
            .map(|event| event.onset_time(scanned))
            .collect();
        let end_times = detection
            .events
            .iter()
            .map(|event| event.end_time(scanned))
            .collect();

        let coherent_summary = self
            .track(BeamSummary::from_beam(&coherent))
            .context("summarising coherent beam")?;
        let incoherent_summary = self
            .track(BeamSummary::from_beam(&incoherent))
            .context("summarising incoherent beam")?;

        Ok(RunReport {
            epoch: dataset.epoch(),
            window: plan.window,
            beam_length: plan.length,
            workers: beamformer.workers(),
            coherent: coherent_summary,
            incoherent: incoherent_summary,
            detected_on: self.config.detect_on,
            detection,
            onset_times,
            end_times,
            metrics: self.metrics.snapshot(),
        })
    }

    fn track<T>(&self, result: BeamResult<T>) -> BeamResult<T> {
        if result.is_err() {
            self.metrics.record_error();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_dataset, GeneratorConfig};
    use beamcore::{RunParameters, StaLtaConfig};

    fn small_workflow() -> WorkflowConfig {
        let generator = GeneratorConfig {
            sensors: 4,
            sample_rate: 20.0,
            duration: 60.0,
            arrival: 30.0,
            frequency: 1.0,
            noise: 0.05,
            start_jitter: 0.01,
            seed: 7,
            ..Default::default()
        };
        WorkflowConfig {
            parameters: generator.wave,
            generator,
            detector: StaLtaConfig {
                sta_length: 20,
                lta_length: 200,
                threshold: 2.5,
            },
            ..Default::default()
        }
    }

    #[test]
    fn runner_detects_the_synthetic_arrival() {
        let cfg = small_workflow();
        let dataset = build_dataset(&cfg.generator).unwrap();
        let runner = Runner::new(cfg.clone());
        let report = runner.execute(&dataset, 3).unwrap();

        assert!(report.detection.count >= 1);
        let arrival = cfg.generator.epoch_start + cfg.generator.arrival;
        assert!((report.onset_times[0] - arrival).abs() < 1.5);
        assert!(report.incoherent.average >= 0.0);
        assert_eq!(report.coherent.samples, report.beam_length);
        assert_eq!(report.workers, 3);
        assert_eq!(report.end_times.len(), report.detection.count);
        if let Some(Some(ended)) = report.end_times.first() {
            assert!(*ended > report.onset_times[0]);
        }
        assert_eq!(report.metrics.beams_formed, 2);
        assert_eq!(report.metrics.errors, 0);
    }

    #[test]
    fn runner_output_does_not_depend_on_worker_count() {
        let cfg = small_workflow();
        let dataset = build_dataset(&cfg.generator).unwrap();
        let serial = Runner::new(cfg.clone()).execute(&dataset, 0).unwrap();
        let parallel = Runner::new(cfg).execute(&dataset, 5).unwrap();

        assert_eq!(serial.coherent, parallel.coherent);
        assert_eq!(serial.incoherent, parallel.incoherent);
        assert_eq!(serial.detection, parallel.detection);
    }

    #[test]
    fn runner_surfaces_geometry_errors() {
        let mut cfg = small_workflow();
        cfg.parameters = RunParameters {
            slowness: 100.0,
            ..cfg.parameters
        };
        let dataset = build_dataset(&cfg.generator).unwrap();
        let runner = Runner::new(cfg);
        let err = runner.execute(&dataset, 2).unwrap_err();

        assert!(format!("{:#}", err).contains("aligning sensor recordings"));
        assert_eq!(runner.metrics.snapshot().errors, 1);
    }

    #[test]
    fn runner_reports_beam_limit() {
        let mut cfg = small_workflow();
        cfg.max_beam_samples = Some(10);
        let dataset = build_dataset(&cfg.generator).unwrap();
        let err = Runner::new(cfg).execute(&dataset, 1).unwrap_err();
        assert!(format!("{:#}", err).contains("forming coherent beam"));
    }
}
