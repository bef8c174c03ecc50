use crate::generator::profile::{default_wave, GeneratorConfig};
use anyhow::Context;
use beamcore::{BeamType, RunParameters, StaLtaConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable naming an optional YAML workflow file.
pub const WORKFLOW_ENV: &str = "BEAMFORM_WORKFLOW";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub generator: GeneratorConfig,
    pub parameters: RunParameters,
    pub detector: StaLtaConfig,
    /// Beam the onset detector scans.
    pub detect_on: BeamType,
    pub max_beam_samples: Option<usize>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            parameters: default_wave(),
            detector: StaLtaConfig::default(),
            detect_on: BeamType::Incoherent,
            max_beam_samples: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Loads the file named by `BEAMFORM_WORKFLOW`, or falls back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        match env::var_os(WORKFLOW_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_beams_along_the_generated_wave() {
        let cfg = WorkflowConfig::default();
        assert_eq!(cfg.parameters, cfg.generator.wave);
        assert_eq!(cfg.detect_on, BeamType::Incoherent);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"parameters:\n  slowness: 0.05\n  back_azimuth: 90\ndetector:\n  threshold: 3.0\ndetect_on: coherent\ngenerator:\n  sensors: 3\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();

        assert_eq!(cfg.parameters.slowness, 0.05);
        assert_eq!(cfg.parameters.back_azimuth, 90.0);
        assert_eq!(cfg.parameters.km_per_degree, 111.19);
        assert_eq!(cfg.detector.threshold, 3.0);
        assert_eq!(cfg.detector.lta_length, StaLtaConfig::default().lta_length);
        assert_eq!(cfg.detect_on, BeamType::Coherent);
        assert_eq!(cfg.generator.sensors, 3);
        assert_eq!(cfg.generator.sample_rate, 40.0);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("/nonexistent/workflow.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
