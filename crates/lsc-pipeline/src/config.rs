use std::fs;
use std::path::Path;

use lsc_core::{ContextExt, ErrorInfo, LscError};
use lsc_detect::{ObservableSelection, RadiusPolicy, SynthesisOptions};
use lsc_noise::NoiseModel;
use serde::{Deserialize, Serialize};

fn config_error(code: &str, err: impl ToString) -> LscError {
    LscError::Config(ErrorInfo::new(code, err.to_string()))
}

/// YAML-configurable parameters of one end-to-end compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Size parameters to compile at; duplicates collapse.
    pub sizes: Vec<u32>,
    /// Noise policy applied before detector synthesis.
    pub noise: NoiseModel,
    /// Surfaces annotated as observables.
    pub observables: ObservableSelection,
    /// Neighbourhood radius of the detector search.
    pub radius: RadiusPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sizes: vec![1],
            noise: NoiseModel::noiseless(),
            observables: ObservableSelection::All,
            radius: RadiusPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a YAML document; missing fields take defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, LscError> {
        let config: PipelineConfig =
            serde_yaml::from_str(contents).map_err(|err| config_error("yaml-parse", err))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, LscError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            LscError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&contents).map_err(|err| err.with_context("path", path.display()))
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml_string(&self) -> Result<String, LscError> {
        serde_yaml::to_string(self).map_err(|err| config_error("yaml-serialize", err))
    }

    /// Checks sizes, noise rates and radii.
    pub fn validate(&self) -> Result<(), LscError> {
        if self.sizes.is_empty() {
            return Err(LscError::Config(ErrorInfo::new(
                "empty-size-list",
                "at least one size parameter is required",
            )));
        }
        if self.sizes.contains(&0) {
            return Err(LscError::Config(
                ErrorInfo::new("invalid-size", "size parameter must be positive")
                    .with_context("k", "0"),
            ));
        }
        self.noise.validate()?;
        self.radius.validate()
    }

    /// Options handed to the detector synthesizer.
    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            radius: self.radius.clone(),
            observables: self.observables.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use lsc_core::NoiseChannel;

    use super::*;

    #[test]
    fn empty_document_takes_defaults() {
        let config = PipelineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn tagged_policies_parse() {
        let yaml = "\
sizes: [1, 2]
noise:
  rates:
    depolarize-2: 0.001
    measurement-flip: 0.002
observables:
  type: indices
  indices: [0]
radius:
  type: adaptive
  start: 1
  max: 3
";
        let config = PipelineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.sizes, vec![1, 2]);
        assert_eq!(config.noise.rate(NoiseChannel::MeasurementFlip), 0.002);
        assert_eq!(
            config.observables,
            ObservableSelection::Indices { indices: vec![0] }
        );
        assert_eq!(config.radius, RadiusPolicy::Adaptive { start: 1, max: 3 });
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for yaml in [
            "sizes: []",
            "sizes: [0]",
            "radius: {type: uniform, radius: 0}",
            "noise: {rates: {idle: 2.0}}",
            "sizes: not-a-list",
        ] {
            let err = PipelineConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, LscError::Config(_)), "{yaml}: {err:?}");
        }
    }

    #[test]
    fn yaml_round_trips() {
        let config = PipelineConfig {
            sizes: vec![2, 3],
            radius: RadiusPolicy::Uniform { radius: 3 },
            ..PipelineConfig::default()
        };
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(PipelineConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
