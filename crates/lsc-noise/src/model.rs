use std::collections::BTreeMap;

use lsc_core::{ErrorInfo, LscError, NoiseChannel};
use serde::{Deserialize, Serialize};

/// Independent rate per error channel; missing channels have rate zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Channel rates, each in `[0, 1]`.
    #[serde(default)]
    pub rates: BTreeMap<NoiseChannel, f64>,
    /// Whether `depolarize-1` also follows single-qubit gates. It always
    /// precedes measurements.
    #[serde(default = "gate_depolarization")]
    pub gate_depolarization: bool,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            rates: BTreeMap::new(),
            gate_depolarization: gate_depolarization(),
        }
    }
}

fn gate_depolarization() -> bool {
    true
}

impl NoiseModel {
    /// Model without any error channel.
    pub fn noiseless() -> Self {
        Self::default()
    }

    /// Depolarisation at `p` after CNOTs and before measurements.
    ///
    /// Single-qubit gates stay clean; measurement flips are opt-in through
    /// [`NoiseModel::with_rate`].
    pub fn uniform(p: f64) -> Result<Self, LscError> {
        let mut model = Self::noiseless()
            .with_rate(NoiseChannel::Depolarize2, p)?
            .with_rate(NoiseChannel::Depolarize1, p)?;
        model.gate_depolarization = false;
        Ok(model)
    }

    /// Returns the model with `channel` set to `rate`.
    pub fn with_rate(mut self, channel: NoiseChannel, rate: f64) -> Result<Self, LscError> {
        check_rate(channel, rate)?;
        self.rates.insert(channel, rate);
        Ok(self)
    }

    /// Rate of `channel`.
    pub fn rate(&self, channel: NoiseChannel) -> f64 {
        self.rates.get(&channel).copied().unwrap_or(0.0)
    }

    /// True when every rate is zero.
    pub fn is_noiseless(&self) -> bool {
        self.rates.values().all(|rate| *rate == 0.0)
    }

    /// Checks every rate; used after deserialization.
    pub fn validate(&self) -> Result<(), LscError> {
        for (channel, rate) in &self.rates {
            check_rate(*channel, *rate)?;
        }
        Ok(())
    }
}

fn check_rate(channel: NoiseChannel, rate: f64) -> Result<(), LscError> {
    if (0.0..=1.0).contains(&rate) {
        return Ok(());
    }
    Err(LscError::Config(
        ErrorInfo::new("invalid-noise-rate", "noise rates must lie in [0, 1]")
            .with_context("channel", channel.label())
            .with_context("rate", rate.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_depolarizes_without_flips() {
        let model = NoiseModel::uniform(0.001).unwrap();
        assert_eq!(model.rate(NoiseChannel::Depolarize2), 0.001);
        assert_eq!(model.rate(NoiseChannel::Depolarize1), 0.001);
        assert_eq!(model.rate(NoiseChannel::MeasurementFlip), 0.0);
        assert_eq!(model.rate(NoiseChannel::Idle), 0.0);
        assert!(!model.gate_depolarization);
        assert!(!model.is_noiseless());
    }

    #[test]
    fn gate_depolarization_defaults_on() {
        assert!(NoiseModel::noiseless().gate_depolarization);
        let model: NoiseModel = serde_json::from_str(r#"{"rates": {}}"#).unwrap();
        assert!(model.gate_depolarization);
    }

    #[test]
    fn rates_outside_the_unit_interval_are_rejected() {
        for rate in [-0.1, 1.5, f64::NAN] {
            let err = NoiseModel::noiseless()
                .with_rate(NoiseChannel::Idle, rate)
                .unwrap_err();
            assert_eq!(err.code(), "invalid-noise-rate");
        }
        assert!(NoiseModel::noiseless()
            .with_rate(NoiseChannel::Idle, 1.0)
            .is_ok());
    }
}
