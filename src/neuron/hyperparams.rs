use serde::{Deserialize, Serialize};

use crate::error::{NetError, Result};

/// Per-neuron training hyperparameters, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparams {
    /// Learning rate; finite and strictly positive.
    pub alpha: f64,
    /// L2 weight-decay coefficient; finite and non-negative.
    #[serde(default)]
    pub decay: f64,
}

impl Hyperparams {
    pub fn new(alpha: f64, decay: f64) -> Hyperparams {
        Hyperparams { alpha, decay }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(NetError::InvalidHyperparameter(format!(
                "alpha must be finite and > 0, got {}",
                self.alpha
            )));
        }
        if !self.decay.is_finite() || self.decay < 0.0 {
            return Err(NetError::InvalidHyperparameter(format!(
                "decay must be finite and >= 0, got {}",
                self.decay
            )));
        }
        Ok(())
    }
}

impl Default for Hyperparams {
    fn default() -> Self {
        Hyperparams { alpha: 0.05, decay: 0.0 }
    }
}
