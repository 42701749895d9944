use std::fmt;

use rand::Rng;

use crate::error::{check_len, NetError, Result};
use crate::math::sigmoid::sigmoid;
use crate::math::vector::{dot_with_bias, random_weights};
use crate::neuron::hyperparams::Hyperparams;

/// A single logistic unit.
///
/// `weights` holds one entry per input followed by the bias weight, which is
/// always paired with an implicit input of 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    weights: Vec<f64>,
    hyperparams: Hyperparams,
}

impl Neuron {
    /// Randomly initialised neuron with default hyperparameters.
    pub fn new(num_inputs: usize) -> Neuron {
        Neuron {
            weights: random_weights(num_inputs + 1, &mut rand::thread_rng()),
            hyperparams: Hyperparams::default(),
        }
    }

    pub fn with_hyperparams(num_inputs: usize, hyperparams: Hyperparams) -> Result<Neuron> {
        Neuron::with_rng(num_inputs, hyperparams, &mut rand::thread_rng())
    }

    /// Draws the initial weights from `rng`, uniformly in [-0.25, 0.25).
    pub fn with_rng<R: Rng + ?Sized>(
        num_inputs: usize,
        hyperparams: Hyperparams,
        rng: &mut R,
    ) -> Result<Neuron> {
        hyperparams.validate()?;
        Ok(Neuron {
            weights: random_weights(num_inputs + 1, rng),
            hyperparams,
        })
    }

    /// Builds a neuron from explicit weights; the last entry is the bias.
    pub fn from_weights(weights: Vec<f64>, hyperparams: Hyperparams) -> Result<Neuron> {
        hyperparams.validate()?;
        if weights.is_empty() {
            return Err(NetError::ShapeMismatch {
                what: "neuron weights (at least the bias)",
                expected: 1,
                actual: 0,
            });
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(NetError::NumericOverflow("non-finite initial weight".into()));
        }
        Ok(Neuron { weights, hyperparams })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn num_inputs(&self) -> usize {
        self.weights.len() - 1
    }

    pub fn hyperparams(&self) -> Hyperparams {
        self.hyperparams
    }

    /// Logistic activation of the weighted input plus bias.
    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        check_len("neuron input", self.num_inputs(), input.len())?;
        let sum = dot_with_bias(input, &self.weights);
        if sum.is_nan() {
            return Err(NetError::NumericOverflow(
                "weighted sum of neuron input is NaN".into(),
            ));
        }
        Ok(sigmoid(sum))
    }

    /// One gradient step driven by `error`, with L2 decay on every weight.
    ///
    /// Returns `error * weights[i]` for each real input, taken before the
    /// step: the share of the error owed to whatever produced `input[i]`.
    /// If any stepped weight would be non-finite the step is rejected and
    /// the weights are left as they were.
    pub fn update_by_error(&mut self, input: &[f64], error: f64) -> Result<Vec<f64>> {
        let (propagated, stepped) = self.step(input, error)?;
        self.commit(stepped);
        Ok(propagated)
    }

    /// Computes an update without applying it: the propagated error and the
    /// weights after the step.
    pub(crate) fn step(&self, input: &[f64], error: f64) -> Result<(Vec<f64>, Vec<f64>)> {
        check_len("neuron input", self.num_inputs(), input.len())?;
        if !error.is_finite() || input.iter().any(|x| !x.is_finite()) {
            return Err(NetError::NumericOverflow(
                "non-finite input or error in neuron update".into(),
            ));
        }

        let propagated = self.weights[..input.len()]
            .iter()
            .map(|w| error * w)
            .collect();

        let Hyperparams { alpha, decay } = self.hyperparams;
        let inputs_with_bias = input.iter().copied().chain(std::iter::once(1.0));
        let stepped: Vec<f64> = self
            .weights
            .iter()
            .zip(inputs_with_bias)
            .map(|(w, x)| w - alpha * (error * x + decay * w))
            .collect();
        if stepped.iter().any(|w| !w.is_finite()) {
            return Err(NetError::NumericOverflow(
                "neuron update would produce a non-finite weight".into(),
            ));
        }

        Ok((propagated, stepped))
    }

    pub(crate) fn commit(&mut self, stepped: Vec<f64>) {
        self.weights = stepped;
    }

    /// Trains toward a scalar `target`; returns `prediction - target`.
    pub fn update(&mut self, input: &[f64], target: f64) -> Result<f64> {
        let error = self.predict(input)? - target;
        self.update_by_error(input, error)?;
        Ok(error)
    }

    /// Current weights prefixed by `label`.
    pub fn debug_string(&self, label: &str) -> String {
        format!("{label}: {self}")
    }

    pub fn print_debug_string(&self, label: &str) {
        tracing::info!("{}", self.debug_string(label));
    }
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, w) in self.weights.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{w:.4}")?;
        }
        write!(f, "]")
    }
}
