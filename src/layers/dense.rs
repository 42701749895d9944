use std::fmt;

use rand::Rng;

use crate::error::{check_len, NetError, Result};
use crate::math::vector::{add_assign, sub};
use crate::neuron::{Hyperparams, Neuron};

/// An ordered set of neurons that all read the same input vector.
///
/// Output width is the number of neurons; every neuron has the same input
/// width.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    nodes: Vec<Neuron>,
    num_inputs: usize,
}

impl Layer {
    pub fn new(num_inputs: usize, num_neurons: usize) -> Layer {
        Layer {
            nodes: (0..num_neurons).map(|_| Neuron::new(num_inputs)).collect(),
            num_inputs,
        }
    }

    pub fn with_hyperparams(
        num_inputs: usize,
        num_neurons: usize,
        hyperparams: Hyperparams,
    ) -> Result<Layer> {
        Layer::with_rng(num_inputs, num_neurons, hyperparams, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        num_inputs: usize,
        num_neurons: usize,
        hyperparams: Hyperparams,
        rng: &mut R,
    ) -> Result<Layer> {
        hyperparams.validate()?;
        let nodes = (0..num_neurons)
            .map(|_| Neuron::with_rng(num_inputs, hyperparams, &mut *rng))
            .collect::<Result<Vec<_>>>()?;
        Ok(Layer { nodes, num_inputs })
    }

    /// Assembles a layer from existing neurons, which must share one input width.
    pub fn from_neurons(nodes: Vec<Neuron>) -> Result<Layer> {
        let num_inputs = match nodes.first() {
            Some(first) => first.num_inputs(),
            None => {
                return Err(NetError::InvalidTopology(
                    "a layer needs at least one neuron".into(),
                ))
            }
        };
        for n in &nodes {
            check_len("neuron input width within layer", num_inputs, n.num_inputs())?;
        }
        Ok(Layer { nodes, num_inputs })
    }

    pub fn nodes(&self) -> &[Neuron] {
        &self.nodes
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.nodes.len()
    }

    /// One activation per neuron, in neuron order.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len("layer input", self.num_inputs, input.len())?;
        self.nodes.iter().map(|n| n.predict(input)).collect()
    }

    /// Updates every neuron with its own entry of `error` and returns the
    /// per-input errors summed across all neurons.
    ///
    /// Either every neuron is updated or, on error, none is.
    pub fn update_by_error(&mut self, input: &[f64], error: &[f64]) -> Result<Vec<f64>> {
        let (merged, staged) = self.step(input, error)?;
        self.commit(staged);
        Ok(merged)
    }

    /// Trains toward `target` (one entry per neuron) using
    /// `prediction - target` as the error.
    pub fn update(&mut self, input: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        let (merged, staged) = self.step_toward(input, target)?;
        self.commit(staged);
        Ok(merged)
    }

    /// Computes the merged error and every neuron's stepped weights without
    /// applying them.
    pub(crate) fn step(&self, input: &[f64], error: &[f64]) -> Result<(Vec<f64>, Vec<Vec<f64>>)> {
        check_len("layer input", self.num_inputs, input.len())?;
        check_len("layer error", self.nodes.len(), error.len())?;

        let mut merged = vec![0.0; self.num_inputs];
        let mut staged = Vec::with_capacity(self.nodes.len());
        for (node, &e) in self.nodes.iter().zip(error) {
            let (propagated, stepped) = node.step(input, e)?;
            add_assign(&mut merged, &propagated);
            staged.push(stepped);
        }
        Ok((merged, staged))
    }

    pub(crate) fn step_toward(
        &self,
        input: &[f64],
        target: &[f64],
    ) -> Result<(Vec<f64>, Vec<Vec<f64>>)> {
        check_len("layer target", self.nodes.len(), target.len())?;
        let output = self.predict(input)?;
        let error = sub(&output, target);
        self.step(input, &error)
    }

    pub(crate) fn commit(&mut self, staged: Vec<Vec<f64>>) {
        for (node, stepped) in self.nodes.iter_mut().zip(staged) {
            node.commit(stepped);
        }
    }

    pub fn debug_string(&self, label: &str) -> String {
        self.nodes
            .iter()
            .enumerate()
            .map(|(j, n)| n.debug_string(&format!("{label}[{j}]")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_debug_string(&self, label: &str) {
        tracing::info!("{}", self.debug_string(label));
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (j, n) in self.nodes.iter().enumerate() {
            if j > 0 {
                writeln!(f)?;
            }
            write!(f, "{n}")?;
        }
        Ok(())
    }
}
