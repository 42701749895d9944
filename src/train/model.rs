use crate::error::Result;
use crate::layers::Layer;
use crate::network::StackedNet;
use crate::neuron::Neuron;

/// Anything that maps an input vector to an output vector and learns from
/// one `(input, target)` pair at a time.
pub trait Model {
    fn input_size(&self) -> usize;
    fn output_size(&self) -> usize;
    fn forward(&self, input: &[f64]) -> Result<Vec<f64>>;
    fn learn(&mut self, input: &[f64], target: &[f64]) -> Result<()>;
}

/// A single neuron as a model with a one-element output.
impl Model for Neuron {
    fn input_size(&self) -> usize {
        self.num_inputs()
    }

    fn output_size(&self) -> usize {
        1
    }

    fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![self.predict(input)?])
    }

    fn learn(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        crate::error::check_len("neuron target", 1, target.len())?;
        self.update(input, target[0])?;
        Ok(())
    }
}

impl Model for Layer {
    fn input_size(&self) -> usize {
        self.num_inputs()
    }

    fn output_size(&self) -> usize {
        self.num_outputs()
    }

    fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.predict(input)
    }

    fn learn(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        self.update(input, target)?;
        Ok(())
    }
}

impl Model for StackedNet {
    fn input_size(&self) -> usize {
        StackedNet::input_size(self)
    }

    fn output_size(&self) -> usize {
        StackedNet::output_size(self)
    }

    fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.predict(input)
    }

    fn learn(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        self.update(input, target)
    }
}
