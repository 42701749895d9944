pub mod hyperparams;
pub mod neuron;

pub use hyperparams::Hyperparams;
pub use neuron::Neuron;
