pub mod error;
pub mod math;
pub mod neuron;
pub mod layers;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{NetError, Result};
pub use neuron::{Hyperparams, Neuron};
pub use layers::dense::Layer;
pub use network::{NetworkSpec, StackedNet};
pub use loss::mse::MseLoss;
pub use train::{eval_loss, train_loop, EpochStats, Model, TrainConfig};
