pub mod sigmoid;
pub mod vector;

pub use sigmoid::{sigmoid, sigmoid_derivative};
