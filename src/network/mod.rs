pub mod network;
pub mod spec;

pub use network::StackedNet;
pub use spec::NetworkSpec;
