pub mod epoch_stats;
pub mod loop_fn;
pub mod model;
pub mod train_config;

pub use epoch_stats::EpochStats;
pub use loop_fn::{eval_loss, train_loop};
pub use model::Model;
pub use train_config::TrainConfig;
