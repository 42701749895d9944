use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`:      number of passes over the pattern set; every pattern
///                  gets one online update per pass
/// - `shuffle`:     visit patterns in a fresh random order each epoch
///                  instead of the given order
/// - `seed`:        seed for the shuffle order; `None` draws from entropy
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///                  completed epoch.  If the receiver is dropped the loop
///                  terminates early.
/// - `stop_flag`:   optional atomic flag; when set to `true` from another
///                  thread the loop terminates after the current epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// In-order training for `epochs` passes, no channel, no stop flag.
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            shuffle: false,
            seed: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn shuffled(mut self, seed: Option<u64>) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
