use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{check_len, NetError, Result};
use crate::loss::mse::MseLoss;
use crate::train::epoch_stats::EpochStats;
use crate::train::model::Model;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` online for `config.epochs` epochs and returns the mean
/// squared error over all patterns measured **after the last completed
/// epoch** (the same value `eval_loss` gives on the trained model).
///
/// Every epoch visits each `(input, target)` pair once and applies one
/// update per pair. With zero epochs (or a stop flag already set) the loss
/// of the untouched model is returned.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidTopology` for an empty pattern set, `ShapeMismatch` when the
/// counts or any pattern's widths disagree with the model. Patterns are
/// checked before the first update.
pub fn train_loop<M: Model + ?Sized>(
    model: &mut M,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<f64> {
    if inputs.is_empty() {
        return Err(NetError::InvalidTopology("training set is empty".into()));
    }
    check_len("training targets", inputs.len(), targets.len())?;
    for (input, target) in inputs.iter().zip(targets) {
        check_len("training input", model.input_size(), input.len())?;
        check_len("training target", model.output_size(), target.len())?;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut order: Vec<usize> = (0..inputs.len()).collect();
    let mut last_loss = None;

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();
        if config.shuffle {
            order.shuffle(&mut rng);
        }
        run_one_epoch(model, inputs, targets, &order)?;
        let loss = eval_loss(model, inputs, targets)?;
        last_loss = Some(loss);

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        tracing::debug!(epoch, loss, "epoch complete");

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    let loss = match last_loss {
        Some(loss) => loss,
        None => eval_loss(model, inputs, targets)?,
    };
    tracing::info!(epochs = config.epochs, loss, "training finished");
    Ok(loss)
}

/// Mean squared error of `model` over a pattern set, without updating it.
pub fn eval_loss<M: Model + ?Sized>(
    model: &M,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
) -> Result<f64> {
    check_len("evaluation targets", inputs.len(), targets.len())?;
    if inputs.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for (input, target) in inputs.iter().zip(targets) {
        total += MseLoss::loss(&model.forward(input)?, target);
    }
    Ok(total / inputs.len() as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One online pass over the patterns in `order`.
fn run_one_epoch<M: Model + ?Sized>(
    model: &mut M,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    order: &[usize],
) -> Result<()> {
    for &idx in order {
        model.learn(&inputs[idx], &targets[idx])?;
    }
    Ok(())
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
