// Demo: trains a [2, 2, 3] net on AND / OR / AND and prints the result.
//
//   cargo run -- [spec.json]
//
// The optional argument is a `NetworkSpec` JSON file; without it the demo
// uses the default hyperparameters and a fixed seed.
use anyhow::{Context, Result};
use stacknet::{train_loop, NetworkSpec, TrainConfig};
use tracing_subscriber::EnvFilter;

const EPOCHS: usize = 3500;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let spec = match std::env::args().nth(1) {
        Some(path) => NetworkSpec::load_json(&path)
            .with_context(|| format!("failed to load network spec from {path}"))?,
        None => NetworkSpec::new(vec![2, 2, 3]).with_seed(7),
    };
    let mut net = spec.build().context("failed to build network")?;

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![
        vec![0.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![1.0, 1.0, 1.0],
    ];

    let loss = train_loop(&mut net, &inputs, &targets, &TrainConfig::new(EPOCHS))?;
    println!("Trained {:?} for {EPOCHS} epochs: loss = {loss:.6}", net.dimensions());

    for input in &inputs {
        let output = net.predict(input)?;
        let rendered: Vec<String> = output.iter().map(|o| format!("{o:.4}")).collect();
        println!("Input: {:?} -> AND/OR/AND: [{}]", input, rendered.join(", "));
    }
    println!("{}", net.debug_string("AndOrAnd"));
    Ok(())
}
