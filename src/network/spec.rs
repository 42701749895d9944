use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::network::network::{validate_dimensions, StackedNet};
use crate::neuron::Hyperparams;

/// A serializable description of a network architecture.
///
/// Describes the shape and training hyperparameters only; weights are not
/// part of it. `build()` draws fresh weights, reproducibly when `seed` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Input width followed by the width of every layer.
    pub dimensions: Vec<usize>,
    #[serde(default)]
    pub hyperparams: Hyperparams,
    /// Seed for weight initialisation; `None` uses the thread RNG.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl NetworkSpec {
    pub fn new(dimensions: Vec<usize>) -> NetworkSpec {
        NetworkSpec {
            dimensions,
            hyperparams: Hyperparams::default(),
            seed: None,
        }
    }

    pub fn with_hyperparams(mut self, hyperparams: Hyperparams) -> Self {
        self.hyperparams = hyperparams;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_dimensions(&self.dimensions)?;
        self.hyperparams.validate()
    }

    pub fn build(&self) -> Result<StackedNet> {
        match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                StackedNet::with_rng(&self.dimensions, self.hyperparams, &mut rng)
            }
            None => StackedNet::with_hyperparams(&self.dimensions, self.hyperparams),
        }
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}
