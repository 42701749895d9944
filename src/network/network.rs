use std::fmt;

use rand::Rng;

use crate::error::{check_len, NetError, Result};
use crate::layers::dense::Layer;
use crate::math::sigmoid::apply_derivative;
use crate::neuron::Hyperparams;

/// A feedforward stack of layers trained by online backpropagation.
///
/// Built from a dimension list `[d0, d1, ..., dM]`: input width `d0` and
/// `M` layers of widths `d1..dM`, each layer reading the previous layer's
/// output.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedNet {
    layers: Vec<Layer>,
    input_size: usize,
}

impl StackedNet {
    /// Randomly initialised network with default hyperparameters.
    pub fn new(dimensions: &[usize]) -> Result<StackedNet> {
        StackedNet::with_hyperparams(dimensions, Hyperparams::default())
    }

    pub fn with_hyperparams(dimensions: &[usize], hyperparams: Hyperparams) -> Result<StackedNet> {
        StackedNet::with_rng(dimensions, hyperparams, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        dimensions: &[usize],
        hyperparams: Hyperparams,
        rng: &mut R,
    ) -> Result<StackedNet> {
        validate_dimensions(dimensions)?;
        hyperparams.validate()?;
        let layers = dimensions
            .windows(2)
            .map(|pair| Layer::with_rng(pair[0], pair[1], hyperparams, &mut *rng))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(?dimensions, ?hyperparams, "built stacked net");
        Ok(StackedNet {
            layers,
            input_size: dimensions[0],
        })
    }

    /// Assembles a network from existing layers; adjacent widths must agree.
    pub fn from_layers(input_size: usize, layers: Vec<Layer>) -> Result<StackedNet> {
        if input_size == 0 {
            return Err(NetError::InvalidTopology("input width must be positive".into()));
        }
        let mut width = input_size;
        for (i, layer) in layers.iter().enumerate() {
            if layer.num_outputs() == 0 {
                return Err(NetError::InvalidTopology(format!(
                    "layer {i} has no neurons"
                )));
            }
            check_len("layer input width", width, layer.num_inputs())?;
            width = layer.num_outputs();
        }
        Ok(StackedNet { layers, input_size })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.layers
            .last()
            .map_or(self.input_size, Layer::num_outputs)
    }

    /// The dimension list this network was built from.
    pub fn dimensions(&self) -> Vec<usize> {
        std::iter::once(self.input_size)
            .chain(self.layers.iter().map(Layer::num_outputs))
            .collect()
    }

    /// Forward pass; with no layers this is the identity.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len("network input", self.input_size, input.len())?;
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.predict(&current)?;
        }
        Ok(current)
    }

    /// One online backpropagation step toward `target`.
    ///
    /// Every layer's step is computed from the weights as they were before
    /// the call and applied only once all of them succeed, so a rejected
    /// update leaves the whole network unchanged.
    pub fn update(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        check_len("network input", self.input_size, input.len())?;
        check_len("network target", self.output_size(), target.len())?;
        if !input.iter().chain(target).all(|v| v.is_finite()) {
            return Err(NetError::NumericOverflow(
                "non-finite input or target in network update".into(),
            ));
        }
        let Some(last) = self.layers.len().checked_sub(1) else {
            return Ok(());
        };

        // activations[i] is the input to layers[i].
        let mut activations = Vec::with_capacity(self.layers.len());
        activations.push(input.to_vec());
        for layer in &self.layers[..last] {
            let next = layer.predict(&activations[activations.len() - 1])?;
            activations.push(next);
        }

        // staged[i] holds the stepped weights of layers[last - i].
        let mut staged = Vec::with_capacity(self.layers.len());
        let (mut error, stepped) = self.layers[last].step_toward(&activations[last], target)?;
        staged.push(stepped);
        for i in (0..last).rev() {
            // Chain rule through the sigmoid of the layer that produced
            // activations[i + 1].
            apply_derivative(&mut error, &activations[i + 1]);
            let (merged, stepped) = self.layers[i].step(&activations[i], &error)?;
            error = merged;
            staged.push(stepped);
        }

        for (layer, stepped) in self.layers.iter_mut().rev().zip(staged) {
            layer.commit(stepped);
        }
        Ok(())
    }

    pub fn debug_string(&self, label: &str) -> String {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| layer.debug_string(&format!("{label}/{i}")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_debug_string(&self, label: &str) {
        tracing::info!("{}", self.debug_string(label));
    }
}

impl fmt::Display for StackedNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.debug_string("layer"))
    }
}

/// Rejects empty dimension lists and zero widths.
pub fn validate_dimensions(dimensions: &[usize]) -> Result<()> {
    if dimensions.is_empty() {
        return Err(NetError::InvalidTopology(
            "dimensions must name at least the input width".into(),
        ));
    }
    if let Some(pos) = dimensions.iter().position(|&d| d == 0) {
        return Err(NetError::InvalidTopology(format!(
            "width at position {pos} must be positive"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neuron::Neuron;
    use approx::assert_relative_eq;

    fn n(weights: Vec<f64>) -> Neuron {
        Neuron::from_weights(weights, Hyperparams::new(0.5, 0.0)).unwrap()
    }

    /// 1 input -> 1 hidden -> 1 output, with hand-picked weights.
    fn tiny_net() -> StackedNet {
        StackedNet::from_layers(
            1,
            vec![
                Layer::from_neurons(vec![n(vec![0.5, 0.1])]).unwrap(),
                Layer::from_neurons(vec![n(vec![-0.3, 0.2])]).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_construction_topology() {
        let net = StackedNet::new(&[3, 2, 1]).unwrap();
        assert_eq!(net.layers().len(), 2);
        assert_eq!(net.layers()[0].num_outputs(), 2);
        assert!(net.layers()[0].nodes().iter().all(|n| n.weights().len() == 4));
        assert_eq!(net.layers()[1].num_outputs(), 1);
        assert_eq!(net.layers()[1].nodes()[0].weights().len(), 3);
        assert_eq!(net.dimensions(), vec![3, 2, 1]);
        assert_eq!(net.output_size(), 1);
    }

    #[test]
    fn test_invalid_topology() {
        assert!(matches!(StackedNet::new(&[]), Err(NetError::InvalidTopology(_))));
        assert!(matches!(StackedNet::new(&[2, 0, 1]), Err(NetError::InvalidTopology(_))));
        assert!(matches!(StackedNet::new(&[0]), Err(NetError::InvalidTopology(_))));
        assert!(matches!(
            StackedNet::with_hyperparams(&[2, 1], Hyperparams::new(-1.0, 0.0)),
            Err(NetError::InvalidHyperparameter(_))
        ));
    }

    #[test]
    fn test_zero_layer_net_is_identity() {
        let mut net = StackedNet::new(&[3]).unwrap();
        assert!(net.layers().is_empty());
        assert_eq!(net.predict(&[1.0, -2.0, 0.5]).unwrap(), vec![1.0, -2.0, 0.5]);
        net.update(&[1.0, -2.0, 0.5], &[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(net.dimensions(), vec![3]);
    }

    #[test]
    fn test_predict_chains_layers() {
        let net = tiny_net();
        let hidden = net.layers()[0].predict(&[1.0]).unwrap();
        let expected = net.layers()[1].predict(&hidden).unwrap();
        assert_eq!(net.predict(&[1.0]).unwrap(), expected);
    }

    #[test]
    fn test_single_layer_update_matches_layer_update() {
        let h = Hyperparams::default();
        let layer = Layer::from_neurons(vec![
            Neuron::from_weights(vec![0.1, 0.2, 0.3], h).unwrap(),
            Neuron::from_weights(vec![-0.1, 0.0, 0.2], h).unwrap(),
        ])
        .unwrap();
        let mut reference = layer.clone();
        let mut net = StackedNet::from_layers(2, vec![layer]).unwrap();

        net.update(&[1.0, 0.0], &[1.0, 0.0]).unwrap();
        reference.update(&[1.0, 0.0], &[1.0, 0.0]).unwrap();
        assert_eq!(net.layers()[0], reference);
    }

    #[test]
    fn test_backprop_step_by_hand() {
        let mut net = tiny_net();
        let x = 1.0;
        let h = crate::math::sigmoid(0.5 * x + 0.1);
        let o = crate::math::sigmoid(-0.3 * h + 0.2);
        let target = 1.0;
        let out_err = o - target;
        // Hidden error uses the pre-update output weight and the sigmoid slope at h.
        let hidden_err = out_err * -0.3 * h * (1.0 - h);

        net.update(&[x], &[target]).unwrap();

        let out = net.layers()[1].nodes()[0].weights();
        assert_relative_eq!(out[0], -0.3 - 0.5 * out_err * h, epsilon = 1e-12);
        assert_relative_eq!(out[1], 0.2 - 0.5 * out_err, epsilon = 1e-12);
        let hid = net.layers()[0].nodes()[0].weights();
        assert_relative_eq!(hid[0], 0.5 - 0.5 * hidden_err * x, epsilon = 1e-12);
        assert_relative_eq!(hid[1], 0.1 - 0.5 * hidden_err, epsilon = 1e-12);
    }

    #[test]
    fn test_backprop_through_two_hidden_layers_by_hand() {
        let mut net = StackedNet::from_layers(
            1,
            vec![
                Layer::from_neurons(vec![n(vec![0.5, 0.1])]).unwrap(),
                Layer::from_neurons(vec![n(vec![0.4, -0.2])]).unwrap(),
                Layer::from_neurons(vec![n(vec![-0.3, 0.2])]).unwrap(),
            ],
        )
        .unwrap();
        let x = 1.0;
        let target = 1.0;
        let h1 = crate::math::sigmoid(0.5 * x + 0.1);
        let h2 = crate::math::sigmoid(0.4 * h1 - 0.2);
        let o = crate::math::sigmoid(-0.3 * h2 + 0.2);
        let e_out = o - target;
        // Each error uses the pre-update weight above it and the sigmoid
        // slope of the activation it flows through.
        let e_mid = e_out * -0.3 * h2 * (1.0 - h2);
        let e_first = e_mid * 0.4 * h1 * (1.0 - h1);

        net.update(&[x], &[target]).unwrap();

        let out = net.layers()[2].nodes()[0].weights();
        assert_relative_eq!(out[0], -0.3 - 0.5 * e_out * h2, epsilon = 1e-12);
        assert_relative_eq!(out[1], 0.2 - 0.5 * e_out, epsilon = 1e-12);
        let mid = net.layers()[1].nodes()[0].weights();
        assert_relative_eq!(mid[0], 0.4 - 0.5 * e_mid * h1, epsilon = 1e-12);
        assert_relative_eq!(mid[1], -0.2 - 0.5 * e_mid, epsilon = 1e-12);
        let first = net.layers()[0].nodes()[0].weights();
        assert_relative_eq!(first[0], 0.5 - 0.5 * e_first * x, epsilon = 1e-12);
        assert_relative_eq!(first[1], 0.1 - 0.5 * e_first, epsilon = 1e-12);
    }

    #[test]
    fn test_overflow_in_hidden_layer_leaves_output_layer_untouched() {
        let hidden = Neuron::from_weights(vec![0.0, 0.0], Hyperparams::new(100.0, 0.0)).unwrap();
        let output = Neuron::from_weights(vec![1.0, 0.0], Hyperparams::new(0.1, 0.0)).unwrap();
        let mut net = StackedNet::from_layers(
            1,
            vec![
                Layer::from_neurons(vec![hidden]).unwrap(),
                Layer::from_neurons(vec![output]).unwrap(),
            ],
        )
        .unwrap();
        let before = net.clone();
        // The output step is fine; the hidden step overflows on the huge input.
        assert!(matches!(
            net.update(&[1e308], &[0.0]),
            Err(NetError::NumericOverflow(_))
        ));
        assert_eq!(net, before);
    }

    #[test]
    fn test_update_shape_errors() {
        let mut net = StackedNet::new(&[2, 3, 1]).unwrap();
        let before = net.clone();
        assert!(matches!(
            net.update(&[1.0, 0.0], &[1.0, 0.0]),
            Err(NetError::ShapeMismatch { what: "network target", expected: 1, actual: 2 })
        ));
        assert!(matches!(
            net.update(&[1.0], &[1.0]),
            Err(NetError::ShapeMismatch { what: "network input", .. })
        ));
        assert!(net.update(&[f64::INFINITY, 0.0], &[1.0]).is_err());
        assert!(net.predict(&[1.0, 2.0, 3.0]).is_err());
        assert_eq!(net, before);
    }

    #[test]
    fn test_from_layers_checks_widths() {
        let h = Hyperparams::default();
        let l1 = Layer::with_hyperparams(2, 3, h).unwrap();
        let l2 = Layer::with_hyperparams(2, 1, h).unwrap();
        assert!(StackedNet::from_layers(2, vec![l1, l2]).is_err());
        assert!(StackedNet::from_layers(0, vec![]).is_err());
        assert!(matches!(
            StackedNet::from_layers(2, vec![Layer::new(2, 0)]),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_debug_string_labels_layers() {
        let s = tiny_net().debug_string("net");
        assert!(s.contains("net/0[0]: "));
        assert!(s.contains("net/1[0]: "));
    }
}
