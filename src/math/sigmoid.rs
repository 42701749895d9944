/// Logistic activation `1 / (1 + e^(-x))`.
///
/// Evaluated in the form that never overflows: for negative `x` the
/// equivalent `e^x / (1 + e^x)` is used, so arguments of any magnitude
/// (including infinities) saturate to 0 or 1 instead of producing a
/// non-finite value. NaN propagates.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Derivative of the logistic function written in terms of its output `a`.
pub fn sigmoid_derivative(a: f64) -> f64 {
    a * (1.0 - a)
}

/// Multiplies every entry of `error` by the local derivative at the
/// matching activation.
pub fn apply_derivative(error: &mut [f64], activations: &[f64]) {
    for (e, &a) in error.iter_mut().zip(activations) {
        *e *= sigmoid_derivative(a);
    }
}
