use rand::Rng;

/// Maps a uniform draw in [0, 1) to the initial weight range [-0.25, 0.25).
pub fn init_weight(r: f64) -> f64 {
    r * 0.5 - 0.25
}

/// Draws `len` independent initial weights from `rng`.
pub fn random_weights<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f64> {
    (0..len).map(|_| init_weight(rng.gen::<f64>())).collect()
}

/// Weighted sum of `input` against the leading weights, plus the trailing
/// bias weight paired with an implicit input of 1.
///
/// Callers must ensure `weights.len() == input.len() + 1`.
pub fn dot_with_bias(input: &[f64], weights: &[f64]) -> f64 {
    let (bias, w) = match weights.split_last() {
        Some((bias, w)) => (*bias, w),
        None => return 0.0,
    };
    input.iter().zip(w).map(|(x, w)| x * w).sum::<f64>() + bias
}

/// Element-wise `acc[i] += rhs[i]`.
pub fn add_assign(acc: &mut [f64], rhs: &[f64]) {
    for (a, b) in acc.iter_mut().zip(rhs) {
        *a += b;
    }
}

/// Element-wise `lhs - rhs`.
pub fn sub(lhs: &[f64], rhs: &[f64]) -> Vec<f64> {
    lhs.iter().zip(rhs).map(|(a, b)| a - b).collect()
}
