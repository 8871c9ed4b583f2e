use ndarray::{ArrayBase, Data, Ix1};
use num_traits::Float;

/// Indices that would sort `a`, comparing floats by their total order.
pub fn argsort_f64(a: &[f64]) -> Vec<usize> {
    let mut idx = (0..a.len()).collect::<Vec<usize>>();
    idx.sort_by(|&i, &j| a[i].total_cmp(&a[j]));
    idx
}

/// Distinct values of `a` in ascending order. `-0.0` and `0.0` count once.
pub fn distinct_sorted(a: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = argsort_f64(a)
        .into_iter()
        .map(|i| if a[i] == 0.0 { 0.0 } else { a[i] })
        .collect();
    values.dedup_by(|x, y| x.total_cmp(y).is_eq());
    values
}

/// Mean and sample standard deviation. A single sample has zero deviation.
pub fn mean_std<S: Data<Elem = f64>>(x: &ArrayBase<S, Ix1>) -> (f64, f64) {
    let n = x.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = x.sum() / n as f64;
    if n == 1 {
        return (mean, 0.0);
    }
    let ss = x.fold(0.0, |acc, v| acc + (v - mean).powi(2));
    (mean, (ss / (n - 1) as f64).sqrt())
}

/// Shrink `x` toward zero by `threshold`, clamping at zero.
pub fn soft_threshold<F: Float>(x: F, threshold: F) -> F {
    if x > threshold {
        x - threshold
    } else if x < -threshold {
        x + threshold
    } else {
        F::zero()
    }
}

/// Render values as a dense vector, e.g. `[1.0,-0.5]`.
pub fn format_dense<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> String {
    let parts: Vec<String> = values.into_iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", parts.join(","))
}
