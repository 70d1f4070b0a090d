/// Fraction of predictions equal to the true label
///
/// Returns 0.0 for empty input. Pairs beyond the shorter slice are ignored.
pub fn accuracy<T: PartialEq>(y_true: &[T], y_pred: &[T]) -> f64 {
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / n as f64
}

/// Accuracy as a percentage rounded to two decimals
pub fn accuracy_percent<T: PartialEq>(y_true: &[T], y_pred: &[T]) -> f64 {
    (accuracy(y_true, y_pred) * 10_000.0).round() / 100.0
}
