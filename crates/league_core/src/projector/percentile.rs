/// Percentile of each value within `values`, in [0, 100]. Equal values
/// share the average of their ranks; NaN inputs rank 0 and are left out of
/// the population.
pub fn percentile_ranks(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();

    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                return 0.0;
            }
            if n == 1 {
                return 100.0;
            }
            let below = sorted.partition_point(|&x| x < v);
            let equal = sorted[below..].iter().take_while(|&&x| x == v).count();
            let rank = below as f64 + (equal as f64 - 1.0) / 2.0;
            (100.0 * rank / (n - 1) as f64).clamp(0.0, 100.0)
        })
        .collect()
}
