/// Share of the full table still visible after filtering, in `[0, 1]`.
/// An empty table yields 0.
pub fn completion_ratio(filtered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (filtered as f64 / total as f64).min(1.0)
}
