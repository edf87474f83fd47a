/// Formats a population as a short string: millions with at most one decimal
/// above one million, otherwise whole thousands rounded down.
///
/// Negative numbers always fall in the thousands branch, and round toward
/// negative infinity like every other value there.

pub fn format_population(number: i64) -> String {
    if number > 1_000_000 {
        if number % 1_000_000 == 0 {
            return format!("{} M", number / 1_000_000);
        }
        return format!("{:.1} M", number as f64 / 1_000_000.0);
    }
    format!("{} K", number.div_euclid(1000))
}

/// Returns `count` as a whole percentage of `total`, rounding halves to even.
/// An empty total gives zero.

pub fn round_percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round_ties_even() as u32
}
