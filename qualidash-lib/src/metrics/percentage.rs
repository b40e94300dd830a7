/// Express `numerator` as a whole percentage of `denominator`.
///
/// A zero denominator yields 100%, except for 0/0 when `zero_divided_by_zero_is_zero` is set,
/// which yields 0%. Halves round to the nearest even percentage.
#[must_use]
pub fn percentage(numerator: f64, denominator: f64, zero_divided_by_zero_is_zero: bool) -> i64 {
    if denominator == 0.0 {
        return if zero_divided_by_zero_is_zero && numerator == 0.0 { 0 } else { 100 };
    }

    #[expect(clippy::cast_possible_truncation, reason = "percentages of measured quantities fit in an i64")]
    let result = (100.0 * numerator / denominator).round_ties_even() as i64;
    result
}
