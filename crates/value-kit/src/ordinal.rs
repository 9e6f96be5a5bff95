/// English ordinal suffix of a number
///
/// The number is floored first. Numbers ending in 11, 12 or 13 take `th`;
/// otherwise the last digit picks `st`, `nd`, `rd` or `th`. Negative
/// numbers follow the same rule on their remainders, which keep the sign
/// of the number (so `-1` gives `th`). Non-finite input gives `th`.
///
/// ```
/// assert_eq!(value_kit::ordinal(142.0), "nd");
/// assert_eq!(value_kit::ordinal(113.0), "th");
/// ```
pub fn ordinal(number: f64) -> &'static str {
    if !number.is_finite() {
        return "th";
    }
    // Remainders stay in f64 so magnitudes beyond i64 keep their last digits
    let number = number.floor();
    let hundred_rem = number % 100.0;
    let ten_rem = number % 10.0;
    if hundred_rem - ten_rem == 10.0 {
        return "th";
    }
    if ten_rem == 1.0 {
        "st"
    } else if ten_rem == 2.0 {
        "nd"
    } else if ten_rem == 3.0 {
        "rd"
    } else {
        "th"
    }
}
