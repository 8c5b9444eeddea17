/// Currency suffix appended to formatted amounts
pub const CURRENCY_SUFFIX: &str = "원";

/// Render an amount as whole currency units with thousands separators,
/// e.g. `1234567.0` -> `"1,234,567원"`. Non-finite amounts render as zero.
pub fn format_price(amount: f64) -> String {
    let amount = if amount.is_finite() { amount.round() } else { 0.0 };
    let negative = amount < 0.0;
    let digits = format!("{}", amount.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}", if negative { "-" } else { "" }, grouped, CURRENCY_SUFFIX)
}
