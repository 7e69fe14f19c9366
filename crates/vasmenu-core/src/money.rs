use rust_decimal::Decimal;

/// Currency symbols for the codes providers actually send. Anything else
/// renders as `"{code} {amount}"`.
fn symbol_for(code: &str) -> Option<&'static str> {
    match code {
        "ZAR" => Some("R"),
        "USD" => Some("$"),
        "EUR" => Some("\u{20ac}"),
        "GBP" => Some("\u{a3}"),
        "NGN" => Some("\u{20a6}"),
        _ => None,
    }
}

/// Render a price for display.
///
/// A zero amount renders as `"Free"`; a positive amount as the currency
/// symbol followed by the amount with two decimal places, e.g. `"R12.99"`.
/// Unknown currency codes fall back to `"{code} {amount}"`.
#[must_use]
pub fn format_price(amount: Decimal, currency: &str) -> String {
    if amount.is_zero() {
        return "Free".to_string();
    }
    let rounded = amount.round_dp(2);
    let code = currency.to_uppercase();
    match symbol_for(&code) {
        Some(symbol) => format!("{symbol}{rounded:.2}"),
        None => format!("{code} {rounded:.2}"),
    }
}
