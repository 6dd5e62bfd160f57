//! Display formatting for backend numbers. Raw values stay in the payloads
//! untouched; formatted strings are added alongside them.

/// Renders an amount in minor currency units as "major.minor CUR".
pub fn minor_units(amount: i64, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02} {}", sign, abs / 100, abs % 100, currency)
}

pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_units_splits_major_and_minor() {
        assert_eq!(minor_units(12345, "RUB"), "123.45 RUB");
        assert_eq!(minor_units(12900, "RUB"), "129.00 RUB");
        assert_eq!(minor_units(5, "RUB"), "0.05 RUB");
        assert_eq!(minor_units(0, "RUB"), "0.00 RUB");
    }

    #[test]
    fn test_minor_units_keeps_the_sign_on_refunds() {
        assert_eq!(minor_units(-45, "RUB"), "-0.45 RUB");
        assert_eq!(minor_units(-12900, "RUB"), "-129.00 RUB");
    }

    #[test]
    fn test_percent_renders_two_decimals() {
        assert_eq!(percent(4.0), "4.00%");
        assert_eq!(percent(12.345), "12.35%");
    }
}
