//! Tooltip text shared by every chart kind.

/// Most fraction digits shown for a value.
const MAX_FRACTION_DIGITS: usize = 3;

/// Format a number with thousands grouping and at most three fraction digits.
///
/// Trailing fraction zeros are dropped, so `1234567.5` becomes
/// `"1,234,567.5"` and `42.0` becomes `"42"`.
#[must_use]
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// One tooltip line: `"label: 1,234"`.
#[must_use]
pub fn format_entry(label: &str, value: f64) -> String {
    format!("{label}: {}", format_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_value(1_234_567.5), "1,234,567.5");
        assert_eq!(format_value(1000.0), "1,000");
        assert_eq!(format_value(999.0), "999");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn trims_fraction() {
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(3.14159), "3.142");
        assert_eq!(format_value(0.1), "0.1");
        assert_eq!(format_value(2.0004), "2");
    }

    #[test]
    fn keeps_sign() {
        assert_eq!(format_value(-12_500.25), "-12,500.25");
        assert_eq!(format_value(-0.0001), "0");
    }

    #[test]
    fn entry_joins_label_and_value() {
        assert_eq!(format_entry("sales", 1234.0), "sales: 1,234");
        assert_eq!(format_entry("Chrome", 65.0), "Chrome: 65");
    }
}
