//! Display formatting helpers for prices and dates.

/// Format a yen amount with thousands separators, e.g. `¥12,345`.
pub fn format_yen(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-¥{}", grouped)
    } else {
        format!("¥{}", grouped)
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    // Try to parse ISO format and convert to readable
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%Y-%m-%d").to_string()
    } else if date.len() >= 10 {
        // Already YYYY-MM-DD (possibly with time appended)
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_yen() {
        assert_eq!(format_yen(0), "¥0");
        assert_eq!(format_yen(980), "¥980");
        assert_eq!(format_yen(1500), "¥1,500");
        assert_eq!(format_yen(1234567), "¥1,234,567");
        assert_eq!(format_yen(-4500), "-¥4,500");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-08-30"), "2026-08-30");
        assert_eq!(format_date("2026-08-30T12:34:56+09:00"), "2026-08-30");
        assert_eq!(format_date("n/a"), "n/a");
    }
}
