use chrono::NaiveDate;

/// `dd/mm/yyyy`, or `N/A` when there is no date
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Two decimals behind the currency symbol, sign in front
pub fn format_money(symbol: &str, amount: f64) -> String {
    // Anything that rounds to zero prints unsigned
    if amount < 0.0 && format!("{:.2}", -amount) != "0.00" {
        format!("-{}{:.2}", symbol, -amount)
    } else {
        format!("{}{:.2}", symbol, amount.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2025, 10, 1)), "01/10/2025");
        assert_eq!(format_date(None), "N/A");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("₱", 3.0), "₱3.00");
        assert_eq!(format_money("$", -24.5), "-$24.50");
        assert_eq!(format_money("₱", 0.126), "₱0.13");
    }

    #[test]
    fn test_negative_zero_prints_unsigned() {
        // No stock sold at a loss
        let profit = (8.0 - 10.0) * 0.0;
        assert_eq!(format_money("₱", profit), "₱0.00");
        assert_eq!(format_money("₱", -0.001), "₱0.00");
    }
}
