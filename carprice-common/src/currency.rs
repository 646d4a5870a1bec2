//! Currency formatting for predicted prices

/// Default currency symbol (Indian rupee)
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Format `amount` as `symbol` + two decimals with comma thousands separators
///
/// Groups are always three digits (`₹1,234,567.89`). The sign follows the
/// symbol (`₹-1,234.50`) and is kept when the value rounds to zero, so
/// `-0.001` renders as `₹-0.00` like Python's `,.2f`. Non-finite values
/// render as `nan` / `inf`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if amount.is_nan() {
        return format!("{}nan", symbol);
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{}{}inf", symbol, sign);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount.is_sign_negative() { "-" } else { "" };

    format!("{}{}{}.{}", symbol, sign, group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
