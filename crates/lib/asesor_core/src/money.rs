//! Dollar → bolívar conversion and price formatting.

/// Convert a dollar amount to local currency, rounded to cents.
pub fn to_local(usd: f64, rate: f64) -> f64 {
    (usd * rate * 100.0).round() / 100.0
}

/// `$450`, `$12.50`.
pub fn format_usd(amount: f64) -> String {
    if amount.fract().abs() < f64::EPSILON {
        format!("${amount:.0}")
    } else {
        format!("${amount:.2}")
    }
}

/// Venezuelan grouping: `.` for thousands, `,` for decimals (`24.525,00`).
pub fn format_local(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}
