/// Insert thousands separators into a whole-dollar amount
fn group_thousands(dollars: u64) -> String {
    let digits = dollars.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a currency value rounded to whole dollars (e.g. `$1,946`)
pub fn format_currency(value: f64) -> String {
    let dollars = value.abs().round() as u64;
    if value < 0.0 && dollars > 0 {
        format!("-${}", group_thousands(dollars))
    } else {
        format!("${}", group_thousands(dollars))
    }
}

/// Format a currency value with cents (e.g. `$1,946.25`)
pub fn format_currency_cents(value: f64) -> String {
    let cents_total = (value.abs() * 100.0).round() as u64;
    let dollars = cents_total / 100;
    let cents = cents_total % 100;

    if value < 0.0 && cents_total > 0 {
        format!("-${}.{:02}", group_thousands(dollars), cents)
    } else {
        format!("${}.{:02}", group_thousands(dollars), cents)
    }
}

/// Format a fraction as a percentage (0.093 -> `9.30%`)
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a value already expressed in percent (9.3 -> `9.30%`)
pub fn format_percent_value(value: f64) -> String {
    format!("{value:.2}%")
}
