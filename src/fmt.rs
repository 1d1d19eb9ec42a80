/// Group the integer part of a non-negative number string with commas.
fn group_thousands(int_part: &str) -> String {
    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    with_commas.chars().rev().collect()
}

/// Format a float as a currency amount with thousands separators: R$ 1,234.56
/// (negative: R$ -1,234.56)
pub fn money(symbol: &str, val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let with_commas = group_thousands(int_part);

    // -0.001 rounds to 0.00; don't render it as negative
    if negative && cents != "0.00" {
        format!("{symbol} -{with_commas}.{dec_part}")
    } else {
        format!("{symbol} {with_commas}.{dec_part}")
    }
}

/// Format an integer count with thousands separators: 12,345
pub fn number(val: usize) -> String {
    group_thousands(&val.to_string())
}

/// Compact axis label: R$ 1.5k, R$ 2M
pub fn compact(symbol: &str, val: f64) -> String {
    if val >= 1_000_000.0 {
        let m = val / 1_000_000.0;
        if m == m.floor() {
            format!("{symbol} {}M", m as u64)
        } else {
            format!("{symbol} {:.1}M", m)
        }
    } else if val >= 1000.0 {
        let k = val / 1000.0;
        if k == k.floor() {
            format!("{symbol} {}k", k as u64)
        } else {
            format!("{symbol} {:.1}k", k)
        }
    } else {
        format!("{symbol} {}", val.max(0.0) as u64)
    }
}
