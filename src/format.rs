//! Price and count parsing shared by the totals, export and display code.

/// Parse a formatted price such as `"$1,234.50"` into a number.
///
/// Every character other than ASCII digits, `.` and `-` is dropped, then the
/// longest numeric prefix is read: `"$12.50 - $15.00"` is 12.5 and `"1.2.3"`
/// is 1.2. Input with no leading number (empty, `"N/A"`) is worth zero.
pub fn parse_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned[..numeric_prefix_len(&cleaned)]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Length of the leading `-?digits[.digits]` run of an ASCII string.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_dot = false;
    let mut last_digit = None;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => last_digit = Some(end + 1),
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    last_digit.unwrap_or(0)
}

/// Parse the leading integer of a card count (`"3"`, `" 2 "`, `"4 copies"`).
///
/// Returns zero when no leading digits are present.
pub fn parse_count(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| n * sign).unwrap_or(0)
}

/// Format an amount as a two-decimal dollar string (`"$12.50"`).
pub fn format_currency(amount: f64) -> String {
    // normalize -0.0
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("${:.2}", amount)
}
