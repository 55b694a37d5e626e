/// Parse the leading decimal number of a cell's text.
///
/// Leading whitespace is skipped and trailing text after the number is ignored, so a
/// rendered voltage cell such as `10.00mV` reads as `10.0`. Text without a leading
/// number (`Err`, blank, `abc`) and non-finite results yield `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    match fast_float::parse_partial::<f64, _>(text.trim_start()) {
        Ok((value, consumed)) if consumed > 0 && value.is_finite() => Some(value),
        _ => None,
    }
}

/// Parse the leading integer of user input: optional sign and decimal digits,
/// anything after them ignored (`"450.7 Ω"` reads as `450`).
pub fn parse_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = bytes[sign..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    trimmed[..sign + digits].parse().ok()
}
