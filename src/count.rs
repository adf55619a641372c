/// Parse an abbreviated count such as `"1.2k"`, `"3m"` or `"1,234"`.
///
/// Scraped counters are unreliable, so anything that does not parse
/// (empty text, stray words, negative or non-finite numbers) becomes `0`.
pub fn parse_count(text: &str) -> u64 {
    let text = text.trim().to_lowercase().replace(',', "");
    if text.is_empty() {
        return 0;
    }

    let (number, multiplier) = if text.contains('k') {
        (text.replace('k', ""), 1_000.0)
    } else if text.contains('m') {
        (text.replace('m', ""), 1_000_000.0)
    } else {
        return text.parse::<u64>().unwrap_or(0);
    };

    match number.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => (value * multiplier) as u64,
        _ => 0,
    }
}
