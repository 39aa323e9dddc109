/// Characters dropped from key text before it becomes a field name.
const STRIPPED: &[char] = &['\'', '\u{2019}', '.', ':'];

/// Turn raw key text (e.g. `"Date of Birth:"`) into a stable field name (`date_of_birth`).
///
/// Lower-cases, removes apostrophes, periods and colons, trims, then joins
/// the remaining whitespace-separated words with `_`. Idempotent.
pub fn normalize_key(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED.contains(c))
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}
