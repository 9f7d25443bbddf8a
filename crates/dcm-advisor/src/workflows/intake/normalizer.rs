/// Canonical form of a CSV header cell: invisible marks removed, inner
/// whitespace collapsed to `_`, lowercase.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    collapsed.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_case() {
        assert_eq!(normalize_header("\u{feff}Age"), "age");
        assert_eq!(normalize_header("  T2_Signal "), "t2_signal");
        assert_eq!(normalize_header("Duration\u{200b} Months"), "duration_months");
    }
}
