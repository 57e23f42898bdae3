//! Account number normalization.
//!
//! Banks print the same account number in many shapes (`5000 1245 6`,
//! `5000-12456`, lowercase IFSC-style prefixes). Normalized forms are only
//! used for comparison; the raw text is what gets stored.

/// Strip spaces, hyphens and tabs, then uppercase what is left.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '\t'))
        .flat_map(char::to_uppercase)
        .collect()
}

/// True when both account numbers normalize to the same text.
pub fn same_account(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
