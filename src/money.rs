use crate::error::{HomefinError, Result};

/// Monetary amount in paise (1/100 rupee). Never stored as a float.
pub type Paise = i64;

/// Parse a currency string such as `"Rs.7,43,483.09"` or `"-1,234.50"` into paise.
///
/// Only digits, `-` and `.` carry meaning; everything else (currency symbols,
/// grouping commas, whitespace) is ignored. The last `.` is the decimal
/// separator. A `.` directly after a letter belongs to a currency
/// abbreviation (`Rs.`) and never acts as a separator. The fraction is
/// truncated or zero-padded to exactly two digits.
pub fn parse_money(raw: &str) -> Result<Paise> {
    let mut digits = String::with_capacity(raw.len());
    let mut negative = false;
    let mut separator: Option<usize> = None;
    let mut prev: Option<char> = None;

    for ch in raw.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            '-' => negative = true,
            '.' if !prev.is_some_and(char::is_alphabetic) => separator = Some(digits.len()),
            _ => {}
        }
        prev = Some(ch);
    }

    if digits.is_empty() {
        return Err(HomefinError::InvalidInput(format!("not a money amount: {raw:?}")));
    }

    let (int_part, frac_part) = match separator {
        Some(pos) => digits.split_at(pos),
        None => (digits.as_str(), ""),
    };

    let mut combined = String::with_capacity(int_part.len() + 2);
    combined.push_str(if int_part.is_empty() { "0" } else { int_part });
    let frac: String = frac_part.chars().take(2).collect();
    combined.push_str(&format!("{frac:0<2}"));

    let value: i64 = combined
        .parse()
        .map_err(|_| HomefinError::InvalidInput(format!("money amount out of range: {raw:?}")))?;
    Ok(if negative { -value } else { value })
}
