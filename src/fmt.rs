use crate::money::Paise;

/// Format paise as rupees with Indian digit grouping: Rs.7,43,483.09
pub fn money(paise: Paise) -> String {
    let negative = paise < 0;
    let abs = paise.unsigned_abs();
    let int_part = (abs / 100).to_string();
    let dec_part = abs % 100;

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        // first group is three digits, every later group is two
        if i == 3 || (i > 3 && (i - 3) % 2 == 0) {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-Rs.{grouped}.{dec_part:02}")
    } else {
        format!("Rs.{grouped}.{dec_part:02}")
    }
}
