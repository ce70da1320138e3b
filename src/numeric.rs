//! Numeric literal construction: the reduction/canonicalisation rules from
//! the grammar's "numeric conversion at lex time" table, split out from the
//! structural recursive-descent parser for readability.

use num_bigint::BigInt;

use crate::value::{FloatLit, Number, Sign};

/// `float → reduce to Int if exactly integral, else Float with precision
/// equal to digits-after-point`. `integer → Int`. Shared by `simple` and by
/// the two components of `complex`.
pub fn simple_number(sign: Option<char>, int_part: &str, frac_part: Option<&str>) -> Number {
    match frac_part {
        None => Number::Int(parse_bigint(sign, int_part)),
        Some(frac) => {
            if frac.chars().all(|c| c == '0') {
                Number::Int(parse_bigint(sign, int_part))
            } else {
                let text = format!("{}{int_part}.{frac}", sign.map(|c| c.to_string()).unwrap_or_default());
                let value: f64 = text.parse().unwrap_or(0.0);
                Number::Float(FloatLit::new(value, frac.len() as u8))
            }
        }
    }
}

fn parse_bigint(sign: Option<char>, digits: &str) -> BigInt {
    let text = format!("{}{digits}", sign.map(|c| c.to_string()).unwrap_or_default());
    text.parse().unwrap_or_else(|_| BigInt::from(0))
}

/// Canonicalise a scientific-notation literal: strip a leading `+` after
/// `E`, and render as a plain integer string if the value is exactly
/// integral (determined by shifting the decimal point by the exponent over
/// the literal digit string, so arbitrarily large exponents stay exact —
/// no float rounding is involved).
pub fn canonicalize_sci(
    sign: Option<char>,
    int_part: &str,
    frac_part: &str,
    exp_sign: Option<char>,
    exp_digits: &str,
) -> String {
    let sign_text = sign.map(|c| c.to_string()).unwrap_or_default();
    let exp_value: i64 = exp_digits.parse().unwrap_or(0) * if exp_sign == Some('-') { -1 } else { 1 };
    let digits = format!("{int_part}{frac_part}");
    let point = int_part.len() as i64 + exp_value;

    if let Some(int_text) = shift_to_integer(&digits, point) {
        format!("{sign_text}{int_text}")
    } else {
        let exp_rendered = if exp_value < 0 {
            format!("-{}", exp_value.unsigned_abs())
        } else {
            exp_value.to_string()
        };
        format!("{sign_text}{int_part}.{frac_part}E{exp_rendered}")
    }
}

/// If shifting `digits`' decimal point to `point` places from the left
/// leaves no non-zero fractional remainder, returns the resulting integer
/// text (unsigned).
fn shift_to_integer(digits: &str, point: i64) -> Option<String> {
    let len = digits.len() as i64;
    if point >= len {
        let zeros = (point - len) as usize;
        let mut s = digits.to_string();
        s.push_str(&"0".repeat(zeros));
        let trimmed = s.trim_start_matches('0');
        Some(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
    } else if point <= 0 {
        if digits.chars().all(|c| c == '0') {
            Some("0".to_string())
        } else {
            None
        }
    } else {
        let (ip, fp) = digits.split_at(point as usize);
        if fp.chars().all(|c| c == '0') {
            let trimmed = ip.trim_start_matches('0');
            Some(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
        } else {
            None
        }
    }
}

pub fn infinity_sign(sign: Option<char>) -> Sign {
    match sign {
        Some('+') => Sign::Pos,
        Some('-') => Sign::Neg,
        _ => Sign::Unsigned,
    }
}
