// 🔢 Numeric input parsing
//
// Two policies for turning raw cell text into a value:
// - Tolerant: longest numeric prefix wins ("12abc" -> 12), garbage becomes 0
// - Strict:   the whole trimmed string must be a finite number

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericInput {
    #[default]
    Tolerant,
    Strict,
}

/// Outcome of a tolerant parse
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed {
    Number(f64),
    /// Nothing usable in the input; zero was substituted
    DefaultedToZero,
}

impl Parsed {
    pub fn value(&self) -> f64 {
        match self {
            Parsed::Number(v) => *v,
            Parsed::DefaultedToZero => 0.0,
        }
    }
}

/// Whole-string parse. Rejects empty, non-numeric, and non-finite input.
pub fn parse_strict(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(is_number_byte) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Leading-prefix parse in the manner of a browser's parseFloat
pub fn parse_tolerant(raw: &str) -> Parsed {
    let trimmed = raw.trim_start();
    let end = numeric_prefix_len(trimmed.as_bytes());

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Parsed::Number)
        .unwrap_or(Parsed::DefaultedToZero)
}

/// Length of the longest leading `[+-]digits[.digits][e[+-]digits]`, 0 if none.
/// A dot or exponent marker is only taken when digits follow it.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_end = |start: usize| {
        start + bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count()
    };

    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut end = digits_end(sign);
    let mut mantissa_digits = end - sign;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_end(end + 1);
        if fraction_end > end + 1 {
            mantissa_digits += fraction_end - end - 1;
            end = fraction_end;
        }
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_end(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }

    end
}

fn is_number_byte(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E')
}
