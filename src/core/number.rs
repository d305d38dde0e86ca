//! Lenient number parsing and display formatting for form fields
//!
//! Form inputs arrive as free text. Parsing follows the browser's
//! `parseFloat` rules (longest numeric prefix wins, anything else is NaN)
//! and display formatting follows `Number.prototype.toFixed` and the
//! browser's number-to-string conversion, so values round-trip through a
//! page the same way they would through the web form.

/// Parse the longest leading decimal number in `text`.
///
/// Leading whitespace is skipped. Returns NaN when no numeric prefix exists.
///
/// ```
/// use orca::core::number::parse_float;
///
/// assert_eq!(parse_float("  12.5kg"), 12.5);
/// assert_eq!(parse_float("-3e2"), -300.0);
/// assert!(parse_float("abc").is_nan());
/// ```
pub fn parse_float(text: &str) -> f64 {
    let s = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse an optional field, treating absence and NaN as zero
pub fn number_or_zero(text: Option<&str>) -> f64 {
    let value = text.map(parse_float).unwrap_or(f64::NAN);
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Format with a fixed number of decimals, like `Number.prototype.toFixed`
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() || value.abs() >= 1e21 {
        return js_number(value);
    }
    // Round half up on the exact decimal expansion of the magnitude; `{:.*}`
    // alone would round exact ties to even.
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let digits = digits.min(fraction.len());

    let mut kept: Vec<u8> = int_part.bytes().chain(fraction[..digits].bytes()).collect();
    if fraction[digits..].starts_with(['5', '6', '7', '8', '9']) {
        increment_digits(&mut kept);
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    // Negative zero prints without a sign
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&String::from_utf8_lossy(&kept[..split]));
    if digits > 0 {
        out.push('.');
        out.push_str(&String::from_utf8_lossy(&kept[split..]));
    }
    out
}

/// Enough fraction digits to print any f64 exactly
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Add one unit in the last place of a run of ASCII digits
fn increment_digits(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Format as the browser would when assigning a number to a text field
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    format!("{}", value)
}
