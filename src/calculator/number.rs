//! Operand parsing and number formatting.
//!
//! Operands travel through the engine as strings exactly as they were typed.
//! These helpers convert them to `f64` for evaluation and back to the shortest
//! string that identifies the value.

/// Parse an operand the way a keypad reads it back.
///
/// Only the longest numeric prefix is considered, so `"12."` is 12 and
/// `"3e+"` is 3. Input with no leading digits (`""`, `"-"`, `"."`) is NaN.
pub fn parse_operand(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    if body.starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let bytes = body.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_point = false;

    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return f64::NAN;
    }

    // Optional exponent, only taken when at least one exponent digit follows
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let digits_start = cursor;
        while matches!(bytes.get(cursor), Some(b'0'..=b'9')) {
            cursor += 1;
        }
        if cursor > digits_start {
            end = cursor;
        }
    }

    let magnitude: f64 = body[..end].parse().unwrap_or(f64::NAN);
    if negative { -magnitude } else { magnitude }
}

/// Enough fraction digits to print any finite `f64` exactly.
const EXACT_DIGITS: usize = 780;

/// Round a value to `digits` significant decimal digits.
///
/// Strips binary floating-point noise such as `0.1 + 0.2 = 0.30000000000000004`.
/// Exact halves round away from zero.
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 || digits == 0 {
        return value;
    }

    let (mantissa, exponent) = significant_digits(value.abs(), digits);
    let (lead, rest) = mantissa.split_at(1);
    let sign = if value < 0.0 { "-" } else { "" };
    let text = if rest.is_empty() {
        format!("{sign}{lead}e{exponent}")
    } else {
        format!("{sign}{lead}.{rest}e{exponent}")
    };

    text.parse().unwrap_or(value)
}

/// The first `digits` significant digits of `magnitude` and the decimal
/// exponent of the first one, rounded half away from zero on the exact
/// binary value.
fn significant_digits(magnitude: f64, digits: usize) -> (String, i32) {
    let exact = format!("{:.*e}", EXACT_DIGITS, magnitude);
    let (mantissa, exponent) = exact.split_once('e').unwrap_or((exact.as_str(), "0"));
    let mut exponent: i32 = exponent.parse().unwrap_or(0);

    let all: Vec<u8> = mantissa.bytes().filter(u8::is_ascii_digit).collect();
    let digits = digits.clamp(1, all.len());
    let mut kept = all[..digits].to_vec();

    if all.get(digits).is_some_and(|&next| next >= b'5') {
        let mut carried = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carried = false;
                break;
            }
        }
        // 9.99 -> 10.0: shift the extra digit into the exponent
        if carried {
            kept.insert(0, b'1');
            kept.pop();
            exponent += 1;
        }
    }

    (kept.iter().map(|&b| char::from(b)).collect(), exponent)
}

/// Format a value as the shortest string that round-trips.
///
/// Negative zero prints as `0`. Magnitudes of at least 1e21 or below 1e-6
/// use exponent form with an explicit sign (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        signed_exponent(&format!("{:e}", value))
    } else {
        format!("{}", value)
    }
}

/// Format a value with `precision` significant digits.
///
/// Uses fixed notation unless the exponent is below -6 or at least
/// `precision`, in which case exponent form is used. Trailing zeros are kept.
pub fn to_precision(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return format_number(value);
    }

    let precision = precision.max(1);
    let sign = if value.is_sign_negative() && value != 0.0 {
        "-"
    } else {
        ""
    };
    let (digits, exponent) = significant_digits(value.abs(), precision);

    if exponent < -6 || exponent >= precision as i32 {
        let (lead, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            lead.to_string()
        } else {
            format!("{lead}.{rest}")
        };
        format!("{}{}", sign, signed_exponent(&format!("{mantissa}e{exponent}")))
    } else if exponent >= 0 {
        let (int_part, frac_part) = digits.split_at(exponent as usize + 1);
        if frac_part.is_empty() {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part}")
        }
    } else {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    }
}

/// Turn Rust's `1e21` exponent form into `1e+21`.
fn signed_exponent(formatted: &str) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted.to_string(),
    }
}
