//! ブラウザ互換の数値変換
//!
//! ハッシュやマークアップ属性から来る値は文字列のことが多いため、
//! `Number()` / `parseInt()` と同じ結果になるよう変換する。

/// `Number(value)` 相当の変換
///
/// 前後の空白を除去し、空文字は0、解釈できない値はNaNになる。
pub fn coerce_number(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(value) = parse_prefixed(trimmed) {
        return value;
    }
    // "inf" や "nan" はRustでは通るがブラウザでは通らない
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// `0x` / `0o` / `0b` 付きの整数。符号は付けられない
fn parse_prefixed(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    Some(
        digits
            .chars()
            .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)))
            .unwrap_or(f64::NAN),
    )
}

/// `parseInt(value, 10)` 相当の変換
///
/// 先頭の空白と符号のあとに続く数字だけを読む。数字が1つもなければ `None`（NaN）。
///
/// # Examples
/// ```
/// use photoswipe_gallery_common::numeric::parse_int;
///
/// assert_eq!(parse_int("3"), Some(3));
/// assert_eq!(parse_int(" 12px"), Some(12));
/// assert_eq!(parse_int("abc"), None);
/// ```
pub fn parse_int(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("1200"), 1200.0);
        assert_eq!(coerce_number(" 800 "), 800.0);
        assert_eq!(coerce_number("1.5e3"), 1500.0);
        assert_eq!(coerce_number(""), 0.0);
        assert!(coerce_number("wide").is_nan());
        assert!(coerce_number("inf").is_nan());
        assert!(coerce_number("12px").is_nan());
    }

    #[test]
    fn test_coerce_number_radix_prefix() {
        assert_eq!(coerce_number("0x10"), 16.0);
        assert_eq!(coerce_number(" 0XfF "), 255.0);
        assert_eq!(coerce_number("0o17"), 15.0);
        assert_eq!(coerce_number("0b101"), 5.0);
        assert!(coerce_number("0x").is_nan());
        assert!(coerce_number("0b102").is_nan());
        assert!(coerce_number("-0x10").is_nan());
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int("2"), Some(2));
        assert_eq!(parse_int("3abc"), Some(3));
        assert_eq!(parse_int("-1"), Some(-1));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("  42"), Some(42));
        assert_eq!(parse_int("0"), Some(0));
    }

    #[test]
    fn test_parse_int_nan() {
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("b"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("1.5"), Some(1));
    }
}
