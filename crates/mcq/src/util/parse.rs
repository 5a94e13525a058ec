//! Argument value parsing (rates, durations, percentages, integers).

use std::time::Duration;

/// Error type for parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("number out of range: {0}")]
    OutOfRange(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a u32 from string.
pub fn get_u32(s: &str) -> Result<u32> {
    parse_int(s)
}

/// Generic integer parsing with hex and octal support.
fn parse_int<T: TryFrom<u64>>(s: &str) -> Result<T>
where
    <T as TryFrom<u64>>::Error: std::fmt::Display,
{
    let s = s.trim();

    let val = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        u64::from_str_radix(&s[1..], 8)
    } else {
        s.parse::<u64>()
    }
    .map_err(|e| ParseError::InvalidNumber(format!("{}: {}", s, e)))?;

    T::try_from(val).map_err(|e| ParseError::OutOfRange(format!("{}: {}", s, e)))
}

/// Parse a rate (bits per second).
///
/// Units are case-insensitive: `bit`, `kbit`, `mbit`, `gbit`, `tbit` and the
/// binary `kibit`..`tibit` are bits; `bps`, `kbps`, `mbps`, `gbps`, `tbps`
/// and `kibps`..`tibps` are bytes. A bare number is bits.
pub fn get_rate(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    // Try to find where the number ends
    let (num_str, unit) = split_number_unit(&s);
    let num = parse_non_negative(num_str)?;

    let multiplier: u64 = match unit {
        "" | "bit" => 1,
        "kbit" | "k" => 1000,
        "mbit" | "m" => 1_000_000,
        "gbit" | "g" => 1_000_000_000,
        "tbit" | "t" => 1_000_000_000_000,
        "kibit" => 1024,
        "mibit" => 1024 * 1024,
        "gibit" => 1024 * 1024 * 1024,
        "tibit" => 1024u64 * 1024 * 1024 * 1024,
        "bps" => 8,
        "kbps" => 8 * 1000,
        "mbps" => 8 * 1_000_000,
        "gbps" => 8 * 1_000_000_000,
        "tbps" => 8 * 1_000_000_000_000,
        "kibps" => 8 * 1024,
        "mibps" => 8 * 1024 * 1024,
        "gibps" => 8 * 1024 * 1024 * 1024,
        "tibps" => 8 * 1024u64 * 1024 * 1024 * 1024,
        _ => return Err(ParseError::UnknownUnit(unit.to_string())),
    };

    let bits = num * multiplier as f64;
    if bits >= u64::MAX as f64 {
        return Err(ParseError::OutOfRange(s.clone()));
    }
    Ok(bits as u64)
}

/// Parse a time duration.
///
/// Supports suffixes: s, ms, us (and their `sec`/`msec`/`usec` spellings).
/// A bare number is microseconds.
pub fn get_time(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    let (num_str, unit) = split_number_unit(&s);
    let num = parse_non_negative(num_str)?;

    let usecs = match unit {
        "s" | "sec" | "secs" => num * 1_000_000.0,
        "ms" | "msec" | "msecs" => num * 1000.0,
        "" | "us" | "usec" | "usecs" => num,
        _ => return Err(ParseError::UnknownUnit(unit.to_string())),
    };

    if usecs >= u64::MAX as f64 {
        return Err(ParseError::OutOfRange(s.clone()));
    }
    Ok(Duration::from_micros(usecs as u64))
}

/// Parse a percentage (0-100) to a fraction (0.0-1.0).
pub fn get_percent(s: &str) -> Result<f64> {
    let s = s.trim();
    let s = s.strip_suffix('%').unwrap_or(s);
    let val: f64 = s
        .parse()
        .map_err(|_| ParseError::InvalidNumber(s.to_string()))?;
    if !(0.0..=100.0).contains(&val) {
        return Err(ParseError::OutOfRange(format!(
            "{} not in range 0-100",
            val
        )));
    }
    Ok(val / 100.0)
}

fn parse_non_negative(num_str: &str) -> Result<f64> {
    let num: f64 = num_str
        .parse()
        .map_err(|_| ParseError::InvalidNumber(num_str.to_string()))?;
    if !num.is_finite() || num < 0.0 {
        return Err(ParseError::OutOfRange(num_str.to_string()));
    }
    Ok(num)
}

/// Split a string into number and unit parts.
fn split_number_unit(s: &str) -> (&str, &str) {
    let idx = s
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .unwrap_or(s.len());
    (&s[..idx], &s[idx..])
}
