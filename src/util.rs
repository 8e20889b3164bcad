// Parsing and formatting helpers shared by the loaders and the report output.
use num_format::{Locale, ToFormattedString};

/// Parse a spreadsheet-style number into `f64`.
///
/// - Trims whitespace.
/// - Strips thousands separators and a leading `$` or trailing `%`.
/// - Rejects anything containing letters ("no data", "n/a").
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    let s = s.trim_start_matches('$').trim_end_matches('%').trim();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn average(v: &[f64]) -> f64 {
    // Callers check for emptiness; an empty slice gives NaN rather than 0.
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn sample_std(v: &[f64]) -> Option<f64> {
    if v.len() < 2 {
        return None;
    }
    let mean = average(v);
    let ss: f64 = v.iter().map(|x| (x - mean).powi(2)).sum();
    Some((ss / (v.len() - 1) as f64).sqrt())
}

/// Format with a fixed number of decimals and `en` thousands separators,
/// e.g. `1,234,567.89`. Display only: never feed the result back into
/// classification.
pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Beyond i64 there is no grouping; print the plain value instead.
    let Ok(int_val) = int_part.parse::<i64>() else {
        return format!("{:.*}", decimals, n);
    };
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spreadsheet_numbers() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("38.8%")), Some(38.8));
        assert_eq!(parse_f64_safe(Some("$28780")), Some(28780.0));
        assert_eq!(parse_f64_safe(Some("no data")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parses_years() {
        assert_eq!(parse_i32_safe(Some("2024")), Some(2024));
        assert_eq!(parse_i32_safe(Some("20x4")), None);
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-0.5, 1), "-0.5");
        assert_eq!(format_number(42.0, 0), "42");
        assert_eq!(format_int(9855), "9,855");
    }

    #[test]
    fn huge_values_are_not_zeroed() {
        assert_eq!(format_number(1e20, 1), "100000000000000000000.0");
        assert_eq!(format_number(-1e20, 0), "-100000000000000000000");
        assert_ne!(format_number(f64::MAX, 2), "0.00");
    }

    #[test]
    fn sample_std_needs_two_values() {
        assert_eq!(sample_std(&[1.0]), None);
        let s = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - 2.138089935299395).abs() < 1e-12);
    }
}
