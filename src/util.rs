// Utility helpers for parsing, basic statistics and number rendering.
//
// The loader and the report builders lean on these so the rest of the code
// can assume clean, typed values.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Date layouts accepted in the `Date` column, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a string-like value into a finite `f64`.
///
/// - Trims whitespace.
/// - Accepts anything `f64::from_str` does, scientific notation included.
/// - Accepts `,` only as a thousands separator in strict groups of three
///   (`1,250.75`); `1,5` or `1,2,3` are rejected rather than guessed at.
/// - Rejects `NaN`, infinities and literals too large to represent.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let v = if s.contains(',') {
        if !is_thousands_grouped(s) {
            return None;
        }
        s.replace(',', "").parse::<f64>().ok()?
    } else {
        s.parse::<f64>().ok()?
    };
    v.is_finite().then_some(v)
}

fn is_thousands_grouped(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if let Some(frac) = frac_part {
        if !all_digits(frac) {
            return false;
        }
    }
    let mut groups = int_part.split(',');
    let lead_ok = groups
        .next()
        .map_or(false, |g| all_digits(g) && g.len() <= 3);
    lead_ok && groups.all(|g| g.len() == 3 && all_digits(g))
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Mean of the defined values only; `None` when nothing is defined.
pub fn average_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Two-decimal tonnage, e.g. `12345.68 tons`.
pub fn format_tons(n: f64) -> String {
    format!("{:.2} tons", n)
}

/// Two-decimal percentage, e.g. `66.67 %`; `N/A` when undefined.
pub fn format_percent(n: Option<f64>) -> String {
    match n {
        Some(v) => format!("{:.2} %", v),
        None => "N/A".to_string(),
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus thousands separators (e.g. `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
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
    fn parses_numbers_forgivingly() {
        assert_eq!(parse_f64_safe(Some(" 12.5 ")), Some(12.5));
        assert_eq!(parse_f64_safe(Some("1,250.75")), Some(1250.75));
        assert_eq!(parse_f64_safe(Some("12,345,678")), Some(12345678.0));
        assert_eq!(parse_f64_safe(Some("1.5e2")), Some(150.0));
        assert_eq!(parse_f64_safe(Some("2E-1")), Some(0.2));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("abc")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn rejects_ambiguous_commas() {
        assert_eq!(parse_f64_safe(Some("1,5")), None);
        assert_eq!(parse_f64_safe(Some("1,2,3")), None);
        assert_eq!(parse_f64_safe(Some("12,34,567")), None);
        assert_eq!(parse_f64_safe(Some("1234,567")), None);
        assert_eq!(parse_f64_safe(Some(",250")), None);
        assert_eq!(parse_f64_safe(Some("1,250.")), None);
    }

    #[test]
    fn rejects_non_finite_values() {
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("inf")), None);
        assert_eq!(parse_f64_safe(Some("-infinity")), None);
        assert_eq!(parse_f64_safe(Some("1e400")), None);
        assert_eq!(parse_f64_safe(Some(&"9".repeat(400))), None);
    }

    #[test]
    fn parses_supported_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date_safe(Some("2024-01-15")), expected);
        assert_eq!(parse_date_safe(Some("2024/01/15")), expected);
        assert_eq!(parse_date_safe(Some("01/15/2024")), expected);
        assert_eq!(parse_date_safe(Some("2024-01-15 06:30:00")), expected);
        assert_eq!(parse_date_safe(Some("15th Jan")), None);
        assert_eq!(parse_date_safe(Some("  ")), None);
    }

    #[test]
    fn averages_handle_empty_input() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[1.0, 2.0, 6.0]), 3.0);
        assert_eq!(average_defined(vec![None, None]), None);
        assert_eq!(average_defined(vec![Some(2.0), None, Some(4.0)]), Some(3.0));
    }

    #[test]
    fn formats_report_units() {
        assert_eq!(format_tons(12345.678), "12345.68 tons");
        assert_eq!(format_tons(150.0), "150.00 tons");
        assert_eq!(format_percent(Some(66.666)), "66.67 %");
        // exact binary ties round to even
        assert_eq!(format_tons(0.125), "0.12 tons");
        assert_eq!(format_tons(0.375), "0.38 tons");
        assert_eq!(format_percent(Some(2.625)), "2.62 %");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 1), "-42.0");
        assert_eq!(format_number(7.0, 0), "7");
        assert_eq!(format_int(9855usize), "9,855");
    }
}
