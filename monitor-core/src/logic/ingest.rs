//! Waveform ingestion for one-shot analysis.
//!
//! Turns uploaded CSV text or pasted comma-separated values into a
//! `SampleSequence`. Each cell is read up to the end of its leading decimal
//! number, so unit suffixes like `2.5 mOhm` are tolerated. Cells with no
//! leading number and non-finite values are skipped rather than rejected;
//! only the final point count decides acceptance.

use crate::constants::MIN_INGESTION_POINTS;
use crate::error::IngestionError;
use crate::logic::types::SampleSequence;

/// Parse CSV text: first non-blank line is a header, resistance is the
/// second column.
pub fn parse_csv(text: &str) -> Result<SampleSequence, IngestionError> {
    if text.trim().is_empty() {
        return Err(IngestionError::Empty);
    }

    let values = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .skip(1)
        .filter_map(|line| line.split(',').nth(1))
        .filter_map(parse_value)
        .collect();

    require_min_points(values)
}

/// Parse pasted `1.0, 2.5, ...` text.
pub fn parse_manual(text: &str) -> Result<SampleSequence, IngestionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(IngestionError::Empty);
    }

    let values = text.split(',').filter_map(parse_value).collect();
    require_min_points(values)
}

/// Leading decimal number of a cell: optional sign, digits with an optional
/// fraction, optional exponent. Whatever follows is ignored.
fn parse_value(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn require_min_points(values: Vec<f64>) -> Result<SampleSequence, IngestionError> {
    if values.len() < MIN_INGESTION_POINTS {
        return Err(IngestionError::TooFewPoints {
            found: values.len(),
            required: MIN_INGESTION_POINTS,
        });
    }
    Ok(SampleSequence::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_with_rows(rows: usize) -> String {
        let mut text = String::from("time_ms,resistance_mohm\n");
        for i in 0..rows {
            text.push_str(&format!("{},{}\n", i, 2.0 + i as f64 * 0.1));
        }
        text
    }

    #[test]
    fn test_csv_reads_second_column_after_header() {
        let samples = parse_csv(&csv_with_rows(12)).unwrap();
        assert_eq!(samples.len(), 12);
        assert!((samples[0] - 2.0).abs() < 1e-12);
        assert!((samples[11] - 3.1).abs() < 1e-9);
    }

    #[test]
    fn test_csv_skips_blank_and_invalid_lines() {
        let mut text = csv_with_rows(10);
        text.push_str("\n\n   \n");
        text.push_str("11,not-a-number\n");
        text.push_str("12\n");
        text.push_str("13, 4.5 ,extra\r\n");

        let samples = parse_csv(&text).unwrap();
        assert_eq!(samples.len(), 11);
        assert!((samples[10] - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_csv_header_is_first_non_blank_line() {
        let text = format!("\n\n{}", csv_with_rows(10));
        assert_eq!(parse_csv(&text).unwrap().len(), 10);
    }

    #[test]
    fn test_csv_too_few_points() {
        assert_eq!(
            parse_csv(&csv_with_rows(9)),
            Err(IngestionError::TooFewPoints { found: 9, required: 10 })
        );
        assert_eq!(
            parse_csv("time,resistance\n"),
            Err(IngestionError::TooFewPoints { found: 0, required: 10 })
        );
    }

    #[test]
    fn test_csv_empty() {
        assert_eq!(parse_csv("  \n \n"), Err(IngestionError::Empty));
    }

    #[test]
    fn test_manual_parses_and_skips_garbage() {
        let samples = parse_manual(" 1.0, 2.0,3,abc, 4.5,,5,6,7,8,9, 10 ").unwrap();
        assert_eq!(samples.len(), 10);
        assert_eq!(samples[3], 4.5);
        assert_eq!(samples[9], 10.0);
    }

    #[test]
    fn test_cells_read_leading_number() {
        assert_eq!(parse_value("2.5 mOhm"), Some(2.5));
        assert_eq!(parse_value("  -1.25e2ohm"), Some(-125.0));
        assert_eq!(parse_value("3e"), Some(3.0));
        assert_eq!(parse_value(".5"), Some(0.5));
        assert_eq!(parse_value("7."), Some(7.0));
        assert_eq!(parse_value("+4x"), Some(4.0));
        assert_eq!(parse_value("mOhm 2.5"), None);
        assert_eq!(parse_value("-"), None);
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value("1e999"), None);
    }

    #[test]
    fn test_csv_accepts_unit_suffixes() {
        let mut text = String::from("time_ms,resistance\n");
        for i in 0..10 {
            text.push_str(&format!("{},{} mOhm\n", i, 2.5 + i as f64));
        }

        let samples = parse_csv(&text).unwrap();
        assert_eq!(samples.len(), 10);
        assert_eq!(samples[0], 2.5);
        assert_eq!(samples[9], 11.5);
    }

    #[test]
    fn test_manual_rejects_non_finite() {
        let result = parse_manual("1,2,3,4,5,6,7,8,9,NaN,inf");
        assert_eq!(
            result,
            Err(IngestionError::TooFewPoints { found: 9, required: 10 })
        );
    }

    #[test]
    fn test_manual_empty_text() {
        assert_eq!(parse_manual(""), Err(IngestionError::Empty));
        assert_eq!(parse_manual("   \n"), Err(IngestionError::Empty));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            IngestionError::Empty.to_string(),
            "Please provide waveform data first"
        );
        let err = IngestionError::TooFewPoints { found: 3, required: 10 };
        assert!(err.to_string().contains("Minimum 10 points required"));
    }
}
