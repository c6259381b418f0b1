//! Per-exam signal series ingest.
//!
//! The recording pipeline writes one CSV per (student, exam, signal) under
//! `S{nn}_processed/{exam}/{SIGNAL}.csv`. Scalar signals (HR/EDA/TEMP) carry a
//! single value column; ACC carries x/y/z components that are combined into a
//! magnitude here. Every row is tagged with the session phase (`pre-test`,
//! `in-test`, `post-test`); only in-test rows feed the scatter slides.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::data::RowError;
use crate::domain::{ExamKind, SignalKind, TestPeriod};
use crate::error::AppError;

/// One row of a signal series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesPoint {
    /// Seconds since the start of the recording session.
    pub time_seconds: f64,
    /// Wall-clock timestamp, when the file carries one.
    pub timestamp: Option<NaiveDateTime>,
    pub value: f64,
    pub period: TestPeriod,
}

/// A full signal recording for one (student, exam) session.
#[derive(Debug, Clone)]
pub struct SignalSeries {
    pub student: u32,
    pub exam: ExamKind,
    pub signal: SignalKind,
    pub points: Vec<SeriesPoint>,
}

impl SignalSeries {
    /// Average of the in-test rows; `None` when the session has none.
    pub fn in_test_average(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for p in &self.points {
            if p.period == TestPeriod::InTest {
                sum += p.value;
                n += 1;
            }
        }
        if n == 0 {
            return None;
        }
        Some(sum / n as f64)
    }

    /// Overall value range, for chart bounds.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in &self.points {
            min = min.min(p.value);
            max = max.max(p.value);
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}

/// Everything loaded for one student (all exams x all signals).
#[derive(Debug, Clone)]
pub struct StudentSeries {
    pub series: Vec<SignalSeries>,
    pub row_errors: Vec<RowError>,
}

/// Load all series files for one student.
///
/// Missing files are tolerated (a student may have skipped an exam); rows that
/// fail to parse are skipped and reported.
pub fn load_student_series(data_dir: &Path, student: u32) -> Result<StudentSeries, AppError> {
    let mut out = Vec::new();
    let mut row_errors = Vec::new();

    for exam in ExamKind::ALL {
        for signal in SignalKind::ALL {
            let path = data_dir
                .join(format!("S{student:02}_processed"))
                .join(exam.dir_name())
                .join(signal.file_name());
            if !path.exists() {
                continue;
            }
            let series = load_series_file(&path, student, exam, signal, &mut row_errors)?;
            out.push(series);
        }
    }

    Ok(StudentSeries {
        series: out,
        row_errors,
    })
}

fn load_series_file(
    path: &Path,
    student: u32,
    exam: ExamKind,
    signal: SignalKind,
    row_errors: &mut Vec<RowError>,
) -> Result<SignalSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read headers of '{}': {e}", path.display())))?
        .clone();

    let columns = SeriesColumns::resolve(&headers, signal)
        .map_err(|msg| AppError::new(2, format!("{}: {msg}", path.display())))?;

    let file_label = path.display().to_string();
    let mut points = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    file: file_label.clone(),
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match columns.parse_row(&record) {
            Ok(point) => points.push(point),
            Err(message) => row_errors.push(RowError {
                file: file_label.clone(),
                line,
                message,
            }),
        }
    }

    Ok(SignalSeries {
        student,
        exam,
        signal,
        points,
    })
}

/// Resolved column indices for one series file.
struct SeriesColumns {
    value: ValueColumns,
    period: usize,
    time_seconds: Option<usize>,
    timestamp: Option<usize>,
}

enum ValueColumns {
    Scalar(usize),
    /// ACC x/y/z components.
    Triaxial(usize, usize, usize),
}

impl SeriesColumns {
    fn resolve(headers: &csv::StringRecord, signal: SignalKind) -> Result<Self, String> {
        let value = match signal.value_column() {
            Some(name) => ValueColumns::Scalar(
                header_index(headers, name).ok_or_else(|| format!("missing '{name}' column"))?,
            ),
            None => ValueColumns::Triaxial(
                header_index(headers, "x").ok_or("missing 'x' column")?,
                header_index(headers, "y").ok_or("missing 'y' column")?,
                header_index(headers, "z").ok_or("missing 'z' column")?,
            ),
        };
        let period = header_index(headers, "period").ok_or("missing 'period' column")?;

        Ok(Self {
            value,
            period,
            time_seconds: header_index(headers, "time_seconds"),
            timestamp: header_index(headers, "timestamp"),
        })
    }

    fn parse_row(&self, record: &csv::StringRecord) -> Result<SeriesPoint, String> {
        let value = match self.value {
            ValueColumns::Scalar(col) => parse_f64(record, col, "value")?,
            ValueColumns::Triaxial(cx, cy, cz) => {
                let x = parse_f64(record, cx, "x")?;
                let y = parse_f64(record, cy, "y")?;
                let z = parse_f64(record, cz, "z")?;
                (x * x + y * y + z * z).sqrt()
            }
        };

        let raw_period = record
            .get(self.period)
            .ok_or_else(|| "Missing period.".to_string())?;
        let period = TestPeriod::parse(raw_period)
            .ok_or_else(|| format!("Unknown period '{raw_period}'."))?;

        let time_seconds = match self.time_seconds {
            Some(col) => parse_f64(record, col, "time_seconds")?,
            None => 0.0,
        };

        let timestamp = self
            .timestamp
            .and_then(|col| record.get(col))
            .and_then(|raw| NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S").ok());

        Ok(SeriesPoint {
            time_seconds,
            timestamp,
            value,
            period,
        })
    }
}

fn parse_f64(record: &csv::StringRecord, col: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(col)
        .ok_or_else(|| format!("Missing '{name}' value."))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("Invalid '{name}' value '{raw}'."))?;
    if !value.is_finite() {
        return Err(format!("Non-finite '{name}' value '{raw}'."));
    }
    Ok(value)
}

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: f64, period: TestPeriod) -> SeriesPoint {
        SeriesPoint {
            time_seconds: 0.0,
            timestamp: None,
            value,
            period,
        }
    }

    #[test]
    fn in_test_average_filters_periods() {
        let series = SignalSeries {
            student: 1,
            exam: ExamKind::Midterm1,
            signal: SignalKind::Hr,
            points: vec![
                point(120.0, TestPeriod::PreTest),
                point(80.0, TestPeriod::InTest),
                point(90.0, TestPeriod::InTest),
                point(60.0, TestPeriod::PostTest),
            ],
        };
        assert_eq!(series.in_test_average(), Some(85.0));
    }

    #[test]
    fn no_in_test_rows_means_no_average() {
        let series = SignalSeries {
            student: 1,
            exam: ExamKind::Midterm1,
            signal: SignalKind::Hr,
            points: vec![point(120.0, TestPeriod::PreTest)],
        };
        assert_eq!(series.in_test_average(), None);
    }

    #[test]
    fn triaxial_rows_become_magnitudes() {
        let headers = csv::StringRecord::from(vec!["x", "y", "z", "period"]);
        let columns = SeriesColumns::resolve(&headers, SignalKind::Acc).unwrap();
        let row = csv::StringRecord::from(vec!["3", "4", "0", "in-test"]);
        let p = columns.parse_row(&row).unwrap();
        assert!((p.value - 5.0).abs() < 1e-12);
        assert_eq!(p.period, TestPeriod::InTest);
    }

    #[test]
    fn scalar_rows_parse_value_and_time() {
        let headers = csv::StringRecord::from(vec!["HR", "period", "time_seconds", "timestamp"]);
        let columns = SeriesColumns::resolve(&headers, SignalKind::Hr).unwrap();
        let row =
            csv::StringRecord::from(vec!["88.5", "in-test", "120", "2024-05-01 10:02:00"]);
        let p = columns.parse_row(&row).unwrap();
        assert!((p.value - 88.5).abs() < 1e-12);
        assert!((p.time_seconds - 120.0).abs() < 1e-12);
        assert!(p.timestamp.is_some());
    }
}
