//! Grade sheet ingest.
//!
//! `grades.csv` carries one row per student:
//!
//! ```text
//! students,Midterm_1,Midterm_2,Final
//! S01,82,75,141
//! ```
//!
//! Midterms are graded out of 100, the final out of 200; the final is halved
//! so all three exams share one "weighted score" scale.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use crate::data::RowError;
use crate::domain::ExamKind;
use crate::error::AppError;

/// One student's raw grades.
#[derive(Debug, Clone, Copy)]
pub struct GradeRecord {
    pub midterm_1: f64,
    pub midterm_2: f64,
    pub final_: f64,
}

/// All grades, keyed by 1-based student number.
#[derive(Debug, Clone)]
pub struct GradeBook {
    records: HashMap<u32, GradeRecord>,
    pub row_errors: Vec<RowError>,
}

impl GradeBook {
    /// Weighted score for one exam: midterms as-is, final halved.
    pub fn weighted_score(&self, student: u32, exam: ExamKind) -> Option<f64> {
        let rec = self.records.get(&student)?;
        Some(match exam {
            ExamKind::Midterm1 => rec.midterm_1,
            ExamKind::Midterm2 => rec.midterm_2,
            ExamKind::Final => rec.final_ / 2.0,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load and validate `grades.csv`.
pub fn load_grade_book(path: &Path) -> Result<GradeBook, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read grades headers: {e}")))?
        .clone();

    let col_student = header_index(&headers, "students")
        .ok_or_else(|| AppError::new(2, "grades.csv is missing the 'students' column."))?;
    let col_m1 = header_index(&headers, "Midterm_1")
        .ok_or_else(|| AppError::new(2, "grades.csv is missing the 'Midterm_1' column."))?;
    let col_m2 = header_index(&headers, "Midterm_2")
        .ok_or_else(|| AppError::new(2, "grades.csv is missing the 'Midterm_2' column."))?;
    let col_final = header_index(&headers, "Final")
        .ok_or_else(|| AppError::new(2, "grades.csv is missing the 'Final' column."))?;

    let file_label = path.display().to_string();
    let mut records = HashMap::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // Header occupies line 1.
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

        match parse_grade_row(&record, col_student, col_m1, col_m2, col_final) {
            Ok((student, rec)) => {
                records.insert(student, rec);
            }
            Err(message) => row_errors.push(RowError {
                file: file_label.clone(),
                line,
                message,
            }),
        }
    }

    if records.is_empty() {
        return Err(AppError::new(
            3,
            format!("No usable rows in '{}'.", path.display()),
        ));
    }

    Ok(GradeBook {
        records,
        row_errors,
    })
}

/// Parse a student id of the form `S01` / `S10` into its number.
pub fn parse_student_id(raw: &str) -> Option<u32> {
    let rest = raw.trim().strip_prefix('S')?;
    rest.parse::<u32>().ok().filter(|&n| n > 0)
}

fn parse_grade_row(
    record: &csv::StringRecord,
    col_student: usize,
    col_m1: usize,
    col_m2: usize,
    col_final: usize,
) -> Result<(u32, GradeRecord), String> {
    let raw_id = record
        .get(col_student)
        .ok_or_else(|| "Missing student id.".to_string())?;
    let student =
        parse_student_id(raw_id).ok_or_else(|| format!("Invalid student id '{raw_id}'."))?;

    let midterm_1 = parse_score(record, col_m1, "Midterm_1")?;
    let midterm_2 = parse_score(record, col_m2, "Midterm_2")?;
    let final_ = parse_score(record, col_final, "Final")?;

    Ok((
        student,
        GradeRecord {
            midterm_1,
            midterm_2,
            final_,
        },
    ))
}

fn parse_score(record: &csv::StringRecord, col: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(col)
        .ok_or_else(|| format!("Missing '{name}' value."))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("Invalid '{name}' value '{raw}'."))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("Out-of-range '{name}' value '{raw}'."));
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
    use std::io::Write;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "scst-grades-test-{}-{}.csv",
            std::process::id(),
            contents.len()
        ));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_and_weights_scores() {
        let path = write_temp("students,Midterm_1,Midterm_2,Final\nS01,82,75,141\nS02,64,70,150\n");
        let book = load_grade_book(&path).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.weighted_score(1, ExamKind::Midterm1), Some(82.0));
        assert_eq!(book.weighted_score(1, ExamKind::Final), Some(70.5));
        assert_eq!(book.weighted_score(9, ExamKind::Final), None);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn bad_rows_are_reported_not_fatal() {
        let path = write_temp("students,Midterm_1,Midterm_2,Final\nS01,82,75,141\nS02,oops,70,150\n");
        let book = load_grade_book(&path).unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.row_errors.len(), 1);
        assert_eq!(book.row_errors[0].line, 3);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn student_id_parsing() {
        assert_eq!(parse_student_id("S01"), Some(1));
        assert_eq!(parse_student_id("S10"), Some(10));
        assert_eq!(parse_student_id("10"), None);
        assert_eq!(parse_student_id("S00"), None);
    }
}
