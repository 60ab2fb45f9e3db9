//! CSV ingestion for accelerometer recordings.
//!
//! Turns a recorder export into a rectangular numeric table with named
//! columns, then pulls the time and accelerometer columns out as
//! [`Sample`]s. Everything the analysis core assumes about its input (finite
//! values, elapsed milliseconds starting at zero) is established here.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::analysis::Sample;
use crate::config::{IngestConfig, TimeUnit};
use crate::error::IngestError;

/// Numeric table parsed from a CSV recording
#[derive(Debug, Clone, PartialEq)]
pub struct SensorTable {
    headers: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl SensorTable {
    /// Parse a CSV file, skipping `lines_to_skip` lines before the header
    pub fn from_path<P: AsRef<Path>>(path: P, lines_to_skip: usize) -> Result<Self, IngestError> {
        log::debug!("[Ingest] Reading file: {:?}", path.as_ref());
        let file = File::open(path.as_ref())?;
        Self::from_reader(file, lines_to_skip)
    }

    /// Parse CSV from any reader
    ///
    /// The line after the skipped preamble is the header. Every following
    /// non-empty line must have one numeric cell per header column; a single
    /// trailing `#` on a cell is ignored.
    pub fn from_reader<R: Read>(reader: R, lines_to_skip: usize) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = reader.records();

        for _ in 0..lines_to_skip {
            if records.next().transpose()?.is_none() {
                return Err(IngestError::MissingHeader { lines_to_skip });
            }
        }

        let header = records
            .next()
            .transpose()?
            .ok_or(IngestError::MissingHeader { lines_to_skip })?;
        let headers: Vec<String> = header.iter().map(str::to_string).collect();
        log::debug!("[Ingest] Headers: {:?}", headers);

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if record.len() != headers.len() {
                return Err(IngestError::RaggedRow {
                    line,
                    expected: headers.len(),
                    found: record.len(),
                });
            }

            let row = record
                .iter()
                .zip(&headers)
                .map(|(cell, column)| parse_cell(cell, column, line))
                .collect::<Result<Vec<f64>, IngestError>>()?;
            rows.push(row);
        }

        log::debug!(
            "[Ingest] Parsed {} rows x {} columns",
            rows.len(),
            headers.len()
        );

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column with exactly this header
    pub fn column_index(&self, name: &str) -> Result<usize, IngestError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| IngestError::UnknownColumn {
                name: name.to_string(),
            })
    }

    /// Values of a column by position
    pub fn column_at(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.headers.len() {
            return None;
        }
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Values of a column by header name
    pub fn column(&self, name: &str) -> Result<Vec<f64>, IngestError> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Extract elapsed-time accelerometer samples
    ///
    /// Gyroscope or any other extra columns are left untouched.
    pub fn samples(&self, config: &IngestConfig) -> Result<Vec<Sample>, IngestError> {
        let mut times = self.column(&config.time_column)?;
        correct_time(&mut times, config.time_unit);

        if times.windows(2).any(|pair| pair[1] < pair[0]) {
            log::warn!(
                "[Ingest] Column '{}' is not monotonically non-decreasing",
                config.time_column
            );
        }

        let [x, y, z] = &config.accel_columns;
        let (x, y, z) = (self.column(x)?, self.column(y)?, self.column(z)?);

        Ok(times
            .into_iter()
            .zip(x)
            .zip(y)
            .zip(z)
            .map(|(((time_ms, x), y), z)| Sample::new(time_ms, x, y, z))
            .collect())
    }
}

/// Rewrite absolute timestamps as elapsed milliseconds from the first one
pub fn correct_time(times: &mut [f64], unit: TimeUnit) {
    let Some(&start) = times.first() else {
        return;
    };

    let scale = match unit {
        TimeUnit::Milliseconds => 1.0,
        TimeUnit::Seconds => 1000.0,
    };

    for time in times.iter_mut() {
        *time = (*time - start) * scale;
    }
}

/// Read a recording straight into samples
pub fn load_samples<P: AsRef<Path>>(
    path: P,
    config: &IngestConfig,
) -> Result<Vec<Sample>, IngestError> {
    SensorTable::from_path(path, config.lines_to_skip)?.samples(config)
}

fn parse_cell(cell: &str, column: &str, line: u64) -> Result<f64, IngestError> {
    let trimmed = cell.strip_suffix('#').unwrap_or(cell);
    let value: f64 = trimmed.parse().map_err(|_| IngestError::InvalidNumber {
        line,
        column: column.to_string(),
        value: cell.to_string(),
    })?;

    if !value.is_finite() {
        return Err(IngestError::NonFinite {
            line,
            column: column.to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = "\
time,accel x,accel y,accel z,gyro x,gyro y,gyro z
1000,0.0,0.0,9.81,0.1,0.2,0.3
1010,3.0,4.0,0.0#,0.1,0.2,0.3
1020,0.0,0.0,-2.0,0.1,0.2,0.3
";

    fn table() -> SensorTable {
        SensorTable::from_reader(RECORDING.as_bytes(), 0).unwrap()
    }

    #[test]
    fn test_parses_headers_and_rows() {
        let table = table();
        assert_eq!(table.headers().len(), 7);
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("accel z").unwrap(), vec![9.81, 0.0, -2.0]);
        assert_eq!(table.column_at(0), Some(vec![1000.0, 1010.0, 1020.0]));
        assert_eq!(table.column_at(7), None);
    }

    #[test]
    fn test_skips_preamble_lines() {
        let input = format!("recorder v2\nsession 17\n{}", RECORDING);
        let table = SensorTable::from_reader(input.as_bytes(), 2).unwrap();
        assert_eq!(table.column_index("gyro x").unwrap(), 4);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_header() {
        let err = SensorTable::from_reader("only line\n".as_bytes(), 3).unwrap_err();
        assert_eq!(err, IngestError::MissingHeader { lines_to_skip: 3 });
    }

    #[test]
    fn test_unknown_column() {
        let err = table().column("accel w").unwrap_err();
        assert!(matches!(err, IngestError::UnknownColumn { .. }));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let input = "time,accel x\n0,1.0\n10\n";
        let err = SensorTable::from_reader(input.as_bytes(), 0).unwrap_err();
        assert_eq!(
            err,
            IngestError::RaggedRow {
                line: 3,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let input = "time,accel x\n0,abc\n";
        let err = SensorTable::from_reader(input.as_bytes(), 0).unwrap_err();
        assert!(matches!(err, IngestError::InvalidNumber { line: 2, .. }));

        let input = "time,accel x\n0,NaN\n";
        let err = SensorTable::from_reader(input.as_bytes(), 0).unwrap_err();
        assert!(matches!(err, IngestError::NonFinite { line: 2, .. }));
    }

    #[test]
    fn test_correct_time() {
        let mut times = vec![1000.0, 1010.0, 1025.0];
        correct_time(&mut times, TimeUnit::Milliseconds);
        assert_eq!(times, vec![0.0, 10.0, 25.0]);

        let mut times = vec![2.0, 2.5, 3.0];
        correct_time(&mut times, TimeUnit::Seconds);
        assert_eq!(times, vec![0.0, 500.0, 1000.0]);

        let mut empty: Vec<f64> = Vec::new();
        correct_time(&mut empty, TimeUnit::Seconds);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_samples_use_accelerometer_columns() {
        let samples = table().samples(&IngestConfig::default()).unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].time_ms, 0.0);
        assert_eq!(samples[2].time_ms, 20.0);
        assert_eq!(samples[1].magnitude(), 5.0);
        assert_eq!(samples[2].z, -2.0);
    }
}
