use crate::error::{RenderError, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 5] = ["time", "body", "x", "y", "z"];
// Reported as the path of tables parsed from an in-memory reader.
const STREAM_SOURCE: &str = "<stream>";

/// Loads trajectory tables from `time,body,x,y,z` CSV files
pub struct TrajectoryLoader;

/// One observed position of a body at a timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub time: f64,
    pub body: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Record {
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// All records of a run, in file order.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryTable {
    pub file_path: String,
    records: Vec<Record>,
}

// Columns are kept as strings so that each value can be reported with its
// line and column when it fails to coerce.
#[derive(Debug, Deserialize)]
struct RawRow {
    time: String,
    body: String,
    x: String,
    y: String,
    z: String,
}

impl TrajectoryLoader {
    /// Load a CSV file with a `time,body,x,y,z` header
    pub fn load_trajectory<P: AsRef<Path>>(file_path: P) -> Result<TrajectoryTable> {
        let path = file_path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| RenderError::Resource {
            path: path.to_path_buf(),
            source,
        })?;

        let mut table = Self::parse(file, path)?;
        table.file_path = path.to_string_lossy().to_string();

        let metadata = table.metadata();
        log::info!(
            "Loaded trajectory {}: {} records, {} timesteps, {} bodies",
            metadata.file_path, metadata.num_records, metadata.num_timesteps, metadata.num_bodies
        );

        Ok(table)
    }

    /// Parse a table from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<TrajectoryTable> {
        Self::parse(reader, Path::new(STREAM_SOURCE))
    }

    fn parse<R: Read>(reader: R, source: &Path) -> Result<TrajectoryTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| csv_error(e, source, "unreadable header"))?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(RenderError::DataFormat(format!(
                    "missing required column '{}'",
                    column
                )));
            }
        }

        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for row in csv_reader.records() {
            let row = row.map_err(|e| csv_error(e, source, "malformed row"))?;
            // Blank lines are skipped by the reader, so the line comes from
            // the row's own position. Header is line 1.
            let line = row
                .position()
                .map_or(records.len() as u64 + 2, |pos| pos.line());
            let raw: RawRow = row
                .deserialize(Some(&headers))
                .map_err(|e| RenderError::DataFormat(format!("line {}: {}", line, e)))?;
            let record = parse_row(&raw, line)?;

            if !seen.insert((record.time.to_bits(), record.body)) {
                return Err(RenderError::DataFormat(format!(
                    "line {}: body {} appears twice at time {}",
                    line, record.body, record.time
                )));
            }
            records.push(record);
        }

        log::debug!("Parsed {} trajectory records", records.len());

        Ok(TrajectoryTable {
            file_path: String::new(),
            records,
        })
    }
}

/// I/O failures while reading are resource errors; everything else the
/// reader rejects is malformed data.
fn csv_error(err: csv::Error, source: &Path, context: &str) -> RenderError {
    let message = format!("{}: {}", context, err);
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => RenderError::Resource {
            path: source.to_path_buf(),
            source: io_err,
        },
        _ => RenderError::DataFormat(message),
    }
}

fn parse_row(row: &RawRow, line: u64) -> Result<Record> {
    Ok(Record {
        // Adding 0.0 folds -0.0 into 0.0 so equal times share one key.
        time: parse_real(&row.time, "time", line)? + 0.0,
        body: parse_body(&row.body, line)?,
        x: parse_real(&row.x, "x", line)?,
        y: parse_real(&row.y, "y", line)?,
        z: parse_real(&row.z, "z", line)?,
    })
}

fn parse_real(value: &str, column: &str, line: u64) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RenderError::DataFormat(format!(
            "line {}: column '{}' value '{}' is not a finite number",
            line, column, value
        ))),
    }
}

/// Accepts plain integers and integral reals such as `3.0`.
fn parse_body(value: &str, line: u64) -> Result<u32> {
    if let Ok(id) = value.parse::<u32>() {
        return Ok(id);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => {
            Ok(v as u32)
        }
        _ => Err(RenderError::DataFormat(format!(
            "line {}: column 'body' value '{}' is not a non-negative integer",
            line, value
        ))),
    }
}

impl TrajectoryTable {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            file_path: String::new(),
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct timesteps in ascending order.
    pub fn timesteps(&self) -> Vec<f64> {
        let mut times: Vec<f64> = self.records.iter().map(|r| r.time).collect();
        times.sort_by(f64::total_cmp);
        times.dedup();
        times
    }

    pub fn body_ids(&self) -> BTreeSet<u32> {
        self.records.iter().map(|r| r.body).collect()
    }

    /// Records whose time equals `time` exactly.
    pub fn records_at(&self, time: f64) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter().filter(move |r| r.time == time)
    }

    pub fn metadata(&self) -> RunMetadata {
        let timesteps = self.timesteps();
        RunMetadata {
            file_path: self.file_path.clone(),
            num_records: self.records.len(),
            num_timesteps: timesteps.len(),
            num_bodies: self.body_ids().len(),
            first_time: timesteps.first().copied(),
            last_time: timesteps.last().copied(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub file_path: String,
    pub num_records: usize,
    pub num_timesteps: usize,
    pub num_bodies: usize,
    pub first_time: Option<f64>,
    pub last_time: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> Result<TrajectoryTable> {
        TrajectoryLoader::from_reader(csv.as_bytes())
    }

    #[test]
    fn test_parse_body_accepts_integral_reals() {
        assert_eq!(parse_body("3", 2).unwrap(), 3);
        assert_eq!(parse_body("3.0", 2).unwrap(), 3);
        assert!(parse_body("3.5", 2).is_err());
        assert!(parse_body("-1", 2).is_err());
        assert!(parse_body("abc", 2).is_err());
    }

    #[test]
    fn test_metadata_generation() {
        let table = load("time,body,x,y,z\n0,0,0,0,0\n0,1,1,1,1\n0.5,0,1,1,1\n").unwrap();
        let metadata = table.metadata();
        assert_eq!(metadata.num_records, 3);
        assert_eq!(metadata.num_timesteps, 2);
        assert_eq!(metadata.num_bodies, 2);
        assert_eq!(metadata.first_time, Some(0.0));
        assert_eq!(metadata.last_time, Some(0.5));
    }

    #[test]
    fn test_columns_in_any_order() {
        let table = load("body,z,y,x,time,mass\n2,3,2,1,0.25,9\n").unwrap();
        let record = table.records()[0];
        assert_eq!(record.body, 2);
        assert_eq!(record.time, 0.25);
        assert_eq!(record.position(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let err = load("time,body,x,y,z\n0,0,NaN,0,0\n").unwrap_err();
        assert!(matches!(err, RenderError::DataFormat(_)));
    }
}
