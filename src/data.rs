use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::enrich;
use crate::error::LoadError;
use crate::models::{DailyRecord, Dataset, EnrichedRecord};

/// Source columns by position; the header text is ignored.
pub const SOURCE_COLUMNS: [&str; 6] = [
    "Date",
    "Daily_Collected_Samples",
    "Daily_Negative",
    "Daily_Positive",
    "People_In_Observation",
    "Daily_Discharge",
];

/// Tried in order: ISO first, then month-first slash/dash dates with
/// day-first as the fallback when the month would exceed 12.
const DATE_FORMATS: [&str; 10] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M:%S%:z"];

/// Parses a calendar date; timestamps keep the date as written, ignoring
/// any time or UTC offset.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|stamp| stamp.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .or_else(|| {
                    OFFSET_DATETIME_FORMATS
                        .iter()
                        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
                })
                .map(|stamp| stamp.date_naive())
        })
}

/// Reads daily records from CSV text with a header row.
pub fn read_records<R: io::Read>(source: R) -> Result<Vec<DailyRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let header_len = reader.headers()?.len();
    if header_len < SOURCE_COLUMNS.len() {
        return Err(LoadError::Schema {
            line: 1,
            found: header_len,
        });
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|pos| pos.line()).unwrap_or_default();
        if row.len() < SOURCE_COLUMNS.len() {
            return Err(LoadError::Schema {
                line,
                found: row.len(),
            });
        }

        let date = parse_date(&row[0]).ok_or_else(|| LoadError::Date {
            line,
            value: row[0].to_string(),
        })?;
        let count = |index: usize| -> Result<i64, LoadError> {
            row[index].parse::<i64>().map_err(|_| LoadError::Value {
                line,
                column: SOURCE_COLUMNS[index],
                value: row[index].to_string(),
            })
        };

        records.push(DailyRecord {
            date,
            collected_samples: count(1)?,
            negative: count(2)?,
            positive: count(3)?,
            in_observation: count(4)?,
            discharge: count(5)?,
        });
    }

    Ok(records)
}

/// Loads and enriches the whole file; any bad row aborts the load.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_records(file)?;

    let dataset = Dataset::new(enrich::enrich(&records)?);
    if dataset.is_empty() {
        warn!(path = %path.display(), "csv has no data rows");
    }
    info!(path = %path.display(), rows = dataset.len(), "dataset loaded");
    Ok(dataset)
}

pub fn write_enriched<W: io::Write>(records: &[EnrichedRecord], sink: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(sink);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
