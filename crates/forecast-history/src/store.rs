use chrono::NaiveDate;
use dashboard_core::ForecastRecord;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

/// Durable backing for the forecast history: an append-only sequence of
/// one record per trading day.
pub trait ForecastStore: Send + Sync {
    fn append(&self, record: &ForecastRecord) -> io::Result<()>;
    fn load(&self) -> io::Result<Vec<ForecastRecord>>;
}

/// Line-oriented file store: `date,min_confidence,max_confidence,forecast_price`,
/// one line per record, flushed on every append.
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ForecastStore for CsvHistoryStore {
    fn append(&self, record: &ForecastRecord) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{},{},{},{}",
            record.date.format("%Y-%m-%d"),
            record.min_confidence,
            record.max_confidence,
            record.forecast_price
        )?;
        file.sync_all()
    }

    fn load(&self) -> io::Result<Vec<ForecastRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e),
        };

        let mut records: Vec<ForecastRecord> = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(record) => records.push(record),
                None => {
                    tracing::warn!(path = %self.path.display(), line, "skipping malformed history line");
                }
            }
        }
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

fn parse_line(line: &str) -> Option<ForecastRecord> {
    let mut parts = line.trim().split(',');
    let date = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let min_confidence = parts.next()?.trim().parse().ok()?;
    let max_confidence = parts.next()?.trim().parse().ok()?;
    let forecast_price = parts.next()?.trim().parse().ok()?;
    Some(ForecastRecord {
        date,
        min_confidence,
        max_confidence,
        forecast_price,
    })
}

impl<S: ForecastStore + ?Sized> ForecastStore for std::sync::Arc<S> {
    fn append(&self, record: &ForecastRecord) -> io::Result<()> {
        (**self).append(record)
    }

    fn load(&self) -> io::Result<Vec<ForecastRecord>> {
        (**self).load()
    }
}

/// In-memory store for tests and placeholder state.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<ForecastRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForecastStore for MemoryHistoryStore {
    fn append(&self, record: &ForecastRecord) -> io::Result<()> {
        self.records
            .lock()
            .map_err(|_| io::Error::other("history lock poisoned"))?
            .push(record.clone());
        Ok(())
    }

    fn load(&self) -> io::Result<Vec<ForecastRecord>> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| io::Error::other("history lock poisoned"))?
            .clone();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}
