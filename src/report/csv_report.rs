//! Per-run CSV report: one row per compressed file and iteration.
//!
//! The column names are fixed; downstream tooling keys on
//! `Original File Name` and `Compressed File Size(B)`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bench::MetricsRecord;
use crate::error::{Error, Result};

pub const REPORT_HEADER: [&str; 10] = [
    "Original File Name",
    "Original File Size(B)",
    "Compression Quality",
    "Window Bits",
    "Time Taken by Brotli(s)",
    "Time Taken by Compression(s)",
    "Compressed File Size(B)",
    "Compression Ratio",
    "CPU Usage by Process(%)",
    "Maximum Resident Size(KB)",
];

/// One line of a per-run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Original File Name")]
    pub file_name: String,
    #[serde(rename = "Original File Size(B)")]
    pub original_size: u64,
    #[serde(rename = "Compression Quality")]
    pub quality: u32,
    #[serde(rename = "Window Bits")]
    pub window_bits: u32,
    #[serde(rename = "Time Taken by Brotli(s)")]
    pub codec_secs: f64,
    #[serde(rename = "Time Taken by Compression(s)")]
    pub total_secs: f64,
    #[serde(rename = "Compressed File Size(B)")]
    pub compressed_size: u64,
    #[serde(rename = "Compression Ratio")]
    pub compression_ratio: f64,
    #[serde(rename = "CPU Usage by Process(%)")]
    pub cpu_usage_percent: f64,
    #[serde(rename = "Maximum Resident Size(KB)")]
    pub peak_rss_kb: u64,
}

impl From<&MetricsRecord> for ReportRow {
    fn from(record: &MetricsRecord) -> Self {
        ReportRow {
            file_name: record.identity.clone(),
            original_size: record.original_size,
            quality: record.quality,
            window_bits: record.window_bits,
            codec_secs: record.codec_secs(),
            total_secs: record.total_secs(),
            compressed_size: record.compressed_size,
            compression_ratio: record.compression_ratio(),
            cpu_usage_percent: record.cpu_usage_percent,
            peak_rss_kb: record.peak_rss_kb,
        }
    }
}

/// `_report_c{quality}_w{window_bits}.csv`
pub fn report_file_name(quality: u32, window_bits: u32) -> String {
    format!("_report_c{}_w{}.csv", quality, window_bits)
}

/// Writes the header and `rows`. The header is written even when `rows` is empty.
pub fn write_report<W: Write>(output: W, rows: &[ReportRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);
    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|e| Error::io("flushing report", e))
}

pub fn write_report_file(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("creating {}", path.display()), e))?;
    write_report(file, rows)
}

/// Parses every row of a report. A report without rows is an error.
pub fn read_report<R: Read>(input: R) -> Result<Vec<ReportRow>> {
    let mut reader = csv::Reader::from_reader(input);
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ReportRow>, csv::Error>>()?;
    if rows.is_empty() {
        return Err(Error::report("report has no rows"));
    }
    Ok(rows)
}

// ── ReportSet ─────────────────────────────────────────────────────────────────

/// Rows of one report grouped by identity, in file order within each group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSet {
    by_identity: BTreeMap<String, Vec<ReportRow>>,
    first: Option<(u32, u32)>,
}

impl ReportSet {
    pub fn from_rows(rows: impl IntoIterator<Item = ReportRow>) -> Self {
        let mut set = ReportSet::default();
        for row in rows {
            set.first.get_or_insert((row.quality, row.window_bits));
            set.by_identity
                .entry(row.file_name.clone())
                .or_default()
                .push(row);
        }
        set
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|e| Error::io(format!("opening {}", path.display()), e))?;
        let rows = read_report(file).map_err(|e| match e {
            Error::Report { context } => {
                Error::report(format!("{}: {}", path.display(), context))
            }
            other => other,
        })?;
        Ok(ReportSet::from_rows(rows))
    }

    pub fn get(&self, identity: &str) -> Option<&[ReportRow]> {
        self.by_identity.get(identity).map(Vec::as_slice)
    }

    /// Identities in sorted order.
    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.by_identity.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_identity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identity.is_empty()
    }

    /// Quality and window bits of the first row read.
    pub fn settings(&self) -> Option<(u32, u32)> {
        self.first
    }
}
