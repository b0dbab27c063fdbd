//! Comparison of two per-run reports.
//!
//! For every identity present in both reports the position-aligned rows are
//! turned into percentage changes and averaged over the shorter side.

use std::io::Write;

use super::csv_report::ReportSet;
use crate::displaylevel;
use crate::error::{Error, Result};

pub const COMPARISON_HEADER: [&str; 6] = [
    "File Name",
    "Original File Size",
    "Change in Compression Size (%)",
    "Change in Compression Time (%)",
    "Change in Brotli Time (%)",
    "Change in CPU Usage (%)",
];

/// Averaged change for one identity, baseline → candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub identity: String,
    /// Taken from the first baseline row.
    pub original_size: u64,
    pub compressed_size_change: f64,
    pub compression_time_change: f64,
    pub codec_time_change: f64,
    pub cpu_usage_change: f64,
}

/// Settings of the two sides, used for the legend and the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonSettings {
    pub baseline_quality: u32,
    pub baseline_window_bits: u32,
    pub candidate_quality: u32,
    pub candidate_window_bits: u32,
}

impl ComparisonSettings {
    /// Reads the settings from the first row of each set.
    pub fn from_sets(baseline: &ReportSet, candidate: &ReportSet) -> Result<Self> {
        let (bq, bw) = baseline
            .settings()
            .ok_or_else(|| Error::report("baseline report has no rows"))?;
        let (cq, cw) = candidate
            .settings()
            .ok_or_else(|| Error::report("candidate report has no rows"))?;
        Ok(ComparisonSettings {
            baseline_quality: bq,
            baseline_window_bits: bw,
            candidate_quality: cq,
            candidate_window_bits: cw,
        })
    }
}

/// `(candidate − baseline) × 100 / baseline`, or `0.0` for a zero baseline.
pub fn pct_change(baseline: f64, candidate: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    (candidate - baseline) * 100.0 / baseline
}

/// Compares every identity present in both sets, in identity order.
pub fn compare(baseline: &ReportSet, candidate: &ReportSet) -> Vec<ComparisonRow> {
    let mut out = Vec::new();
    for identity in baseline.identities() {
        let (Some(old), Some(new)) = (baseline.get(identity), candidate.get(identity)) else {
            displaylevel!(3, "compare: {} missing from candidate, skipped\n", identity);
            continue;
        };
        let n = old.len().min(new.len());
        if n == 0 {
            continue;
        }

        let mut sums = [0.0f64; 4];
        for (o, c) in old.iter().zip(new.iter()) {
            sums[0] += pct_change(o.compressed_size as f64, c.compressed_size as f64);
            sums[1] += pct_change(o.total_secs, c.total_secs);
            sums[2] += pct_change(o.codec_secs, c.codec_secs);
            sums[3] += pct_change(o.cpu_usage_percent, c.cpu_usage_percent);
        }
        let avg = |s: f64| s / n as f64;

        out.push(ComparisonRow {
            identity: identity.to_owned(),
            original_size: old[0].original_size,
            compressed_size_change: avg(sums[0]),
            compression_time_change: avg(sums[1]),
            codec_time_change: avg(sums[2]),
            cpu_usage_change: avg(sums[3]),
        });
    }

    for identity in candidate.identities() {
        if baseline.get(identity).is_none() {
            displaylevel!(3, "compare: {} missing from baseline, skipped\n", identity);
        }
    }
    out
}

/// Writes the comparison table, two blank lines and the legend.
pub fn render_comparison<W: Write>(
    mut output: W,
    rows: &[ComparisonRow],
    settings: &ComparisonSettings,
) -> Result<()> {
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut output);
        writer.write_record(COMPARISON_HEADER)?;
        for row in rows {
            writer.write_record([
                row.identity.clone(),
                row.original_size.to_string(),
                row.compressed_size_change.to_string(),
                row.compression_time_change.to_string(),
                row.codec_time_change.to_string(),
                row.cpu_usage_change.to_string(),
            ])?;
        }
        writer
            .flush()
            .map_err(|e| Error::io("writing comparison", e))?;
    }

    write!(
        output,
        "\n\nNote:\n\
Percentage values represent changes in values that were compressed using compression level {} and window size {} to compression level {} and window size {}.\n\
A negative value indicates a percentage decrease from the old value to the new value.\n\
A positive value indicates a percentage increase.\n",
        settings.baseline_quality,
        settings.baseline_window_bits,
        settings.candidate_quality,
        settings.candidate_window_bits
    )
    .and_then(|_| output.flush())
    .map_err(|e| Error::io("writing comparison legend", e))
}

/// `_comparison_report_c_{q1}_{q2}_w_{w1}_{w2}[_{tag}].csv`
pub fn comparison_file_name(settings: &ComparisonSettings, tag: Option<&str>) -> String {
    let mut name = format!(
        "_comparison_report_c_{}_{}_w_{}_{}",
        settings.baseline_quality,
        settings.candidate_quality,
        settings.baseline_window_bits,
        settings.candidate_window_bits
    );
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        name.push('_');
        name.push_str(tag);
    }
    name.push_str(".csv");
    name
}
