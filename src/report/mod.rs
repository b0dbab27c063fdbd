//! Per-run CSV reports and their comparison.

pub mod compare;
pub mod csv_report;

pub use compare::{
    compare, comparison_file_name, pct_change, render_comparison, ComparisonRow,
    ComparisonSettings, COMPARISON_HEADER,
};
pub use csv_report::{
    read_report, report_file_name, write_report, write_report_file, ReportRow, ReportSet,
    REPORT_HEADER,
};
