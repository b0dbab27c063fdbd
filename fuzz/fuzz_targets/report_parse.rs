#![no_main]
use libfuzzer_sys::fuzz_target;

use brbench::report::{compare, read_report, ReportSet};

fuzz_target!(|data: &[u8]| {
    if let Ok(rows) = read_report(data) {
        let set = ReportSet::from_rows(rows);
        let _ = compare(&set, &set);
    }
});
