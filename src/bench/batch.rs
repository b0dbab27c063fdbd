//! Batch runs: every file below a directory, N iterations, one CSV report.
//!
//! Each file is compressed `iterations` times into the output directory,
//! mirroring its relative path with a `.br` suffix. Every pass contributes
//! one report row. With more than one job, files are spread over a rayon
//! pool; each worker owns its own session and chunk pair, but process CPU
//! percentages then include the other workers' time.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::config::BatchConfig;
use super::instrument::Instrumenter;
use super::record::MetricsRecord;
use crate::codec::PreparedDictionary;
use crate::displaylevel;
use crate::error::{Error, Result};
use crate::report::{report_file_name, write_report_file, ReportRow};
use crate::stream::StreamOptions;
use crate::usage::UsageOracle;
use crate::util::{create_file_list, get_total_file_size, relative_identity};

/// What a batch produced.
#[derive(Debug)]
pub struct BatchOutcome {
    pub output_dir: PathBuf,
    pub report_path: PathBuf,
    /// One record per file and iteration, in file order.
    pub records: Vec<MetricsRecord>,
    /// Files whose run failed, with the error.
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compresses every file below `input_dir` and writes the per-run report.
///
/// A failing file does not stop the batch; it is logged, left out of the
/// report and listed in [`BatchOutcome::failures`].
pub fn run_batch<O: UsageOracle + Sync>(
    oracle: O,
    input_dir: &Path,
    config: &BatchConfig,
    dictionary: Option<&PreparedDictionary>,
) -> Result<BatchOutcome> {
    config.params.validate()?;
    if !input_dir.is_dir() {
        return Err(Error::io(
            format!("reading {}", input_dir.display()),
            io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let output_dir = config.output_dir_for(input_dir);
    fs::create_dir_all(&output_dir)
        .map_err(|e| Error::io(format!("creating {}", output_dir.display()), e))?;

    // Compared in canonical form so `-d ./set -o /abs/set/out` is still caught.
    let real_output = fs::canonicalize(&output_dir)
        .map_err(|e| Error::io(format!("resolving {}", output_dir.display()), e))?;
    let real_input = fs::canonicalize(input_dir)
        .map_err(|e| Error::io(format!("resolving {}", input_dir.display()), e))?;

    let files: Vec<PathBuf> = create_file_list(&[input_dir])
        .map_err(|e| Error::io(format!("listing {}", input_dir.display()), e))?
        .into_iter()
        .filter(|p| {
            let real = match p.strip_prefix(input_dir) {
                Ok(rel) => real_input.join(rel),
                Err(_) => p.clone(),
            };
            !real.starts_with(&real_output)
        })
        .collect();
    displaylevel!(
        2,
        "Batch: {} files, {} bytes, quality {}, window bits {}, {} iteration(s)\n",
        files.len(),
        get_total_file_size(&files),
        config.params.quality,
        config.params.window_bits,
        config.iterations
    );

    let mut options = StreamOptions::default();
    options.set_chunk_size(config.chunk_size);
    let mut inst = Instrumenter::new(oracle);
    inst.set_stream_options(options);

    let run_one = |src: &PathBuf| -> Result<Vec<MetricsRecord>> {
        run_file_iterations(&inst, input_dir, src, &output_dir, config, dictionary)
    };

    let jobs = config.effective_jobs();
    let results: Vec<Result<Vec<MetricsRecord>>> = if jobs > 1 {
        displaylevel!(
            2,
            "Warning : {} concurrent jobs; CPU usage figures include every worker\n",
            jobs
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| Error::io("starting worker pool", io::Error::other(e)))?;
        pool.install(|| files.par_iter().map(run_one).collect())
    } else {
        files.iter().map(run_one).collect()
    };

    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (src, result) in files.into_iter().zip(results) {
        match result {
            Ok(mut recs) => records.append(&mut recs),
            Err(e) => {
                displaylevel!(1, "Error : {} : {}\n", src.display(), e);
                failures.push((src, e));
            }
        }
    }

    let report_path = output_dir.join(report_file_name(
        config.params.quality,
        config.params.window_bits,
    ));
    let rows: Vec<ReportRow> = records.iter().map(ReportRow::from).collect();
    write_report_file(&report_path, &rows)?;
    displaylevel!(2, "Report written to {}\n", report_path.display());

    Ok(BatchOutcome {
        output_dir,
        report_path,
        records,
        failures,
    })
}

fn run_file_iterations<O: UsageOracle>(
    inst: &Instrumenter<O>,
    input_dir: &Path,
    src: &Path,
    output_dir: &Path,
    config: &BatchConfig,
    dictionary: Option<&PreparedDictionary>,
) -> Result<Vec<MetricsRecord>> {
    let identity = relative_identity(input_dir, src);
    let dst = output_dir.join(format!("{}{}", identity, crate::config::BROTLI_EXTENSION));
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
    }

    let mut records = Vec::with_capacity(config.iterations as usize);
    for iteration in 0..config.iterations {
        let input =
            File::open(src).map_err(|e| Error::io(format!("opening {}", src.display()), e))?;
        let output =
            File::create(&dst).map_err(|e| Error::io(format!("creating {}", dst.display()), e))?;
        let record = inst.compress(&identity, input, output, &config.params, dictionary)?;
        displaylevel!(
            3,
            "{} [{}]: {} -> {} bytes in {:.6} s\n",
            identity,
            iteration + 1,
            record.original_size,
            record.compressed_size,
            record.total_secs()
        );
        records.push(record);
    }
    Ok(records)
}
