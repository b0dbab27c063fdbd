//! Binary entry point for the `brbench` command-line tool.
//!
//! Parses arguments, applies `-v` / `-q` to the display level, dispatches to
//! the subcommand and maps any error to exit code 1. Results go to stdout;
//! diagnostics go to stderr through the display macros.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;

use brbench::bench::{load_dictionary, run_batch, run_file, BatchConfig, Instrumenter, MetricsRecord};
use brbench::cli::args::{BatchArgs, Cli, Command, CompareArgs, MonitorArgs, RunArgs, SegregateArgs};
use brbench::cli::constants::{adjust_display_level, PROGRAM_NAME, PROGRAM_VERSION};
use brbench::cli::op_mode::determine_mode;
use brbench::codec::PreparedDictionary;
use brbench::report::{compare, comparison_file_name, render_comparison, ComparisonSettings, ReportSet};
use brbench::stream::StreamOptions;
use brbench::timefn::Phase;
use brbench::usage::{OsUsage, RssMonitor, RssSample};
use brbench::util::segregate;
use brbench::{displaylevel, displayout};

fn main() -> ExitCode {
    let cli = Cli::parse();
    adjust_display_level(cli.verbose, cli.quiet);
    displaylevel!(4, "*** {} v{} ***\n", PROGRAM_NAME, PROGRAM_VERSION);

    let result = match cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Compare(args) => cmd_compare(args),
        Command::Monitor(args) => cmd_monitor(args),
        Command::Segregate(args) => cmd_segregate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            displaylevel!(1, "{}: {:#}\n", PROGRAM_NAME, e);
            ExitCode::FAILURE
        }
    }
}

fn load_optional_dictionary(path: Option<&Path>) -> Result<Option<PreparedDictionary>> {
    path.map(|p| {
        load_dictionary(p).with_context(|| format!("loading dictionary {}", p.display()))
    })
    .transpose()
}

// ── run ───────────────────────────────────────────────────────────────────────

fn print_record(title: &str, record: &MetricsRecord) {
    displayout!("{}: {}\n", title, record.identity);
    displayout!("  Time taken by {}: {:.6} s\n", title.to_lowercase(), record.total_secs());
    displayout!("  Time taken by Brotli: {:.6} s\n", record.codec_secs());
    displayout!(
        "  Time reading / writing: {:.6} s / {:.6} s\n",
        record.phases.secs(Phase::Read),
        record.phases.secs(Phase::Write)
    );
    displayout!("  CPU usage by process: {:.2} %\n", record.cpu_usage_percent);
    displayout!("  System CPU usage: {:.2} %\n", record.system_cpu_percent);
    displayout!("  Maximum resident set size: {} KB\n", record.peak_rss_kb);
    displayout!("  Original size: {} B\n", record.original_size);
    displayout!("  Compressed size: {} B\n", record.compressed_size);
    displayout!("  Compression ratio: {:.4}\n", record.compression_ratio());
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let mode = args.mode.unwrap_or_else(|| determine_mode(&args.file));
    let params = args.encoder.params();
    let dictionary = load_optional_dictionary(args.encoder.dictionary.as_deref())?;

    let mut options = StreamOptions::default();
    options.set_chunk_size(args.encoder.chunk_size);
    let mut inst = Instrumenter::new(OsUsage::new());
    inst.set_stream_options(options);

    displaylevel!(
        3,
        "{} {} with quality {} and window bits {}\n",
        mode,
        args.file.display(),
        params.quality,
        params.window_bits
    );
    let outcome = run_file(&inst, &args.file, mode, &params, dictionary.as_ref(), args.verify)
        .with_context(|| format!("{} {}", mode, args.file.display()))?;

    if let Some(record) = &outcome.compress {
        print_record("Compression", record);
    }
    if let Some(record) = &outcome.decompress {
        print_record("Decompression", record);
    }
    if let Some(path) = &outcome.compressed_path {
        displaylevel!(2, "Compressed file: {}\n", path.display());
    }
    if let Some(path) = &outcome.decompressed_path {
        displaylevel!(2, "Decompressed file: {}\n", path.display());
    }
    match outcome.verified {
        Some(true) => displayout!("Verification: OK\n"),
        Some(false) => bail!("{} does not round-trip", args.file.display()),
        None => {}
    }
    Ok(())
}

// ── batch ─────────────────────────────────────────────────────────────────────

fn cmd_batch(args: BatchArgs) -> Result<()> {
    let dictionary = load_optional_dictionary(args.encoder.dictionary.as_deref())?;
    let mut config = BatchConfig::default();
    config
        .set_quality(args.encoder.quality)
        .set_window_bits(args.encoder.window_bits)
        .set_iterations(args.iterations)
        .set_jobs(args.jobs)
        .set_output_dir(args.output)
        .set_chunk_size(args.encoder.chunk_size);

    let outcome = run_batch(OsUsage::new(), &args.dir, &config, dictionary.as_ref())
        .with_context(|| format!("batch over {}", args.dir.display()))?;

    displayout!(
        "{} runs written to {}\n",
        outcome.records.len(),
        outcome.output_dir.display()
    );
    displayout!("Report: {}\n", outcome.report_path.display());
    if !outcome.is_success() {
        bail!("{} file(s) failed", outcome.failures.len());
    }
    Ok(())
}

// ── compare ───────────────────────────────────────────────────────────────────

fn cmd_compare(args: CompareArgs) -> Result<()> {
    let baseline = ReportSet::load(&args.baseline)
        .with_context(|| format!("reading {}", args.baseline.display()))?;
    let candidate = ReportSet::load(&args.candidate)
        .with_context(|| format!("reading {}", args.candidate.display()))?;
    let settings = ComparisonSettings::from_sets(&baseline, &candidate)?;

    let rows = compare(&baseline, &candidate);
    if rows.is_empty() {
        displaylevel!(2, "Warning : the two reports have no file in common\n");
    }

    let dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(comparison_file_name(&settings, args.tag.as_deref()));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    render_comparison(file, &rows, &settings)
        .with_context(|| format!("writing {}", path.display()))?;

    displayout!("Comparison report generated successfully: {}\n", path.display());
    Ok(())
}

// ── monitor ───────────────────────────────────────────────────────────────────

fn print_sample(sample: &RssSample) {
    displayout!(
        "{:>10.3} s  pid {}  {:>10} KB\n",
        sample.at.as_secs_f64(),
        sample.pid,
        sample.resident_bytes / 1024
    );
}

fn cmd_monitor(args: MonitorArgs) -> Result<()> {
    let monitor = RssMonitor::spawn(args.pid, Duration::from_millis(args.period_ms))
        .context("starting monitor thread")?;

    let report = match args.duration_secs {
        Some(secs) => {
            let deadline = Instant::now() + Duration::from_secs(secs);
            loop {
                match monitor.samples().recv_deadline(deadline) {
                    Ok(sample) => print_sample(&sample),
                    Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            monitor.stop()
        }
        None => {
            for sample in monitor.samples().iter() {
                print_sample(&sample);
            }
            monitor.join()
        }
    }
    .context("stopping monitor thread")?;

    if report.samples.is_empty() {
        bail!("could not sample process {}", args.pid);
    }
    displayout!("Peak resident set size: {} KB\n", report.peak_kb());
    Ok(())
}

// ── segregate ─────────────────────────────────────────────────────────────────

fn cmd_segregate(args: SegregateArgs) -> Result<()> {
    let summary =
        segregate(&args.dir).with_context(|| format!("segregating {}", args.dir.display()))?;
    for (bucket, count) in &summary.buckets {
        displayout!("{}: {} file(s)\n", summary.parent.join(bucket).display(), count);
    }
    displayout!("Files have been segregated into {} bucket(s)\n", summary.buckets.len());
    Ok(())
}
