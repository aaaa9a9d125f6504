mod cli;
mod config;
mod date;
mod error;
mod exiftool;
mod logging;
mod planner;
mod scanner;
mod transfer;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::configure_logging(args.verbose);
    let config = config::Config::from_args(&args);

    let files = scanner::scan_sources(&args.sources);
    if files.is_empty() {
        log::info!("No files found.");
        return Ok(());
    }
    log::info!("Found {} files", files.len());

    if config.dry_run {
        log::info!("[dry-run] No files will be copied, moved or removed.");
    }

    // The worker lives exactly as long as the planner; dropping it on any
    // exit path sends the stop command.
    let exiftool = exiftool::ExifTool::start(&args.exiftool)
        .context("exiftool is required to read capture dates")?;
    let mut planner = planner::Planner::new(config, exiftool);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Organizing {pos}/{len} {wide_bar} {msg}")?
            .progress_chars("=> "),
    );

    let mut summary = planner::Summary::default();
    for path in &files {
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        pb.set_message(file_name.to_string());

        match pb.suspend(|| planner.process_file(path)) {
            Ok(placement) => summary.record(&placement),
            Err(e) if e.is_fatal() => {
                pb.abandon();
                return Err(e).with_context(|| format!("while processing {}", path.display()));
            }
            Err(e) => {
                pb.suspend(|| log::error!("{}: {}", path.display(), e));
                summary.record_failure();
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    log::info!("Done: {}", summary);
    Ok(())
}
