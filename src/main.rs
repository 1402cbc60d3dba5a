//! Command line interface converting TJA charts into osu!taiko beatmaps.

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use env_logger::Env;
use rayon::prelude::*;
use tja2osu::convert::{ConvertError, ConvertOutput, convert_file, is_tja_file};
use walkdir::WalkDir;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        help = "Directory where to write the beatmaps (defaults to the directory of each chart)."
    )]
    out_dir: Option<PathBuf>,

    #[arg(long, help = "Do not recurse into the subdirectories.")]
    no_recursive: bool,

    #[arg(required = true, help = "Path to TJA file or folder containing TJA files.")]
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Some(out_dir) = &cli.out_dir
        && let Err(e) = fs::create_dir_all(out_dir)
    {
        log::error!("failed to create {}: {e}", out_dir.display());
        return ExitCode::FAILURE;
    }

    let charts = collect_charts(&cli.paths, !cli.no_recursive);
    if charts.is_empty() {
        log::warn!("no TJA file found");
    }

    let results: Vec<_> = charts
        .par_iter()
        .map(|path| convert_file(path, cli.out_dir.as_deref()))
        .collect();

    let mut failed = 0usize;
    for (path, result) in charts.iter().zip(results) {
        match result {
            Ok(output) => report_warnings(path, &output),
            Err(e) => {
                failed += 1;
                report_error(&e);
            }
        }
    }

    log::info!(
        "converted {} of {} charts",
        charts.len() - failed,
        charts.len()
    );
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn collect_charts(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut charts = vec![];
    for path in paths {
        if !path.is_dir() {
            charts.push(path.clone());
            continue;
        }
        let walker = WalkDir::new(path).max_depth(if recursive { usize::MAX } else { 1 });
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() && is_tja_file(entry.path()) => {
                    charts.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => log::warn!("skipped an entry of {}: {e}", path.display()),
            }
        }
    }
    charts
}

fn report_warnings(path: &Path, output: &ConvertOutput) {
    #[cfg(feature = "diagnostics")]
    tja2osu::diagnostics::emit_tja_warnings(
        &path.display().to_string(),
        &output.source,
        &output.warnings,
    );
    #[cfg(not(feature = "diagnostics"))]
    for warning in &output.warnings {
        log::warn!("{}: {warning}", path.display());
    }
}

fn report_error(error: &ConvertError) {
    log::error!("{error}");
    #[cfg(feature = "diagnostics")]
    if let ConvertError::Interpret { path, source, text } = error {
        tja2osu::diagnostics::emit_tja_error(&path.display().to_string(), text, source);
    }
}
