//! Converting a TJA file into the `.osu` files.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    decode::decode,
    osu::beatmap::render_beatmaps,
    tja::{TjaError, TjaOutput, TjaWarningWithLine, parse_tja},
};

/// An error occurred when converting a file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Failed to read the chart.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The chart path.
        path: PathBuf,
        /// The cause.
        #[source]
        source: io::Error,
    },
    /// The chart could not be interpreted.
    #[error("failed to interpret {}: {source}", path.display())]
    Interpret {
        /// The chart path.
        path: PathBuf,
        /// The cause.
        #[source]
        source: TjaError,
        /// The decoded source, to render the error with.
        text: String,
    },
    /// Failed to write a beatmap.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The beatmap path.
        path: PathBuf,
        /// The cause.
        #[source]
        source: io::Error,
    },
}

/// Result of converting a file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOutput {
    /// Paths of the written beatmaps.
    pub written: Vec<PathBuf>,
    /// Warnings that occurred during interpreting.
    pub warnings: Vec<TjaWarningWithLine>,
    /// The decoded source, to render the warnings with.
    pub source: String,
}

/// Converts the chart at `path`, writing the beatmaps into `out_dir` or next to the chart.
///
/// # Errors
///
/// Returns [`ConvertError`] if reading, interpreting or writing failed. Beatmaps written before a write
/// failure are kept.
pub fn convert_file(path: &Path, out_dir: Option<&Path>) -> Result<ConvertOutput, ConvertError> {
    let bytes = fs::read(path).map_err(|source| ConvertError::Read {
        path: path.to_owned(),
        source,
    })?;
    let decoded = decode(&bytes);
    log::debug!("decoded {} as {:?}", path.display(), decoded.encoding);
    let source = decoded.text.into_owned();

    let TjaOutput { chart, warnings } = match parse_tja(&source) {
        Ok(output) => output,
        Err(error) => {
            return Err(ConvertError::Interpret {
                path: path.to_owned(),
                source: error,
                text: source,
            });
        }
    };

    let out_dir = out_dir
        .or_else(|| path.parent())
        .unwrap_or_else(|| Path::new("."));
    let mut written = vec![];
    for beatmap in render_beatmaps(&chart) {
        let out_path = out_dir.join(&beatmap.file_name);
        fs::write(&out_path, beatmap.text).map_err(|source| ConvertError::Write {
            path: out_path.clone(),
            source,
        })?;
        log::info!("wrote {}", out_path.display());
        written.push(out_path);
    }
    Ok(ConvertOutput {
        written,
        warnings,
        source,
    })
}

/// Whether the path looks like a TJA file.
#[must_use]
pub fn is_tja_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tja"))
}
