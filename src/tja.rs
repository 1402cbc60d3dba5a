//! The interpreter of TJA(.tja) files.
//!
//! This module consists of two phases: line classification and interpretation.
//!
//! `lex` module trims the comments and classifies each line into a header, a command, or a note line.
//!
//! `parse` module replays the classified lines as a state machine, tracking the tempo, meter, scroll speed and
//! branches over time, and writes the osu! timing points and hit objects into [`model::Section`]s.
//!
//! In detail, our policies are:
//!
//! - Support only the single play. Any `STYLE:` and `#START P1` skip the course with a warning.
//! - Malformed numbers fail the whole file, because the timing after them cannot be trusted.
//! - Keep the timing arithmetic exactly, so the converted notes do not drift from the audio.

pub mod command;
pub mod lex;
pub mod mixin;
pub mod model;
pub mod parse;

use thiserror::Error;

use self::{
    command::{CourseKind, ValueError},
    mixin::LineMixin,
    model::Chart,
};

/// A fatal error of interpreting the TJA file, with the line number.
pub type TjaError = LineMixin<ValueError>;

/// A warning about the part of the chart which was ignored.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TjaWarning {
    /// The course declared a play style, which is not supported.
    #[error("STYLE `{style}` is not supported, skipped {course}")]
    UnsupportedStyle {
        /// The skipped course.
        course: CourseKind,
        /// The declared style.
        style: String,
    },
    /// The chart started for a player side of the double play.
    #[error("double player `#START {player}` is not supported, skipped {course}")]
    UnsupportedPlayer {
        /// The skipped course.
        course: CourseKind,
        /// The player side such as `P1`.
        player: String,
    },
    /// A line other than `NAME:VALUE` was found before any course.
    #[error("expected a header `NAME:VALUE`, but found `{0}`")]
    NotAHeader(String),
    /// A header line was found between `#START` and `#END`.
    #[error("header `{0}` inside the chart is ignored")]
    HeaderInChart(String),
    /// `#END` was reached while a drum roll or balloon was not closed by `8`.
    #[error("long note is not closed until `#END`")]
    UnclosedLongNote,
    /// A drum roll was too long to be written as a slider, so it was dropped.
    #[error("drum roll starting at {time} ms is too long to be written, skipped")]
    SliderOutOfRange {
        /// Start time of the drum roll in milliseconds.
        time: i64,
    },
    /// The file ended without `#END` of the course.
    #[error("chart of {0} is not closed by `#END`")]
    UnterminatedChart(CourseKind),
}

/// A warning with the line number.
pub type TjaWarningWithLine = LineMixin<TjaWarning>;

/// Output of interpreting a TJA file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct TjaOutput {
    /// The interpreted chart.
    pub chart: Chart,
    /// Warnings that occurred during interpreting.
    pub warnings: Vec<TjaWarningWithLine>,
}

/// Interprets a TJA file from the decoded source text.
///
/// # Example
///
/// ```
/// use tja2osu::tja::{TjaOutput, command::CourseKind, parse_tja};
///
/// let source = "TITLE:Test Song\nBPM:120\nCOURSE:Oni\n#START\n1020,\n#END\n";
/// let TjaOutput { chart, warnings } = parse_tja(source).unwrap();
/// assert_eq!(chart.metadata.title, "Test Song");
/// assert_eq!(chart.course(CourseKind::Oni).map(<[_]>::len), Some(1));
/// assert!(warnings.is_empty());
/// ```
///
/// # Errors
///
/// Returns [`TjaError`] if a number or course name is malformed.
pub fn parse_tja(source: &str) -> Result<TjaOutput, TjaError> {
    parse::interpret(source.lines())
}
