//! Fancy diagnostics support using `ariadne`.
//!
//! The warnings and errors of [`crate::tja`] carry only the line number, so the whole line is labeled.
//!
//! # Usage Example
//!
//! ```rust
//! use tja2osu::{diagnostics::emit_tja_warnings, tja::parse_tja};
//!
//! let source = "TITLE:Test\nCOURSE:Oni\nSTYLE:Double\n#START\n1,\n#END\n";
//! let output = parse_tja(source).unwrap();
//!
//! emit_tja_warnings("test.tja", source, &output.warnings);
//! ```

use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::tja::{TjaError, TjaWarningWithLine};

/// Simple source container that holds the filename and source text.
#[derive(Debug, Clone, Copy)]
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Byte range of the line, starts with 1, without the line terminator.
    ///
    /// A line past the end of the text results in the empty range at the end.
    #[must_use]
    pub fn line_span(&self, line: usize) -> Range<usize> {
        let mut start = 0;
        for (index, text) in self.text.split_inclusive('\n').enumerate() {
            if index + 1 == line {
                let content = text.trim_end_matches(['\n', '\r']);
                return start..start + content.len();
            }
            start += text.len();
        }
        self.text.len()..self.text.len()
    }
}

/// Trait for converting errors with the line number to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

impl ToAriadne for TjaWarningWithLine {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        build_report(
            src,
            ReportKind::Warning,
            src.line_span(self.line()),
            "TJA interpreting warning",
            self.content(),
            Color::Blue,
        )
    }
}

impl ToAriadne for TjaError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        build_report(
            src,
            ReportKind::Error,
            src.line_span(self.line()),
            "TJA interpreting error",
            self.content(),
            Color::Red,
        )
    }
}

/// Convenience method: batch render the warnings into stderr.
pub fn emit_tja_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a TjaWarningWithLine>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for w in warnings {
        let report = w.to_report(&simple);
        let _ = report.eprint((name.to_string(), ariadne_source.clone()));
    }
}

/// Renders the error into stderr.
pub fn emit_tja_error(name: &str, source: &str, error: &TjaError) {
    let simple = SimpleSource::new(name, source);
    let _ = error
        .to_report(&simple)
        .eprint((name.to_string(), Source::from(source)));
}

/// Collect `ariadne::Report` instances for the warnings without printing.
#[must_use]
pub fn collect_tja_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a TjaWarningWithLine>,
) -> Vec<Report<'a, (String, Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings.into_iter().map(|w| w.to_report(&simple)).collect()
}
