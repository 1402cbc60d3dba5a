//! Lexical analyzer of TJA format.
//!
//! Every source line is trimmed of its comment and whitespace, then classified into a [`Token`] once,
//! so that the interpreter only matches on the variants.

use super::command::{Directive, Result};

/// A token content of TJA format, one per non-empty line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum Token<'a> {
    /// `[NAME]:[VALUE]`. A metadata line.
    Header {
        /// String before the first colon, trimmed.
        name: &'a str,
        /// String after the first colon, trimmed. It may be empty.
        value: &'a str,
    },
    /// `#[NAME] [args]`. A command line.
    Command {
        /// The parsed command.
        directive: Directive,
        /// Whether the line ended with the measure separator `,`.
        closes_measure: bool,
    },
    /// Other lines, which are the note characters in the chart.
    Notes(&'a str),
}

/// Removes the trailing `//` comment and the surrounding whitespaces.
#[must_use]
pub fn strip_line(line: &str) -> &str {
    let line = line.find("//").map_or(line, |idx| &line[..idx]);
    line.trim()
}

impl<'a> Token<'a> {
    /// Classifies a line already passed through [`strip_line`], or returns `None` for an empty line.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`](super::command::ValueError) if the line is a known command with a malformed argument.
    pub fn parse(line: &'a str) -> Result<Option<Self>> {
        if line.is_empty() {
            return Ok(None);
        }
        if line.starts_with('#') {
            let (command, closes_measure) = match line.strip_suffix(',') {
                Some(command) => (command, true),
                None => (line, false),
            };
            let directive = Directive::parse(command)?;
            return Ok(Some(Self::Command {
                directive,
                closes_measure,
            }));
        }
        if let Some((name, value)) = line.split_once(':') {
            return Ok(Some(Self::Header {
                name: name.trim(),
                value: value.trim(),
            }));
        }
        Ok(Some(Self::Notes(line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tja::command::BranchKind;

    #[test]
    fn strips_comments() {
        assert_eq!(strip_line("  1010, // first measure"), "1010,");
        assert_eq!(strip_line("// only comment"), "");
        assert_eq!(strip_line("TITLE:foo//bar"), "TITLE:foo");
    }

    #[test]
    fn classifies() {
        assert_eq!(Token::parse(""), Ok(None));
        assert_eq!(
            Token::parse("TITLE: Song"),
            Ok(Some(Token::Header {
                name: "TITLE",
                value: "Song"
            }))
        );
        assert_eq!(
            Token::parse("WAVE:a:b.ogg"),
            Ok(Some(Token::Header {
                name: "WAVE",
                value: "a:b.ogg"
            }))
        );
        assert_eq!(
            Token::parse("#GOGOSTART,"),
            Ok(Some(Token::Command {
                directive: Directive::GogoStart,
                closes_measure: true
            }))
        );
        assert_eq!(
            Token::parse("#M"),
            Ok(Some(Token::Command {
                directive: Directive::Branch(BranchKind::Master),
                closes_measure: false
            }))
        );
        assert_eq!(Token::parse("1100,"), Ok(Some(Token::Notes("1100,"))));
        assert!(Token::parse("#BPMCHANGE fast").is_err());
    }
}
