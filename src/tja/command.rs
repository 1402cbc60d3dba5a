//! Definitions of command argument data.
//!
//! Structures in this module are used by the [lex](super::lex) part, the [parse](super::parse) part, and the output models.

use std::str::FromStr;

use num::rational::Ratio;
use thiserror::Error;

/// An error occurred when reading the value of a header or command.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueError {
    /// The value was expected to be a decimal number.
    #[error("expected a number for `{name}`, but found `{value}`")]
    ExpectedNumber {
        /// The header or command name.
        name: String,
        /// The value found.
        value: String,
    },
    /// The value must not be zero, because it is used as a divisor.
    #[error("`{name}` must not be zero")]
    ZeroValue {
        /// The header or command name.
        name: String,
    },
    /// The value was expected to be a meter like `4/4`.
    #[error("expected a meter `N/D` for `{name}`, but found `{value}`")]
    ExpectedMeter {
        /// The header or command name.
        name: String,
        /// The value found.
        value: String,
    },
    /// The course name was not recognized.
    #[error("course `{0}` not recognized")]
    UnknownCourse(String),
}

/// type alias of core::result::Result<T, ValueError>
pub(crate) type Result<T> = core::result::Result<T, ValueError>;

/// Parses a decimal argument of `name`.
pub(crate) fn parse_number(name: &str, value: &str) -> Result<f64> {
    value.trim().parse().map_err(|_| ValueError::ExpectedNumber {
        name: name.into(),
        value: value.into(),
    })
}

/// Parses a decimal argument of `name`, which will be used as a divisor.
pub(crate) fn parse_non_zero(name: &str, value: &str) -> Result<f64> {
    let number = parse_number(name, value)?;
    if number == 0.0 {
        return Err(ValueError::ZeroValue { name: name.into() });
    }
    Ok(number)
}

/// A difficulty slot of the chart. `COURSE:[name]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CourseKind {
    /// `Easy` or `0`.
    Kantan,
    /// `Normal` or `1`.
    Futsuu,
    /// `Hard` or `2`.
    Muzukashii,
    /// `Oni` or `3`.
    Oni,
    /// `Edit` or `4`, the hidden extra course.
    InnerOni,
}

impl CourseKind {
    /// All courses in the slot order.
    pub const ALL: [Self; 5] = [
        Self::Kantan,
        Self::Futsuu,
        Self::Muzukashii,
        Self::Oni,
        Self::InnerOni,
    ];

    /// The slot index of the course, from 0 to 4.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The display name used in beatmap versions and file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kantan => "Kantan",
            Self::Futsuu => "Futsuu",
            Self::Muzukashii => "Muzukashii",
            Self::Oni => "Oni",
            Self::InnerOni => "Inner Oni",
        }
    }

    /// Whether every branch of the course is exported. The lower courses export only one branch.
    #[must_use]
    pub const fn exports_all_branches(self) -> bool {
        matches!(self, Self::Oni | Self::InnerOni)
    }
}

impl FromStr for CourseKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self> {
        const NAMES: [(&str, CourseKind); 5] = [
            ("Easy", CourseKind::Kantan),
            ("Normal", CourseKind::Futsuu),
            ("Hard", CourseKind::Muzukashii),
            ("Oni", CourseKind::Oni),
            ("Edit", CourseKind::InnerOni),
        ];
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::ALL
                .get(index)
                .copied()
                .ok_or_else(|| ValueError::UnknownCourse(s.into()));
        }
        NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, course)| course)
            .ok_or_else(|| ValueError::UnknownCourse(s.into()))
    }
}

impl std::fmt::Display for CourseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A branch of the notes, selected by the player's performance while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BranchKind {
    /// `#N`, the default branch.
    #[default]
    Normal,
    /// `#E`.
    Expert,
    /// `#M`.
    Master,
}

impl BranchKind {
    /// All branches in the slot order.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Expert, Self::Master];

    /// The slot index of the branch, from 0 to 2.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The display name used in beatmap versions and file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Expert => "Expert",
            Self::Master => "Master",
        }
    }
}

impl std::fmt::Display for BranchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A time signature of the measure. `#MEASURE N/D`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    /// Beats in a measure.
    pub numerator: u32,
    /// Note value of a beat, must not be zero.
    pub denominator: u32,
}

impl Default for Meter {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl Meter {
    /// Creates a new meter, or `None` if `denominator` is zero.
    #[must_use]
    pub const fn new(numerator: u32, denominator: u32) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        Some(Self {
            numerator,
            denominator,
        })
    }

    /// How many quarter notes one measure spans, as a float like the timing calculation does.
    #[must_use]
    pub fn measure_equivalent_beat(self) -> f64 {
        self.numerator as f64 / self.denominator as f64 * 4.0
    }

    /// How many quarter notes one measure spans, exactly.
    #[must_use]
    pub fn quarter_notes(self) -> Ratio<u64> {
        Ratio::new(self.numerator as u64 * 4, self.denominator as u64)
    }

    /// Whether one measure spans a whole number of quarter notes.
    #[must_use]
    pub fn is_whole_beats(self) -> bool {
        self.quarter_notes().is_integer()
    }

    /// The beat count written into timing points, rounding up the fractional measures.
    #[must_use]
    pub fn beat_count(self) -> u64 {
        self.quarter_notes().ceil().to_integer()
    }
}

impl FromStr for Meter {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self> {
        let err = || ValueError::ExpectedMeter {
            name: "#MEASURE".into(),
            value: s.into(),
        };
        let (numerator, denominator) = s.split_once('/').ok_or_else(err)?;
        let numerator = numerator.trim().parse().map_err(|_| err())?;
        let denominator = denominator.trim().parse().map_err(|_| err())?;
        Self::new(numerator, denominator).ok_or_else(err)
    }
}

impl std::fmt::Display for Meter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A command line in the chart, which starts with `#`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Directive {
    /// `#START [player]`. Starts the chart of the course. `player` is such as `P1` for the double play.
    Start {
        /// The player side, which is not supported.
        player: Option<String>,
    },
    /// `#END`. Ends the chart of the course.
    End,
    /// `#DELAY [f64]`. Shifts the following notes by the milliseconds.
    Delay(f64),
    /// `#BPMCHANGE [f64]`.
    BpmChange(f64),
    /// `#MEASURE [N/D]`.
    Measure(Meter),
    /// `#SCROLL [f64]`. Changes the scroll speed multiplier.
    Scroll(f64),
    /// `#GOGOSTART`.
    GogoStart,
    /// `#GOGOEND`.
    GogoEnd,
    /// `#BARLINEOFF`. Hides the bar lines.
    BarlineOff,
    /// `#BARLINEON`. Shows the bar lines.
    BarlineOn,
    /// `#BRANCHSTART [condition]`. Starts the branched part. The condition is ignored.
    BranchStart,
    /// `#N`, `#E` or `#M`. Selects the branch to be written.
    Branch(BranchKind),
    /// `#BRANCHEND`. Ends the branched part.
    BranchEnd,
    /// Other command, which is ignored on conversion.
    Other(String),
}

impl Directive {
    /// Parses the command line without the trailing measure separator.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] if the argument of a known command is malformed.
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or(line);
        let args: Vec<&str> = words.collect();
        // Numeric commands read their last argument.
        let last = args.last().copied().unwrap_or(name);
        let directive = match name {
            "#START" => Self::Start {
                player: (!args.is_empty()).then(|| args.join(" ")),
            },
            "#END" => Self::End,
            "#DELAY" => Self::Delay(parse_number(name, last)?),
            "#BPMCHANGE" => Self::BpmChange(parse_non_zero(name, last)?),
            "#MEASURE" => Self::Measure(last.parse()?),
            "#SCROLL" => Self::Scroll(parse_non_zero(name, last)?),
            "#GOGOSTART" => Self::GogoStart,
            "#GOGOEND" => Self::GogoEnd,
            "#BARLINEOFF" => Self::BarlineOff,
            "#BARLINEON" => Self::BarlineOn,
            "#BRANCHSTART" => Self::BranchStart,
            "#N" => Self::Branch(BranchKind::Normal),
            "#E" => Self::Branch(BranchKind::Expert),
            "#M" => Self::Branch(BranchKind::Master),
            "#BRANCHEND" => Self::BranchEnd,
            _ => Self::Other(name.into()),
        };
        Ok(directive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_names() {
        assert_eq!("Oni".parse(), Ok(CourseKind::Oni));
        assert_eq!("EDIT".parse(), Ok(CourseKind::InnerOni));
        assert_eq!("easy".parse(), Ok(CourseKind::Kantan));
        assert_eq!("2".parse(), Ok(CourseKind::Muzukashii));
        assert_eq!(
            "5".parse::<CourseKind>(),
            Err(ValueError::UnknownCourse("5".into()))
        );
        assert_eq!(
            "Tower".parse::<CourseKind>(),
            Err(ValueError::UnknownCourse("Tower".into()))
        );
    }

    #[test]
    fn meter_beats() {
        let meter: Meter = "7/8".parse().unwrap();
        assert_eq!(meter, Meter::new(7, 8).unwrap());
        assert!(!meter.is_whole_beats());
        assert_eq!(meter.beat_count(), 4);
        assert_eq!(meter.measure_equivalent_beat(), 3.5);

        let meter: Meter = "3/4".parse().unwrap();
        assert!(meter.is_whole_beats());
        assert_eq!(meter.beat_count(), 3);

        assert!("4/0".parse::<Meter>().is_err());
        assert!("four".parse::<Meter>().is_err());
    }

    #[test]
    fn directives() {
        assert_eq!(
            Directive::parse("#BPMCHANGE 150.5"),
            Ok(Directive::BpmChange(150.5))
        );
        assert_eq!(
            Directive::parse("#MEASURE 5/4"),
            Ok(Directive::Measure(Meter::new(5, 4).unwrap()))
        );
        assert_eq!(Directive::parse("#START"), Ok(Directive::Start { player: None }));
        assert_eq!(
            Directive::parse("#START P1"),
            Ok(Directive::Start {
                player: Some("P1".into())
            })
        );
        assert_eq!(Directive::parse("#BRANCHSTART p,10,20"), Ok(Directive::BranchStart));
        assert_eq!(
            Directive::parse("#E"),
            Ok(Directive::Branch(BranchKind::Expert))
        );
        assert_eq!(
            Directive::parse("#LYRIC hello"),
            Ok(Directive::Other("#LYRIC".into()))
        );
        assert_eq!(
            Directive::parse("#SCROLL 0"),
            Err(ValueError::ZeroValue {
                name: "#SCROLL".into()
            })
        );
        assert_eq!(
            Directive::parse("#DELAY x"),
            Err(ValueError::ExpectedNumber {
                name: "#DELAY".into(),
                value: "x".into()
            })
        );
    }
}
