//! The osu! side of the conversion.
//!
//! [`TimingPoint`] and [`HitObject`] are the records the interpreter emits. They are formatted into the
//! lines of the `[TimingPoints]` and `[HitObjects]` sections by [`std::fmt::Display`].
//!
//! - `materialize` flattens the branched sections into one stream per branch.
//! - `beatmap` renders the streams into the whole `.osu` documents.

pub mod beatmap;
pub mod materialize;

use std::fmt;

/// `SliderMultiplier` of the beatmap. A slider advances this times 100 osu! pixels per quarter note.
pub const SLIDER_MULTIPLIER: f64 = 1.4;

/// The longest slider length written, which keeps the path end inside a 32-bit coordinate.
pub const MAX_SLIDER_LENGTH: i64 = i32::MAX as i64 - 256;

/// Position where every hit object is placed. osu!taiko ignores it.
pub const PLAYFIELD_CENTER: (i64, i64) = (256, 192);

/// Rounds to two decimal places, the way the decimal representation does.
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Formats the float in the shortest form which reads back to the same value, always with a decimal point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalRepr(pub f64);

impl fmt::Display for DecimalRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A line of the `[TimingPoints]` section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingPoint {
    /// Start time in milliseconds.
    pub time: i64,
    /// Milliseconds per beat if uninherited, otherwise negative inverse scroll speed in percent.
    pub beat_length: f64,
    /// Beats in a measure.
    pub meter: u64,
    /// Whether the point changes the tempo or meter, rather than the scroll speed only.
    pub uninherited: bool,
    /// Effect bit flags.
    pub effects: u8,
}

impl fmt::Display for TimingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},1,0,100,{},{}",
            self.time,
            DecimalRepr(self.beat_length),
            self.meter,
            u8::from(self.uninherited),
            self.effects
        )
    }
}

/// A kind of the single hit note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CircleKind {
    /// Red note, `1`.
    Don,
    /// Blue note, `2`.
    Ka,
    /// Large red note, `3`.
    BigDon,
    /// Large blue note, `4`.
    BigKa,
}

impl CircleKind {
    /// The hit sound flags which decide the color and size in osu!taiko.
    #[must_use]
    pub const fn hit_sound(self) -> u8 {
        match self {
            Self::Don => 0,
            Self::Ka => 2,
            Self::BigDon => 4,
            Self::BigKa => 12,
        }
    }
}

/// A line of the `[HitObjects]` section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitObject {
    /// A single note.
    Circle {
        /// Hit time in milliseconds.
        time: i64,
        /// Color and size.
        kind: CircleKind,
    },
    /// A drum roll, from `5` or `6` to `8`.
    Slider {
        /// Start time in milliseconds.
        time: i64,
        /// Whether it is the large drum roll.
        big: bool,
        /// Spatial length in osu! pixels.
        length: i64,
    },
    /// A balloon, from `7` or `9` to `8`.
    Spinner {
        /// Start time in milliseconds.
        time: i64,
        /// End time in milliseconds.
        end_time: i64,
    },
}

impl HitObject {
    /// Start time of the object in milliseconds.
    #[must_use]
    pub const fn time(&self) -> i64 {
        match self {
            Self::Circle { time, .. } | Self::Slider { time, .. } | Self::Spinner { time, .. } => {
                *time
            }
        }
    }
}

impl fmt::Display for HitObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = PLAYFIELD_CENTER;
        match self {
            Self::Circle { time, kind } => {
                write!(f, "{x},{y},{time},1,{},0:0:0:0:", kind.hit_sound())
            }
            Self::Slider { time, big, length } => write!(
                f,
                "{x},{y},{time},2,{},L|{}:{y},1,{length}",
                u8::from(*big),
                x.saturating_add(*length)
            ),
            Self::Spinner { time, end_time } => write!(f, "{x},{y},{time},12,0,{end_time}"),
        }
    }
}
