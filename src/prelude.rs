//! Prelude module for the crate.
//!
//! You can use `use tja2osu::prelude::*;` to import the commonly used types at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_tja_error, emit_tja_warnings};

pub use crate::{
    convert::{ConvertError, ConvertOutput, convert_file, is_tja_file},
    decode::{Decoded, SourceEncoding, decode},
    osu::{
        CircleKind, HitObject, TimingPoint,
        beatmap::{Beatmap, RenderedBeatmap, render_beatmaps},
        materialize::{BranchStream, CourseStreams, materialize},
    },
    tja::{
        TjaError, TjaOutput, TjaWarning, TjaWarningWithLine,
        command::{BranchKind, CourseKind, Directive, Meter, ValueError},
        mixin::{LineMixin, LineMixinExt},
        model::{BranchEvents, Chart, Metadata, Section, TimingParam},
        parse_tja,
    },
};
