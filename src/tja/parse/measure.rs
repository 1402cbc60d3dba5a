//! Buffering of a measure and the long note being held across measures.

use crate::osu::{HitObject, MAX_SLIDER_LENGTH};

use super::super::command::Directive;

/// An item of the measure buffer, in the source order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MeasureItem {
    /// A command placed inside the measure.
    Command(Directive),
    /// A line of note characters.
    Notes(String),
}

/// Lines of the measure being read, until a line ends with `,`.
#[derive(Debug, Default)]
pub(crate) struct MeasureBuffer {
    items: Vec<MeasureItem>,
    chars: usize,
}

impl MeasureBuffer {
    pub(crate) fn push_command(&mut self, directive: Directive) {
        self.items.push(MeasureItem::Command(directive));
    }

    /// Pushes a note line, and returns the closed measure with its character count if the line ends it.
    pub(crate) fn push_notes(&mut self, notes: &str) -> Option<(Vec<MeasureItem>, usize)> {
        let notes = if notes == "," { "0," } else { notes };
        self.chars += notes.chars().count();
        self.items.push(MeasureItem::Notes(notes.to_owned()));
        if !notes.ends_with(',') {
            return None;
        }
        // The separator itself takes no time.
        let chars = self.chars - 1;
        self.chars = 0;
        Some((std::mem::take(&mut self.items), chars))
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.chars = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The kind of a long note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LongNoteKind {
    Slide,
    BigSlide,
    Balloon,
}

/// A long note opened but not closed by `8` yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LongNote {
    pub(crate) start: f64,
    pub(crate) kind: LongNoteKind,
    /// Accumulated slider length, only for slides.
    pub(crate) length: f64,
}

impl LongNote {
    pub(crate) const fn open(kind: LongNoteKind, start: f64) -> Self {
        Self {
            start,
            kind,
            length: 0.0,
        }
    }

    pub(crate) const fn is_slide(&self) -> bool {
        matches!(self.kind, LongNoteKind::Slide | LongNoteKind::BigSlide)
    }

    /// Closes the note at `time`, where one character takes `step` milliseconds.
    ///
    /// Returns `None` if the slider length is not finite or exceeds [`MAX_SLIDER_LENGTH`].
    pub(crate) fn close(self, time: f64, step: f64) -> Option<HitObject> {
        let start = self.start as i64;
        match self.kind {
            LongNoteKind::Slide | LongNoteKind::BigSlide => {
                let length = self.length.round_ties_even();
                if !length.is_finite() || length.abs() > MAX_SLIDER_LENGTH as f64 {
                    return None;
                }
                Some(HitObject::Slider {
                    time: start,
                    big: self.kind == LongNoteKind::BigSlide,
                    length: length as i64,
                })
            }
            // The balloon ends one character after its closing, measured with the current step.
            LongNoteKind::Balloon => Some(HitObject::Spinner {
                time: start,
                end_time: (time + step) as i64,
            }),
        }
    }
}
