//! Data models produced by the interpreter.
//!
//! [`Chart`] holds the [`Metadata`] and, for every course, the sequence of [`Section`]s. A section keeps the
//! events of up to three branches, and [`TimingParam`] is the timing context used while emitting them.

use crate::osu::{HitObject, SLIDER_MULTIPLIER, TimingPoint};

use super::command::{BranchKind, CourseKind, Meter};

/// Milliseconds before the first beat where the chart starts.
pub const LEAD_IN_PAD_MS: f64 = 25.0;

/// The BPM used when the chart has no `BPM:` header.
pub const DEFAULT_BPM: f64 = 120.0;

/// The metadata of the chart, read from the header lines before the courses.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// `TITLE:`
    pub title: String,
    /// `TITLEJA:`, the localized title.
    pub title_ja: Option<String>,
    /// `SUBTITLE:`
    pub subtitle: String,
    /// `SUBTITLEJA:`, the localized subtitle.
    pub subtitle_ja: Option<String>,
    /// `BPM:`, the initial tempo.
    pub bpm: f64,
    /// `OFFSET:`, in seconds. The first measure starts at minus this.
    pub offset: f64,
    /// `DEMOSTART:`, the preview time in seconds.
    pub demo_start: f64,
    /// `WAVE:`, the audio file name.
    pub wave: String,
    /// Whether each branch appears in the chart. The normal branch always does.
    pub branches: [bool; 3],
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            title_ja: None,
            subtitle: String::new(),
            subtitle_ja: None,
            bpm: DEFAULT_BPM,
            offset: 0.0,
            demo_start: 0.0,
            wave: String::new(),
            branches: [true, false, false],
        }
    }
}

impl Metadata {
    /// The localized title if present, otherwise the title.
    #[must_use]
    pub fn unicode_title(&self) -> &str {
        self.title_ja.as_deref().unwrap_or(&self.title)
    }

    /// Whether the branch appears in the chart.
    #[must_use]
    pub const fn has_branch(&self, branch: BranchKind) -> bool {
        self.branches[branch.index()]
    }

    /// The time where the first measure of every course starts, in milliseconds.
    #[must_use]
    pub fn chart_start_time(&self) -> f64 {
        -self.offset * 1000.0 - LEAD_IN_PAD_MS
    }
}

/// Timing context of the branch being written.
///
/// It is a plain value. The backup taken at `#BRANCHSTART` is an independent copy, so restoring it never
/// shares state between branches.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingParam {
    /// Current time in milliseconds. It is negative during the lead-in.
    pub time: f64,
    /// Current tempo.
    pub bpm: f64,
    /// Milliseconds per beat of the meter's note value.
    pub beat_length: f64,
    /// Current time signature.
    pub meter: Meter,
    /// Scroll speed multiplier.
    pub scroll: f64,
    /// Whether in the gogo time.
    pub gogo: bool,
    /// Whether the bar lines are visible.
    pub barline: bool,
}

impl TimingParam {
    /// Creates the context at the start of a course.
    #[must_use]
    pub fn new(bpm: f64, time: f64) -> Self {
        let meter = Meter::default();
        Self {
            time,
            bpm,
            beat_length: beat_length(bpm, meter),
            meter,
            scroll: 1.0,
            gogo: false,
            barline: true,
        }
    }

    /// Changes the tempo, keeping `beat_length` consistent.
    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = bpm;
        self.beat_length = beat_length(self.bpm, self.meter);
    }

    /// Changes the meter, keeping `beat_length` consistent.
    pub fn set_meter(&mut self, meter: Meter) {
        self.meter = meter;
        self.beat_length = beat_length(self.bpm, self.meter);
    }

    /// A copy of this snapshot but with the time cursor replaced.
    #[must_use]
    pub const fn restored_at(&self, time: f64) -> Self {
        Self { time, ..*self }
    }

    /// How many quarter notes one measure spans.
    #[must_use]
    pub fn measure_equivalent_beat(&self) -> f64 {
        self.meter.measure_equivalent_beat()
    }

    /// Milliseconds of one measure.
    #[must_use]
    pub fn measure_duration(&self) -> f64 {
        self.meter.numerator as f64 * self.beat_length
    }

    /// Beats of the meter taken by one character, when the measure has `chars` characters.
    #[must_use]
    pub fn beat_per_char(&self, chars: usize) -> f64 {
        self.meter.numerator as f64 / chars as f64
    }

    /// Milliseconds taken by one character, when the measure has `chars` characters.
    #[must_use]
    pub fn time_per_char(&self, chars: usize) -> f64 {
        self.beat_per_char(chars) * self.beat_length
    }

    /// Slider length advanced by one character, when the measure has `chars` characters.
    #[must_use]
    pub fn slide_length_per_char(&self, chars: usize) -> f64 {
        self.beat_per_char(chars) * 4.0 / self.meter.denominator as f64
            * self.scroll
            * SLIDER_MULTIPLIER
            * 100.0
    }
}

/// `60000 / bpm * 4 / denominator`
fn beat_length(bpm: f64, meter: Meter) -> f64 {
    60000.0 / bpm * 4.0 / meter.denominator as f64
}

/// Events of one branch in a section.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchEvents {
    /// Timing points in time order.
    pub timing_points: Vec<TimingPoint>,
    /// Hit objects in time order.
    pub hit_objects: Vec<HitObject>,
}

/// A run of the chart between `#START`, `#BRANCHSTART`, `#BRANCHEND` and `#END`.
///
/// A branch slot is `None` if the branch was not written in the run. Such a slot borrows another branch's
/// events on materializing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    branches: [Option<BranchEvents>; 3],
}

impl Section {
    /// Events written in the branch, if it was written.
    #[must_use]
    pub fn branch(&self, branch: BranchKind) -> Option<&BranchEvents> {
        self.branches[branch.index()].as_ref()
    }

    /// Events of the branch, marking the branch as written.
    pub fn branch_mut(&mut self, branch: BranchKind) -> &mut BranchEvents {
        self.branches[branch.index()].get_or_insert_with(BranchEvents::default)
    }

    /// Events to be used for the branch: its own, or else the normal branch's, or else the first written one.
    #[must_use]
    pub fn resolve(&self, branch: BranchKind) -> Option<&BranchEvents> {
        self.branch(branch)
            .or_else(|| self.branch(BranchKind::Normal))
            .or_else(|| self.branches.iter().flatten().next())
    }

    /// Whether no branch was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.iter().all(Option::is_none)
    }
}

/// The interpreted chart.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chart {
    /// The metadata.
    pub metadata: Metadata,
    /// Sections of each course, indexed by [`CourseKind::index`]. `None` if the course is not defined.
    pub courses: [Option<Vec<Section>>; 5],
}

impl Chart {
    /// Sections of the course, if defined.
    #[must_use]
    pub fn course(&self, course: CourseKind) -> Option<&[Section]> {
        self.courses[course.index()].as_deref()
    }

    /// Defined courses with their sections.
    pub fn defined_courses(&self) -> impl Iterator<Item = (CourseKind, &[Section])> {
        CourseKind::ALL
            .into_iter()
            .filter_map(|course| self.course(course).map(|sections| (course, sections)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn beat_length_follows_bpm_and_meter() {
        for (numerator, denominator) in [(4, 4), (3, 4), (7, 8), (5, 16), (2, 2), (9, 1)] {
            let mut param = TimingParam::new(150.0, 0.0);
            param.set_meter(Meter::new(numerator, denominator).unwrap());
            assert_eq!(
                param.beat_length,
                60000.0 / 150.0 * 4.0 / denominator as f64
            );
            assert_eq!(
                param.measure_equivalent_beat(),
                numerator as f64 / denominator as f64 * 4.0
            );
            param.set_bpm(200.0);
            assert_eq!(
                param.beat_length,
                60000.0 / 200.0 * 4.0 / denominator as f64
            );
        }
    }

    #[test]
    fn per_char_steps() {
        let param = TimingParam::new(150.0, -25.0);
        assert_eq!(param.measure_duration(), 1600.0);
        assert_eq!(param.time_per_char(4), 400.0);
        assert_eq!(param.slide_length_per_char(4), 1.0 * 4.0 / 4.0 * 1.0 * 1.4 * 100.0);
    }

    #[test]
    fn restored_keeps_everything_but_time() {
        let mut backup = TimingParam::new(120.0, 100.0);
        backup.scroll = 2.0;
        let restored = backup.restored_at(900.0);
        assert_eq!(restored.time, 900.0);
        assert_eq!(restored.scroll, 2.0);
        assert_eq!(backup.time, 100.0);
    }

    #[test]
    fn resolve_falls_back_symmetrically() {
        let mut section = Section::default();
        assert!(section.is_empty());
        section.branch_mut(BranchKind::Expert).hit_objects.push(
            crate::osu::HitObject::Spinner {
                time: 0,
                end_time: 1,
            },
        );
        let expert = section.branch(BranchKind::Expert);
        assert!(section.branch(BranchKind::Normal).is_none());
        assert_eq!(section.resolve(BranchKind::Normal), expert);
        assert_eq!(section.resolve(BranchKind::Master), expert);
    }
}
