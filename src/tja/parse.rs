//! Interpreting the lines of TJA into the [`Chart`].
//!
//! Raw lines == [lex](super::lex) ==> [`Token`]s == [`Interpreter`] ==> [`Chart`] (in [`TjaOutput`])
//!
//! The interpreter is a state machine over the header block, the course headers and the chart body. In the
//! chart body the lines are buffered until a measure closes, then the measure is replayed: commands update
//! the [`TimingParam`], and note characters emit the hit objects while advancing the time.

mod measure;

use std::{mem, ops::ControlFlow};

use crate::osu::{CircleKind, HitObject, TimingPoint, round_hundredths};

use self::measure::{LongNote, LongNoteKind, MeasureBuffer, MeasureItem};
use super::{
    TjaError, TjaOutput, TjaWarning,
    command::{BranchKind, CourseKind, Directive, ValueError, parse_non_zero, parse_number},
    lex::{Token, strip_line},
    mixin::{LineMixin, LineMixinExt},
    model::{Chart, Metadata, Section, TimingParam},
};

/// Type alias of `core::result::Result<T, TjaError>`
pub(crate) type Result<T> = core::result::Result<T, TjaError>;

/// Which part of the file the interpreter is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    /// Headers before the first `COURSE:`.
    MainMetadata,
    /// Headers after `COURSE:`, until `#START`.
    CourseMetadata,
    /// Between `#START` and `#END`.
    CourseChart,
    /// The course uses an unsupported feature, until the next `COURSE:`.
    Skipping,
}

/// Changes of the timing context not yet written as timing points.
#[derive(Debug, Clone, Copy, Default)]
struct PendingChanges {
    /// Tempo, meter or bar line changed.
    uninherited: bool,
    /// Scroll speed or gogo changed.
    inherited: bool,
}

/// The chart interpreter, which consumes the lines one by one.
///
/// All the state belongs to one chart, so interpreting another chart needs a new instance.
#[derive(Debug)]
pub struct Interpreter {
    status: Status,
    metadata: Metadata,
    courses: [Option<Vec<Section>>; 5],
    course: CourseKind,
    branch: BranchKind,
    param: TimingParam,
    /// Timing context at `#BRANCHSTART`, where every branch starts from.
    backup: TimingParam,
    section: Section,
    measure: MeasureBuffer,
    long_note: Option<LongNote>,
    changes: PendingChanges,
    warnings: Vec<LineMixin<TjaWarning>>,
    /// Line number being interpreted.
    line: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates the interpreter at the beginning of a file.
    #[must_use]
    pub fn new() -> Self {
        let metadata = Metadata::default();
        let param = TimingParam::new(metadata.bpm, metadata.chart_start_time());
        Self {
            status: Status::MainMetadata,
            metadata,
            courses: Default::default(),
            course: CourseKind::Kantan,
            branch: BranchKind::Normal,
            param,
            backup: param,
            section: Section::default(),
            measure: MeasureBuffer::default(),
            long_note: None,
            changes: PendingChanges::default(),
            warnings: vec![],
            line: 0,
        }
    }

    /// Interprets a raw line of the source, numbered from 1.
    ///
    /// # Errors
    ///
    /// Returns [`TjaError`] if a number or course name in the line is malformed.
    pub fn feed(&mut self, line: usize, raw: &str) -> Result<()> {
        self.line = line;
        let stripped = strip_line(raw);
        let token = match Token::parse(stripped) {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(()),
            // Commands are read only in the chart body, elsewhere their arguments do not matter.
            Err(err) if self.status != Status::CourseChart => {
                log::debug!("ignored malformed command at line {line}: {err}");
                if self.status == Status::MainMetadata {
                    self.warn(TjaWarning::NotAHeader(stripped.into()));
                }
                return Ok(());
            }
            Err(err) => return Err(err.at_line(line)),
        };
        match token {
            Token::Header {
                name: "COURSE",
                value,
            } => {
                self.status = Status::CourseMetadata;
                self.start_course(value)?;
            }
            Token::Header { name, value } => self.on_header(name, value)?,
            Token::Command {
                directive: Directive::Start { player },
                ..
            } if self.status == Status::CourseMetadata => self.start_chart(player),
            Token::Command {
                directive: Directive::End,
                ..
            } if self.status == Status::CourseChart => self.end_chart(),
            Token::Command {
                directive,
                closes_measure,
            } => match self.status {
                Status::CourseChart => self.buffer_command(directive, closes_measure),
                Status::MainMetadata => self.warn(TjaWarning::NotAHeader(stripped.into())),
                Status::CourseMetadata | Status::Skipping => {}
            },
            Token::Notes(notes) => match self.status {
                Status::CourseChart => self.buffer_notes(notes),
                Status::MainMetadata => self.warn(TjaWarning::NotAHeader(notes.into())),
                Status::CourseMetadata | Status::Skipping => {}
            },
        }
        Ok(())
    }

    /// Finishes the interpretation.
    #[must_use]
    pub fn finish(mut self) -> TjaOutput {
        if self.status == Status::CourseChart {
            self.warn(TjaWarning::UnterminatedChart(self.course));
        }
        TjaOutput {
            chart: Chart {
                metadata: self.metadata,
                courses: self.courses,
            },
            warnings: self.warnings,
        }
    }

    fn warn(&mut self, warning: TjaWarning) {
        self.warnings.push(warning.at_line(self.line));
    }

    fn on_header(&mut self, name: &str, value: &str) -> Result<()> {
        match self.status {
            Status::MainMetadata => self
                .read_metadata(name, value)
                .map_err(|err| err.at_line(self.line)),
            Status::CourseMetadata => {
                if name == "STYLE" {
                    self.warn(TjaWarning::UnsupportedStyle {
                        course: self.course,
                        style: value.into(),
                    });
                    self.status = Status::Skipping;
                }
                Ok(())
            }
            Status::CourseChart => {
                self.warn(TjaWarning::HeaderInChart(name.into()));
                Ok(())
            }
            Status::Skipping => Ok(()),
        }
    }

    fn read_metadata(
        &mut self,
        name: &str,
        value: &str,
    ) -> core::result::Result<(), ValueError> {
        if value.is_empty() {
            return Ok(());
        }
        let metadata = &mut self.metadata;
        match name {
            "TITLE" => metadata.title = value.into(),
            "TITLEJA" => metadata.title_ja = Some(value.into()),
            "SUBTITLE" => metadata.subtitle = value.into(),
            "SUBTITLEJA" => metadata.subtitle_ja = Some(value.into()),
            "BPM" => metadata.bpm = parse_non_zero(name, value)?,
            "OFFSET" => metadata.offset = parse_number(name, value)?,
            "DEMOSTART" => metadata.demo_start = parse_number(name, value)?,
            "WAVE" => metadata.wave = value.into(),
            _ => {}
        }
        Ok(())
    }

    fn start_course(&mut self, value: &str) -> Result<()> {
        self.course = value
            .parse()
            .map_err(|err: ValueError| err.at_line(self.line))?;
        self.branch = BranchKind::Normal;
        self.param = TimingParam::new(self.metadata.bpm, self.metadata.chart_start_time());
        self.backup = self.param;
        self.section = Section::default();
        self.measure.clear();
        self.long_note = None;
        self.changes = PendingChanges::default();
        self.courses[self.course.index()].get_or_insert_with(Vec::new);
        Ok(())
    }

    fn start_chart(&mut self, player: Option<String>) {
        if let Some(player) = player {
            self.warn(TjaWarning::UnsupportedPlayer {
                course: self.course,
                player,
            });
            self.status = Status::Skipping;
            return;
        }
        self.status = Status::CourseChart;
        self.buffer_command(Directive::Start { player: None }, false);
    }

    fn end_chart(&mut self) {
        if self.long_note.take().is_some() {
            self.warn(TjaWarning::UnclosedLongNote);
        }
        if !self.measure.is_empty() {
            log::debug!("discarded the measure not closed by `,` at line {}", self.line);
        }
        self.measure.clear();
        self.flush_section();
        self.status = Status::CourseMetadata;
    }

    fn buffer_command(&mut self, directive: Directive, closes_measure: bool) {
        if matches!(directive, Directive::Start { .. }) {
            // Every chart begins with the tempo written as a timing point.
            self.measure
                .push_command(Directive::BpmChange(self.param.bpm));
        }
        self.measure.push_command(directive);
        if closes_measure {
            self.buffer_notes("0,");
        }
    }

    fn buffer_notes(&mut self, notes: &str) {
        if let Some((items, chars)) = self.measure.push_notes(notes) {
            self.process_measure(items, chars);
        }
    }

    fn flush_section(&mut self) {
        let section = mem::take(&mut self.section);
        self.courses[self.course.index()]
            .get_or_insert_with(Vec::new)
            .push(section);
    }

    fn process_measure(&mut self, items: Vec<MeasureItem>, chars: usize) {
        // A fractional measure cannot be expressed without its own timing point.
        if !self.param.meter.is_whole_beats() {
            self.changes.uninherited = true;
        }
        for item in items {
            match item {
                MeasureItem::Command(directive) => self.apply(directive),
                MeasureItem::Notes(notes) => {
                    if self.scan_notes(&notes, chars).is_break() {
                        break;
                    }
                }
            }
        }
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Start { .. } => self.section = Section::default(),
            Directive::End => {}
            Directive::Delay(ms) => self.param.time += ms,
            Directive::BpmChange(bpm) => {
                self.param.set_bpm(bpm);
                self.changes.uninherited = true;
            }
            Directive::Measure(meter) => {
                self.param.set_meter(meter);
                self.changes.uninherited = true;
            }
            Directive::Scroll(scroll) => {
                self.param.scroll = scroll;
                self.changes.inherited = true;
            }
            Directive::GogoStart => {
                self.param.gogo = true;
                self.changes.inherited = true;
            }
            Directive::GogoEnd => {
                self.param.gogo = false;
                self.changes.inherited = true;
            }
            Directive::BarlineOff => {
                self.param.barline = false;
                self.changes.uninherited = true;
            }
            Directive::BarlineOn => {
                self.param.barline = true;
                self.changes.uninherited = true;
            }
            Directive::BranchStart => {
                self.branch = BranchKind::Normal;
                self.backup = self.param;
                self.flush_section();
            }
            Directive::Branch(branch) => {
                self.branch = branch;
                self.metadata.branches[branch.index()] = true;
                self.param = self.backup;
                self.section.branch_mut(branch);
            }
            Directive::BranchEnd => {
                self.branch = BranchKind::Normal;
                // Branches may have drifted in time, keep the time reached.
                self.param = self.backup.restored_at(self.param.time);
                self.flush_section();
            }
            Directive::Other(name) => {
                log::debug!("ignored command `{name}` in the measure closed at line {}", self.line);
            }
        }
    }

    /// Writes the pending timing changes of the current branch.
    #[allow(clippy::float_cmp)]
    fn emit_timing_points(&mut self) {
        let PendingChanges {
            uninherited,
            inherited,
        } = mem::take(&mut self.changes);
        let param = &self.param;
        let events = self.section.branch_mut(self.branch);
        let time = param.time as i64;
        let meter = param.meter.beat_count();
        if uninherited {
            events.timing_points.push(TimingPoint {
                time,
                beat_length: round_hundredths(60000.0 / param.bpm),
                meter,
                uninherited: true,
                effects: u8::from(param.gogo) * 8 + u8::from(param.barline),
            });
        }
        if inherited || (uninherited && param.scroll != 1.0) {
            events.timing_points.push(TimingPoint {
                time,
                beat_length: round_hundredths(-100.0 / param.scroll),
                meter,
                uninherited: false,
                effects: u8::from(param.gogo),
            });
        }
    }

    /// Scans a line of note characters, and breaks when the measure separator is reached.
    fn scan_notes(&mut self, notes: &str, chars: usize) -> ControlFlow<()> {
        self.emit_timing_points();
        if chars == 0 {
            self.param.time += self.param.measure_duration();
            return ControlFlow::Break(());
        }
        let step = self.param.time_per_char(chars);
        let slide_step = self.param.slide_length_per_char(chars);
        let events = self.section.branch_mut(self.branch);
        for c in notes.chars() {
            if let Some(note) = self.long_note.as_mut().filter(|note| note.is_slide()) {
                note.length += slide_step;
            }
            let time = self.param.time;
            let circle = |kind| HitObject::Circle {
                time: time as i64,
                kind,
            };
            match c {
                '1' => events.hit_objects.push(circle(CircleKind::Don)),
                '2' => events.hit_objects.push(circle(CircleKind::Ka)),
                '3' => events.hit_objects.push(circle(CircleKind::BigDon)),
                '4' => events.hit_objects.push(circle(CircleKind::BigKa)),
                '5' => self.long_note = Some(LongNote::open(LongNoteKind::Slide, time)),
                '6' => self.long_note = Some(LongNote::open(LongNoteKind::BigSlide, time)),
                '7' | '9' => self.long_note = Some(LongNote::open(LongNoteKind::Balloon, time)),
                '8' => {
                    if let Some(note) = self.long_note.take() {
                        match note.close(time, step) {
                            Some(object) => events.hit_objects.push(object),
                            None => self.warnings.push(
                                TjaWarning::SliderOutOfRange {
                                    time: note.start as i64,
                                }
                                .at_line(self.line),
                            ),
                        }
                    }
                }
                ',' => return ControlFlow::Break(()),
                _ => {}
            }
            self.param.time += step;
        }
        ControlFlow::Continue(())
    }
}

/// Interprets the lines of a TJA file.
///
/// # Errors
///
/// Returns [`TjaError`] on the first malformed number or course name, which fails the whole file.
pub fn interpret<I, S>(lines: I) -> Result<TjaOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut interpreter = Interpreter::new();
    for (idx, line) in lines.into_iter().enumerate() {
        interpreter.feed(idx + 1, line.as_ref())?;
    }
    Ok(interpreter.finish())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn chart_interpreter(header: &str) -> Interpreter {
        let mut interpreter = Interpreter::new();
        for (idx, line) in header.lines().enumerate() {
            interpreter.feed(idx + 1, line).unwrap();
        }
        interpreter
    }

    #[test]
    fn empty_measure_advances_whole_measure() {
        let mut interpreter = chart_interpreter("BPM:150\nCOURSE:Oni\n#START\n,");
        let before = interpreter.param.time;
        let objects_before = interpreter
            .section
            .branch(BranchKind::Normal)
            .map_or(0, |events| events.hit_objects.len());

        interpreter.process_measure(vec![MeasureItem::Notes(",".into())], 0);

        assert_eq!(interpreter.param.time, before + 1600.0);
        assert_eq!(
            interpreter
                .section
                .branch(BranchKind::Normal)
                .map_or(0, |events| events.hit_objects.len()),
            objects_before
        );
    }

    #[test]
    fn backup_is_independent() {
        let mut interpreter =
            chart_interpreter("BPM:120\nCOURSE:Oni\n#START\n1,\n#BRANCHSTART p,0,0\n#E\n#SCROLL 2\n#BPMCHANGE 60\n1,");
        assert_eq!(interpreter.backup.scroll, 1.0);
        assert_eq!(interpreter.backup.bpm, 120.0);
        interpreter.feed(10, "#M").unwrap();
        interpreter.feed(11, "1,").unwrap();
        assert_eq!(interpreter.param.bpm, 120.0);
        assert_eq!(interpreter.param.scroll, 1.0);
    }

    #[test]
    fn branch_end_keeps_time() {
        let mut interpreter = chart_interpreter(
            "BPM:120\nCOURSE:Oni\n#START\n#BRANCHSTART p,0,0\n#N\n1,\n#E\n#BPMCHANGE 240\n1,\n#BRANCHEND\n,",
        );
        // The expert branch reached -25 + 1000 ms, then the restored tempo takes the last measure.
        assert_eq!(interpreter.param.bpm, 120.0);
        assert_eq!(interpreter.param.time, -25.0 + 1000.0 + 2000.0);
        interpreter.feed(12, "#END").unwrap();
        let output = interpreter.finish();
        assert_eq!(output.chart.course(CourseKind::Oni).map(<[_]>::len), Some(3));
    }

    #[test]
    fn style_double_skips_course() {
        let interpreter = chart_interpreter("COURSE:Oni\nSTYLE:Double\n#START P1\n1,\n#END");
        let output = interpreter.finish();
        assert_eq!(output.chart.course(CourseKind::Oni), Some(&[][..]));
        assert_eq!(
            output.warnings,
            vec![
                TjaWarning::UnsupportedStyle {
                    course: CourseKind::Oni,
                    style: "Double".into(),
                }
                .at_line(2)
            ]
        );
    }
}
