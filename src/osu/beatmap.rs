//! Rendering the streams into `.osu` documents.

use std::fmt;

use itertools::Itertools;

use crate::tja::{
    command::{BranchKind, CourseKind},
    model::{Chart, Metadata},
};

use super::{
    SLIDER_MULTIPLIER,
    materialize::{BranchStream, CourseStreams, materialize},
};

/// Characters which cannot be used in file names on some platforms.
const ILLEGAL_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// A beatmap of a branch of a course, which is formatted into the `.osu` document by [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct Beatmap<'a> {
    /// The chart metadata.
    pub metadata: &'a Metadata,
    /// The course of the beatmap.
    pub course: CourseKind,
    /// The branch of the beatmap.
    pub branch: BranchKind,
    /// The events to be written.
    pub stream: &'a BranchStream,
}

impl Beatmap<'_> {
    /// `[course] [branch]`, the difficulty name in osu!.
    #[must_use]
    pub fn version(&self) -> String {
        format!("{} {}", self.course, self.branch)
    }

    /// `{title} [{course}] [{branch}].osu` without characters illegal in file names.
    #[must_use]
    pub fn file_name(&self) -> String {
        let name = format!(
            "{} [{}] [{}].osu",
            self.metadata.title, self.course, self.branch
        );
        name.replace(ILLEGAL_FILE_NAME_CHARS, "")
    }
}

impl fmt::Display for Beatmap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metadata = self.metadata;
        write!(
            f,
            r"osu file format v14

[General]
AudioFilename: {wave}
AudioLeadIn: 0
PreviewTime: {preview}
Countdown: 0
SampleSet: Normal
StackLeniency: 0.7
Mode: 1
LetterboxInBreaks: 0
WidescreenStoryboard: 0

[Editor]
DistanceSpacing: 0.8
BeatDivisor: 7
GridSize: 32
TimelineZoom: 1

[Metadata]
Title: {title}
TitleUnicode: {title_unicode}
Artist: Unknown
ArtistUnicode: Unknown
Creator: Unknown
Version: {version}
Source:
Tags: tja
BeatmapID:0
BeatmapSetID:-1

[Difficulty]
HPDrainRate:5
CircleSize:5
OverallDifficulty:9
ApproachRate:5
SliderMultiplier:{SLIDER_MULTIPLIER}
SliderTickRate:1

[Events]
//Background and Video events
//Break Periods
//Storyboard Layer 0 (Background)
//Storyboard Layer 1 (Fail)
//Storyboard Layer 2 (Pass)
//Storyboard Layer 3 (Foreground)
//Storyboard Layer 4 (Overlay)
//Storyboard Sound Samples",
            wave = metadata.wave,
            preview = (metadata.demo_start * 1000.0) as i64,
            title = metadata.title,
            title_unicode = metadata.unicode_title(),
            version = self.version(),
        )?;
        write!(
            f,
            "\n\n[TimingPoints]\n{}\n\n[HitObjects]\n{}",
            self.stream.timing_points.iter().join("\n"),
            self.stream.hit_objects.iter().join("\n"),
        )
    }
}

/// Branches of the course to be exported.
///
/// Oni and Inner Oni export every branch. The lower courses export only the master branch if it exists,
/// otherwise only the normal branch.
pub fn exported_branches(
    course: CourseKind,
    streams: &CourseStreams,
) -> impl Iterator<Item = (BranchKind, &BranchStream)> {
    let has_master = streams[BranchKind::Master.index()].is_some();
    BranchKind::ALL
        .into_iter()
        .filter(move |&branch| {
            course.exports_all_branches()
                || branch
                    == if has_master {
                        BranchKind::Master
                    } else {
                        BranchKind::Normal
                    }
        })
        .filter_map(move |branch| {
            streams[branch.index()]
                .as_ref()
                .map(|stream| (branch, stream))
        })
}

/// A rendered `.osu` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBeatmap {
    /// The course of the beatmap.
    pub course: CourseKind,
    /// The branch of the beatmap.
    pub branch: BranchKind,
    /// The file name to be saved as.
    pub file_name: String,
    /// The document text.
    pub text: String,
}

/// Materializes the chart and renders every exported beatmap.
#[must_use]
pub fn render_beatmaps(chart: &Chart) -> Vec<RenderedBeatmap> {
    let streams = materialize(chart);
    CourseKind::ALL
        .into_iter()
        .filter_map(|course| {
            streams[course.index()]
                .as_ref()
                .map(|streams| (course, streams))
        })
        .flat_map(|(course, streams)| {
            exported_branches(course, streams).map(move |(branch, stream)| {
                let beatmap = Beatmap {
                    metadata: &chart.metadata,
                    course,
                    branch,
                    stream,
                };
                RenderedBeatmap {
                    course,
                    branch,
                    file_name: beatmap.file_name(),
                    text: beatmap.to_string(),
                }
            })
        })
        .collect()
}
