//! Flattening the sections of each course into one stream per branch.

use crate::tja::{
    command::{BranchKind, CourseKind},
    model::{Chart, Section},
};

use super::{HitObject, TimingPoint};

/// The flat events of a branch of a course.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchStream {
    /// Timing points in section order.
    pub timing_points: Vec<TimingPoint>,
    /// Hit objects in section order.
    pub hit_objects: Vec<HitObject>,
}

/// Streams of a course, indexed by [`BranchKind::index`]. `None` if the branch has no hit objects.
pub type CourseStreams = [Option<BranchStream>; 3];

/// Flattens the sections of a course.
///
/// A course with a single section is not branched, so its missing branches stay missing. Otherwise, a
/// section missing a branch lends the events of another branch (see [`Section::resolve`]).
#[must_use]
pub fn materialize_course(sections: &[Section]) -> CourseStreams {
    let unbranched = sections.len() == 1;
    BranchKind::ALL.map(|branch| {
        let mut stream = BranchStream::default();
        for section in sections {
            let events = if unbranched {
                section.branch(branch)
            } else {
                section.resolve(branch)
            };
            let Some(events) = events else {
                continue;
            };
            stream
                .timing_points
                .extend(events.timing_points.iter().cloned());
            stream.hit_objects.extend(events.hit_objects.iter().cloned());
        }
        (!stream.hit_objects.is_empty()).then_some(stream)
    })
}

/// Flattens every course of the chart, indexed by [`CourseKind::index`]. `None` if the course has no sections.
#[must_use]
pub fn materialize(chart: &Chart) -> [Option<CourseStreams>; 5] {
    CourseKind::ALL.map(|course| {
        chart
            .course(course)
            .filter(|sections| !sections.is_empty())
            .map(materialize_course)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::osu::CircleKind;

    fn don(time: i64) -> HitObject {
        HitObject::Circle {
            time,
            kind: CircleKind::Don,
        }
    }

    fn section_with(branches: &[(BranchKind, i64)]) -> Section {
        let mut section = Section::default();
        for &(branch, time) in branches {
            section.branch_mut(branch).hit_objects.push(don(time));
        }
        section
    }

    #[test]
    fn single_section_has_no_fallback() {
        let streams = materialize_course(&[section_with(&[(BranchKind::Normal, 0)])]);
        assert_eq!(
            streams,
            [
                Some(BranchStream {
                    timing_points: vec![],
                    hit_objects: vec![don(0)],
                }),
                None,
                None,
            ]
        );
    }

    #[test]
    fn missing_branches_borrow() {
        let sections = [
            section_with(&[(BranchKind::Normal, 0)]),
            section_with(&[
                (BranchKind::Normal, 10),
                (BranchKind::Expert, 11),
                (BranchKind::Master, 12),
            ]),
            section_with(&[(BranchKind::Expert, 21)]),
        ];
        let [normal, expert, master] = materialize_course(&sections);
        assert_eq!(normal.unwrap().hit_objects, vec![don(0), don(10), don(21)]);
        assert_eq!(expert.unwrap().hit_objects, vec![don(0), don(11), don(21)]);
        assert_eq!(master.unwrap().hit_objects, vec![don(0), don(12), don(21)]);
    }

    #[test]
    fn empty_branch_is_absent() {
        let mut only_timing = Section::default();
        only_timing.branch_mut(BranchKind::Normal);
        let streams = materialize_course(&[only_timing.clone(), only_timing]);
        assert_eq!(streams, [None, None, None]);
    }
}
