use pretty_assertions::assert_eq;

use tja2osu::prelude::*;

fn hit_lines(stream: &BranchStream) -> Vec<String> {
    stream.hit_objects.iter().map(ToString::to_string).collect()
}

#[test]
fn test_branched_sections() {
    let source = include_str!("files/branched.tja");
    let TjaOutput { chart, warnings } = parse_tja(source).expect("must be parsed");
    assert_eq!(warnings, vec![]);
    assert!(
        BranchKind::ALL
            .into_iter()
            .all(|branch| chart.metadata.has_branch(branch))
    );

    let sections = chart.course(CourseKind::Oni).expect("oni must be defined");
    assert_eq!(sections.len(), 4);
    let written = |section: &Section| {
        BranchKind::ALL
            .into_iter()
            .filter(|&branch| section.branch(branch).is_some())
            .collect::<Vec<_>>()
    };
    assert_eq!(written(&sections[0]), vec![BranchKind::Normal]);
    assert_eq!(
        written(&sections[1]),
        vec![BranchKind::Normal, BranchKind::Expert, BranchKind::Master]
    );
    assert_eq!(written(&sections[2]), vec![BranchKind::Normal]);
    // `#E` alone leaves the normal branch absent.
    assert_eq!(written(&sections[3]), vec![BranchKind::Expert]);
}

#[test]
fn test_missing_normal_is_reconstructed() {
    let source = include_str!("files/branched.tja");
    let TjaOutput { chart, .. } = parse_tja(source).expect("must be parsed");
    let streams = materialize(&chart);
    let [normal, expert, master] = streams[CourseKind::Oni.index()]
        .clone()
        .expect("oni must be materialized");

    let normal = normal.expect("normal must be present");
    assert_eq!(
        hit_lines(&normal),
        vec![
            "256,192,-25,1,0,0:0:0:0:",
            "256,192,1975,1,0,0:0:0:0:",
            "256,192,3975,1,0,0:0:0:0:",
            "256,192,5975,1,12,0:0:0:0:",
        ]
    );
    assert_eq!(
        hit_lines(&expert.expect("expert must be present")),
        vec![
            "256,192,-25,1,0,0:0:0:0:",
            "256,192,1975,1,2,0:0:0:0:",
            "256,192,3975,1,0,0:0:0:0:",
            "256,192,5975,1,12,0:0:0:0:",
        ]
    );
    assert_eq!(
        hit_lines(&master.expect("master must be present")),
        vec![
            "256,192,-25,1,0,0:0:0:0:",
            "256,192,1975,1,4,0:0:0:0:",
            "256,192,3975,1,0,0:0:0:0:",
            "256,192,5975,1,12,0:0:0:0:",
        ]
    );
    assert_eq!(
        normal
            .timing_points
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["-25,500.0,4,1,0,100,1,1"]
    );
}

#[test]
fn test_export_policy() {
    let source = include_str!("files/branched.tja");
    let TjaOutput { chart, .. } = parse_tja(source).expect("must be parsed");
    let beatmaps = render_beatmaps(&chart);
    assert_eq!(
        beatmaps
            .iter()
            .map(|beatmap| beatmap.file_name.as_str())
            .collect::<Vec<_>>(),
        vec![
            "Branched [Futsuu] [Master].osu",
            "Branched [Oni] [Normal].osu",
            "Branched [Oni] [Expert].osu",
            "Branched [Oni] [Master].osu",
        ]
    );

    let futsuu = &beatmaps[0];
    assert_eq!(
        (futsuu.course, futsuu.branch),
        (CourseKind::Futsuu, BranchKind::Master)
    );
    assert!(futsuu.text.contains("AudioFilename: branched.ogg\n"));
    assert!(futsuu.text.contains("Version: Futsuu Master\n"));
    assert!(
        futsuu
            .text
            .ends_with("[TimingPoints]\n\n\n[HitObjects]\n256,192,-25,1,4,0:0:0:0:")
    );
}

#[test]
fn test_branch_state_is_restored() {
    // The expert branch runs at double tempo, but the branches after `#BRANCHEND` start from the time it reached.
    let source = "BPM:120
COURSE:Oni
#START
#BRANCHSTART p,0,0
#N
1,
#E
#BPMCHANGE 240
#SCROLL 2
1,
#BRANCHEND
1,
#END
";
    let TjaOutput { chart, .. } = parse_tja(source).expect("must be parsed");
    let sections = chart.course(CourseKind::Oni).expect("oni must be defined");
    let expert = sections[1]
        .branch(BranchKind::Expert)
        .expect("expert must be written");
    assert_eq!(
        expert
            .timing_points
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["-25,250.0,4,1,0,100,1,1", "-25,-50.0,4,1,0,100,0,0"]
    );
    let after = sections[2]
        .branch(BranchKind::Normal)
        .expect("normal must be written after the branches");
    assert_eq!(after.hit_objects[0].time(), 975);
}
