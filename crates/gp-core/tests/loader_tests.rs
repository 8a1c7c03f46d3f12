use gp_core::data::{DataError, TableKind};
use gp_core::projection::{Interval, ProjectionPlan, project};
use gp_core::{Dataset, PlannerOptions, Stat};

const CHARACTERS: &str = "キャラ名,カテゴリ,HP,力,魔力,技,速さ,幸運,守備,魔防\n\
    ジョーカー,暗夜,50,35,15,40,35,45,25,25\n\
    フェリシア,暗夜,40,10,35,30,40,55,15,35\n";

const CLASSES: &str = "クラス名,HP,力,魔力,技,速さ,幸運,守備,魔防\n\
    バトラー,0,10,5,15,15,15,5,10\n\
    ソシアルナイト,10,15,0,10,10,15,10,15\n";

const BASES: &str = "クラス名,HP,力,魔力,技,速さ,幸運,守備,魔防\n\
    バトラー,17,7,2,8,6,4,5,4\n\
    ソシアルナイト,17,6,0,5,5,3,5,3\n";

const CAPS: &str = "クラス名,HP,力,魔力,技,速さ,幸運,守備,魔防\n\
    バトラー,55,33,28,35,33,40,29,32\n\
    ソシアルナイト,60,34,28,35,33,35,33,34\n";

const STARTS: &str = "キャラ名,クラス名,レベル,HP,力,魔力,技,速さ,幸運,守備,魔防\n\
    ジョーカー,バトラー,1,19,7,4,9,7,5,7,7\n";

fn write_dir(with_optional: bool) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("characters.csv"), CHARACTERS).unwrap();
    std::fs::write(dir.path().join("classes.csv"), CLASSES).unwrap();
    if with_optional {
        std::fs::write(dir.path().join("class_bases.csv"), BASES).unwrap();
        std::fs::write(dir.path().join("class_caps.csv"), CAPS).unwrap();
        std::fs::write(dir.path().join("character_bases.csv"), STARTS).unwrap();
    }
    dir
}

#[test]
fn test_load_dir_with_all_sheets() {
    let dir = write_dir(true);
    let data = Dataset::load_dir(dir.path()).unwrap();

    assert_eq!(data.characters().len(), 2);
    assert_eq!(data.class_names().collect::<Vec<_>>(), ["バトラー", "ソシアルナイト"]);
    assert_eq!(data.class("ソシアルナイト").unwrap().cap[Stat::Hp], 60);
    assert_eq!(data.base_stats("ジョーカー").unwrap().class, "バトラー");
}

#[test]
fn test_load_dir_optional_sheets_missing() {
    let dir = write_dir(false);
    let data = Dataset::load_dir(dir.path()).unwrap();
    assert!(data.base_stats("ジョーカー").is_none());
    assert_eq!(data.class("バトラー").unwrap().base[Stat::Hp], 0);
}

#[test]
fn test_load_dir_requires_characters() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("classes.csv"), CLASSES).unwrap();
    assert!(matches!(
        Dataset::load_dir(dir.path()),
        Err(DataError::Io { .. })
    ));
}

#[test]
fn test_duplicate_class_row() {
    let dir = write_dir(false);
    let doubled = format!("{CLASSES}バトラー,0,0,0,0,0,0,0,0\n");
    std::fs::write(dir.path().join("classes.csv"), doubled).unwrap();
    match Dataset::load_dir(dir.path()) {
        Err(DataError::Duplicate { table, name }) => {
            assert_eq!(table, TableKind::Classes);
            assert_eq!(name, "バトラー");
        }
        other => panic!("expected duplicate error, got {other:?}"),
    }
}

#[test]
fn test_route_with_class_change_from_loaded_sheets() {
    let dir = write_dir(true);
    let data = Dataset::load_dir(dir.path()).unwrap();
    let plan = ProjectionPlan::new("ジョーカー")
        .with_interval(Interval::new(1, 11, "バトラー"))
        .with_interval(Interval::new(1, 21, "ソシアルナイト"));
    let result = project(&data, &plan, &PlannerOptions::default()).unwrap();

    // HP: 19 + 50% * 10 + (17 - 17) + 60% * 20 = 36
    assert!((result.raw[Stat::Hp] - 36.0).abs() < 1e-9);
    // Str: 7 + 45% * 10 + (6 - 7) + 50% * 20 = 20.5
    assert!((result.raw[Stat::Strength] - 20.5).abs() < 1e-9);
    assert_eq!(result.final_class, "ソシアルナイト");
    assert_eq!(result.final_level, 21);
    assert_eq!(result.steps.len(), 2);
    assert!(result.steps[0].class_change.is_none());
    assert!(result.steps[1].class_change.is_some());
}
