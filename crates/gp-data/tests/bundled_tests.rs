use gp_core::data::TableKind;
use gp_core::growth::{GrowthQuery, Trait, compose};
use gp_core::inheritance::Parents;
use gp_core::projection::{Interval, ProjectionPlan, project};
use gp_core::{ExpectedStats, PlannerOptions, Stat};
use gp_data::{bundled_dataset, sheet};

#[test]
fn test_bundled_dataset_parses() {
    let data = bundled_dataset().unwrap();
    assert!(data.characters().len() >= 10);
    let categories: Vec<_> = data.categories().collect();
    assert_eq!(categories, ["主人公", "暗夜", "白夜", "子世代"]);
}

#[test]
fn test_every_start_row_is_usable() {
    let data = bundled_dataset().unwrap();
    let options = PlannerOptions::default();
    for name in data.character_names() {
        if data.base_stats(name).is_some() {
            let result = project(&data, &ProjectionPlan::new(name), &options).unwrap();
            assert_eq!(result.raw, ExpectedStats::from(result.start.stats));
        }
    }
}

#[test]
fn test_avatar_breakdown() {
    let data = bundled_dataset().unwrap();
    let query = GrowthQuery::new("カムイ")
        .with_class("ダークプリンス")
        .with_traits(Trait::new(Some(Stat::Speed), Some(Stat::Luck)));
    let breakdown = compose(&data, &query, &PlannerOptions::default()).unwrap();
    // 45 + 10 + 15
    assert_eq!(breakdown.total()[Stat::Speed], 70);
    // 45 + 10 - 15
    assert_eq!(breakdown.total()[Stat::Luck], 40);
}

#[test]
fn test_child_with_parent_route() {
    let data = bundled_dataset().unwrap();
    let query = GrowthQuery::new("ジークベルト").with_parent("マークス");
    let breakdown = compose(&data, &query, &PlannerOptions::default()).unwrap();
    assert_eq!(breakdown.parent[Stat::Luck], 30);

    let plan = ProjectionPlan::new("ジョーカー").with_interval(Interval::new(1, 20, "バトラー"));
    let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
    assert!(result.capped[Stat::Skill] <= 35.0);
}

#[test]
fn test_sheets_share_header_shape() {
    for kind in [TableKind::Classes, TableKind::ClassBases, TableKind::ClassCaps] {
        assert!(sheet(kind).starts_with("クラス名,HP,力,魔力,技,速さ,幸運,守備,魔防"));
    }
}

#[test]
fn test_fixed_parent_raises_starting_stats() {
    let data = bundled_dataset().unwrap();
    let options = PlannerOptions::default();
    let variable_only = ProjectionPlan::new("カムイ").with_parents(Parents::variable("マークス"));
    let both = ProjectionPlan::new("カムイ")
        .with_parents(Parents::variable("マークス").with_fixed("リョウマ"));

    let base = project(&data, &variable_only, &options).unwrap();
    assert_eq!(base.inherited, None);

    let result = project(&data, &both, &options).unwrap();
    // HP: 19 + (38 + 36 - 38) / 4
    assert_eq!(result.start.stats[Stat::Hp], 28);
    // Mag: parents below the child, no bonus
    assert_eq!(result.inherited.map(|bonus| bonus[Stat::Magic]), Some(0));
    assert_ne!(result.raw, base.raw);
}

#[test]
fn test_every_child_unit_projects() {
    let data = bundled_dataset().unwrap();
    let options = PlannerOptions::default();
    for child in data.characters_in("子世代").unwrap() {
        let plan = ProjectionPlan::new(child.as_str())
            .with_parents(Parents::variable("ジョーカー").with_fixed("カムイ"))
            .with_interval(Interval::new(10, 20, "ソシアルナイト"));
        let result = project(&data, &plan, &options).unwrap();
        assert!(result.inherited.is_some());
        assert_eq!(result.final_level, 20);
    }
}
