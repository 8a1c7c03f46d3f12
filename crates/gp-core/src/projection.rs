//! Expected-stat projection along a leveling route
//!
//! A route is a list of intervals, each a span of level-ups spent in one
//! class. A child unit with both parents' stats known first gets its
//! inherited starting bonus, capped by the start class. Walking the route
//! from the starting stats:
//!
//! 1. entering an interval in a different class applies the class-change
//!    delta `base(new) - base(current)`;
//! 2. the interval then adds `growth% * (end - start) / 100` to each stat,
//!    where growth is personal + parent bonus + class growth + boon/bane,
//!    floored at zero.
//!
//! Caps of the final class are applied to the reported result only; the raw
//! values are kept alongside.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{DataError, Dataset};
use crate::growth::{GrowthBreakdown, Trait};
use crate::inheritance::{self, ParentStats, Parents};
use crate::options::PlannerOptions;
use crate::stats::{ExpectedStats, StatLine};

/// Projection errors
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Invalid levels {start}-{end}: need 1 <= start <= end <= {max}")]
    InvalidLevels { start: u32, end: u32, max: u32 },

    #[error("No starting stats known for {0}; give a start class, level and stats")]
    MissingStart(String),

    #[error("Cannot parse interval '{0}' (expected START-END:CLASS)")]
    Parse(String),
}

/// A span of level-ups spent in one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start_level: u32,
    pub end_level: u32,
    pub class: String,
}

impl Interval {
    pub fn new(start_level: u32, end_level: u32, class: impl Into<String>) -> Self {
        Self {
            start_level,
            end_level,
            class: class.into(),
        }
    }

    /// Number of level-ups in the interval
    pub fn levels(&self) -> u32 {
        self.end_level.saturating_sub(self.start_level)
    }

    fn validate(&self, max_level: u32) -> Result<(), ProjectionError> {
        check_levels(self.start_level, self.end_level, max_level)
    }
}

impl FromStr for Interval {
    type Err = ProjectionError;

    /// Parse `START-END:CLASS`, e.g. `1-20:Cavalier`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || ProjectionError::Parse(s.to_string());
        let (levels, class) = s.split_once(':').ok_or_else(parse_err)?;
        let (start, end) = levels.split_once('-').ok_or_else(parse_err)?;
        let class = class.trim();
        if class.is_empty() {
            return Err(parse_err());
        }
        Ok(Self::new(
            start.trim().parse().map_err(|_| parse_err())?,
            end.trim().parse().map_err(|_| parse_err())?,
            class,
        ))
    }
}

fn check_levels(start: u32, end: u32, max: u32) -> Result<(), ProjectionError> {
    if start == 0 || start > end || end > max {
        return Err(ProjectionError::InvalidLevels { start, end, max });
    }
    Ok(())
}

/// Where the route begins: class, level and displayed stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPoint {
    pub class: String,
    pub level: u32,
    pub stats: StatLine,
}

/// A unit plus the route to project
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectionPlan {
    pub character: String,
    /// Explicit start; falls back to the dataset's recruitment stats
    pub start: Option<StartPoint>,
    pub parents: Parents,
    /// Parents' stats for inherited starting stats; falls back to their
    /// recruitment rows when both parents are named
    pub parent_stats: Option<ParentStats>,
    pub traits: Trait,
    pub intervals: Vec<Interval>,
}

impl ProjectionPlan {
    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            ..Self::default()
        }
    }

    pub fn with_start(mut self, start: StartPoint) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_parents(mut self, parents: Parents) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_parent_stats(mut self, stats: ParentStats) -> Self {
        self.parent_stats = Some(stats);
        self
    }

    pub fn with_traits(mut self, traits: Trait) -> Self {
        self.traits = traits;
        self
    }

    pub fn push(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.push(interval);
        self
    }
}

/// What one interval did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTrace {
    pub interval: Interval,
    /// Class-change delta applied before leveling, if the class changed
    pub class_change: Option<StatLine>,
    /// Effective growth used for the interval
    pub growth: StatLine,
    /// Raw expected stats after the interval
    pub after: ExpectedStats,
}

/// Result of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub character: String,
    /// Starting point, inherited bonus included
    pub start: StartPoint,
    /// Starting bonus from the parents after caps
    pub inherited: Option<StatLine>,
    pub final_class: String,
    pub final_level: u32,
    /// Expected stats without caps
    pub raw: ExpectedStats,
    /// Expected stats limited by the final class's caps
    pub capped: ExpectedStats,
    pub steps: Vec<StepTrace>,
}

/// Walk a plan and return the expected stats at its end
pub fn project(
    dataset: &Dataset,
    plan: &ProjectionPlan,
    options: &PlannerOptions,
) -> Result<Projection, ProjectionError> {
    let character = dataset.character(&plan.character)?;

    let mut start = match &plan.start {
        Some(start) => start.clone(),
        None => {
            let entry = dataset
                .base_stats(&character.name)
                .ok_or_else(|| ProjectionError::MissingStart(character.name.clone()))?;
            StartPoint {
                class: entry.class.clone(),
                level: entry.level,
                stats: entry.stats,
            }
        }
    };
    check_levels(start.level, start.level, options.max_level)?;
    for interval in &plan.intervals {
        interval.validate(options.max_level)?;
    }

    let parent = inheritance::growth_bonus(dataset, &plan.parents)?;
    let traits = if options.is_avatar(&character.name) {
        plan.traits.bonus()
    } else {
        StatLine::zero()
    };

    let mut current = dataset.class(&start.class)?;

    let parent_stats = plan
        .parent_stats
        .or_else(|| inheritance::recruitment_stats(dataset, &plan.parents));
    let inherited = parent_stats.map(|parents| {
        let stats = inheritance::inherit_start(
            &start.stats,
            &parents.variable,
            &parents.fixed,
            &current.cap,
        );
        let bonus = stats - start.stats;
        start.stats = stats;
        bonus
    });
    if let Some(bonus) = &inherited {
        tracing::debug!(
            character = %character.name,
            bonus = bonus.sum(),
            "inherited starting stats"
        );
    }
    let mut stats = ExpectedStats::from(start.stats);
    let mut steps = Vec::with_capacity(plan.intervals.len());

    for interval in &plan.intervals {
        let class = dataset.class(&interval.class)?;
        let class_change = if class.name != current.name {
            let delta = class.base - current.base;
            stats.add_offset(&delta);
            tracing::debug!(from = %current.name, to = %class.name, "class change");
            current = class;
            Some(delta)
        } else {
            None
        };

        let growth = GrowthBreakdown {
            personal: character.growth,
            parent,
            class: class.growth,
            traits,
        }
        .effective();
        stats.add_scaled(&growth, interval.levels());

        steps.push(StepTrace {
            interval: interval.clone(),
            class_change,
            growth,
            after: stats,
        });
    }

    let final_level = plan
        .intervals
        .last()
        .map_or(start.level, |interval| interval.end_level);

    tracing::info!(
        character = %character.name,
        intervals = steps.len(),
        final_class = %current.name,
        final_level,
        "projection complete"
    );

    Ok(Projection {
        character: character.name.clone(),
        final_class: current.name.clone(),
        final_level,
        raw: stats,
        capped: stats.capped(&current.cap),
        start,
        inherited,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CharacterBaseEntry, CharacterEntry, ClassEntry};
    use crate::stats::Stat;

    fn dataset() -> Dataset {
        let mut data = Dataset::new();
        for name in ["Unit", "Corrin"] {
            data.add_character(CharacterEntry {
                name: name.to_string(),
                category: "test".to_string(),
                growth: StatLine::new([50, 40, 10, 30, 30, 20, 20, 10]),
            })
            .unwrap();
        }
        data.add_character(CharacterEntry {
            name: "Parent".to_string(),
            category: "test".to_string(),
            growth: StatLine::splat(41),
        })
        .unwrap();
        data.add_class(ClassEntry {
            name: "Fighter".to_string(),
            growth: StatLine::new([20, 20, 0, 5, 5, 0, 5, 0]),
            base: StatLine::new([19, 7, 0, 6, 6, 2, 4, 1]),
            cap: StatLine::new([40, 25, 15, 23, 21, 25, 23, 19]),
        })
        .unwrap();
        data.add_class(ClassEntry {
            name: "Hero".to_string(),
            growth: StatLine::new([20, 15, 0, 10, 10, 0, 10, 0]),
            base: StatLine::new([20, 8, 0, 10, 8, 3, 7, 3]),
            cap: StatLine::new([60, 30, 25, 32, 30, 30, 28, 25]),
        })
        .unwrap();
        for name in ["Unit", "Corrin"] {
            data.add_start(CharacterBaseEntry {
                name: name.to_string(),
                class: "Fighter".to_string(),
                level: 1,
                stats: StatLine::new([20, 8, 0, 6, 6, 2, 5, 1]),
            })
            .unwrap();
        }
        data
    }

    #[test]
    fn test_empty_route_returns_start() {
        let data = dataset();
        let result =
            project(&data, &ProjectionPlan::new("Unit"), &PlannerOptions::default()).unwrap();
        assert_eq!(result.raw, ExpectedStats::from(StatLine::new([20, 8, 0, 6, 6, 2, 5, 1])));
        assert_eq!(result.final_class, "Fighter");
        assert_eq!(result.final_level, 1);
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_single_interval_gain() {
        let data = dataset();
        let plan = ProjectionPlan::new("Unit").with_interval(Interval::new(1, 11, "Fighter"));
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        // 20 + (50 + 20) * 10 / 100
        assert_eq!(result.raw[Stat::Hp], 27.0);
        // 8 + 60 * 10 / 100
        assert_eq!(result.raw[Stat::Strength], 14.0);
        assert_eq!(result.steps[0].class_change, None);
        assert_eq!(result.final_level, 11);
    }

    #[test]
    fn test_class_change_applies_base_delta() {
        let data = dataset();
        let plan = ProjectionPlan::new("Unit").with_interval(Interval::new(1, 1, "Hero"));
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        // Skl: 6 + (10 - 6)
        assert_eq!(result.raw[Stat::Skill], 10.0);
        assert_eq!(
            result.steps[0].class_change,
            Some(StatLine::new([1, 1, 0, 4, 2, 1, 3, 2]))
        );
        assert_eq!(result.final_class, "Hero");
    }

    #[test]
    fn test_caps_of_final_class() {
        let data = dataset();
        let plan = ProjectionPlan::new("Unit").with_interval(Interval::new(1, 40, "Fighter"));
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        // 20 + 70 * 39 / 100 = 47.3, capped at 40
        assert!((result.raw[Stat::Hp] - 47.3).abs() < 1e-9);
        assert_eq!(result.capped[Stat::Hp], 40.0);
    }

    #[test]
    fn test_parent_bonus_added_to_growth() {
        let data = dataset();
        let plan = ProjectionPlan::new("Unit")
            .with_parents(Parents::variable("Parent"))
            .with_interval(Interval::new(1, 11, "Fighter"));
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        // 50 + 20 + 20
        assert_eq!(result.steps[0].growth[Stat::Hp], 90);
        assert_eq!(result.raw[Stat::Hp], 29.0);
        // 0 + (10 + 20) * 10 / 100
        assert_eq!(result.raw[Stat::Magic], 3.0);
        assert_eq!(result.inherited, None);
    }

    #[test]
    fn test_avatar_traits_applied() {
        let data = dataset();
        let traits = Trait::new(Some(Stat::Magic), Some(Stat::Luck));
        let plan = ProjectionPlan::new("Corrin")
            .with_traits(traits)
            .with_interval(Interval::new(1, 11, "Fighter"));
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        // 0 + (10 + 15) * 10 / 100
        assert_eq!(result.raw[Stat::Magic], 2.5);
        // 2 + (20 - 15) * 10 / 100
        assert_eq!(result.raw[Stat::Luck], 2.5);
    }

    #[test]
    fn test_non_avatar_traits_ignored() {
        let data = dataset();
        let traits = Trait::new(Some(Stat::Magic), Some(Stat::Luck));
        let with_traits = ProjectionPlan::new("Unit")
            .with_traits(traits)
            .with_interval(Interval::new(1, 11, "Fighter"));
        let without = ProjectionPlan::new("Unit").with_interval(Interval::new(1, 11, "Fighter"));
        let options = PlannerOptions::default();
        let result = project(&data, &with_traits, &options).unwrap();
        assert_eq!(result.raw, project(&data, &without, &options).unwrap().raw);
        assert_eq!(result.raw[Stat::Magic], 1.0);
        assert_eq!(result.raw[Stat::Luck], 4.0);
    }

    #[test]
    fn test_negative_growth_floored() {
        let data = dataset();
        // Magic: 10 + 0 - 15 = -5
        let plan = ProjectionPlan::new("Corrin")
            .with_traits(Trait::new(None, Some(Stat::Magic)))
            .with_interval(Interval::new(1, 21, "Fighter"));
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        assert_eq!(result.steps[0].growth[Stat::Magic], 0);
        assert_eq!(result.raw[Stat::Magic], 0.0);
    }

    #[test]
    fn test_class_change_and_back() {
        let data = dataset();
        let plan = ProjectionPlan::new("Unit")
            .with_interval(Interval::new(1, 11, "Fighter"))
            .with_interval(Interval::new(1, 11, "Hero"))
            .with_interval(Interval::new(1, 11, "Fighter"));
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        // Skl: 6 + 3.5, +4 into Hero, +4, -4 back to Fighter, +3.5
        assert_eq!(result.steps[1].after[Stat::Skill], 17.5);
        assert_eq!(result.raw[Stat::Skill], 17.0);
        assert_eq!(
            result.steps[2].class_change,
            Some(StatLine::new([-1, -1, 0, -4, -2, -1, -3, -2]))
        );
        assert_eq!(result.final_class, "Fighter");
        assert_eq!(result.final_level, 11);
    }

    #[test]
    fn test_inherited_starting_stats() {
        let data = dataset();
        let plan = ProjectionPlan::new("Unit").with_parent_stats(ParentStats {
            variable: StatLine::splat(30),
            fixed: StatLine::splat(20),
        });
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        let bonus = StatLine::new([2, 8, 12, 9, 9, 11, 10, 12]);
        assert_eq!(result.inherited, Some(bonus));
        assert_eq!(result.start.stats, StatLine::new([22, 16, 12, 15, 15, 13, 15, 13]));
        assert_eq!(result.raw, ExpectedStats::from(result.start.stats));
    }

    #[test]
    fn test_inherited_stats_capped_by_start_class() {
        let data = dataset();
        let plan = ProjectionPlan::new("Unit").with_parent_stats(ParentStats {
            variable: StatLine::splat(60),
            fixed: StatLine::splat(60),
        });
        let result = project(&data, &plan, &PlannerOptions::default()).unwrap();
        assert_eq!(result.start.stats[Stat::Hp], 40);
        assert_eq!(result.start.stats[Stat::Strength], 25);
        assert_eq!(result.inherited.map(|bonus| bonus[Stat::Strength]), Some(17));
    }

    #[test]
    fn test_invalid_levels() {
        let data = dataset();
        let options = PlannerOptions::default();
        for interval in [
            Interval::new(0, 5, "Fighter"),
            Interval::new(10, 5, "Fighter"),
            Interval::new(1, 41, "Fighter"),
        ] {
            let plan = ProjectionPlan::new("Unit").with_interval(interval);
            assert!(matches!(
                project(&data, &plan, &options),
                Err(ProjectionError::InvalidLevels { .. })
            ));
        }
    }

    #[test]
    fn test_missing_start() {
        let mut data = dataset();
        data.add_character(CharacterEntry {
            name: "Recruit".to_string(),
            category: "test".to_string(),
            growth: StatLine::zero(),
        })
        .unwrap();
        let plan = ProjectionPlan::new("Recruit");
        let err = project(&data, &plan, &PlannerOptions::default()).unwrap_err();
        assert!(matches!(err, ProjectionError::MissingStart(_)));
    }

    #[test]
    fn test_parse_interval() {
        let interval: Interval = "1-20:ソシアルナイト".parse().unwrap();
        assert_eq!(interval, Interval::new(1, 20, "ソシアルナイト"));
        assert_eq!(interval.levels(), 19);
        assert!("1-20".parse::<Interval>().is_err());
        assert!("a-20:X".parse::<Interval>().is_err());
        assert!("1-20:".parse::<Interval>().is_err());
    }
}
