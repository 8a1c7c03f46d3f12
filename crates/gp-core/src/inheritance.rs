//! Inheritance from parent units
//!
//! Child-generation units have two parents. The *variable* parent is the one
//! whose personal growth passes down (halved); the *fixed* parent is recorded
//! for completeness and validated but contributes no growth. Both parents'
//! current stat lines raise the child's starting stats when it joins.

use serde::{Deserialize, Serialize};

use crate::data::{DataError, Dataset};
use crate::growth::parent_bonus;
use crate::stats::{Stat, StatLine};

/// The two parents of a child unit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parents {
    pub variable: Option<String>,
    pub fixed: Option<String>,
}

impl Parents {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            variable: Some(name.into()),
            fixed: None,
        }
    }

    pub fn with_fixed(mut self, name: impl Into<String>) -> Self {
        self.fixed = Some(name.into());
        self
    }
}

/// Current stat lines of both parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentStats {
    pub variable: StatLine,
    pub fixed: StatLine,
}

/// Both parents' recruitment stats, when both are named and have a start row
pub fn recruitment_stats(dataset: &Dataset, parents: &Parents) -> Option<ParentStats> {
    let variable = dataset.base_stats(parents.variable.as_deref()?)?;
    let fixed = dataset.base_stats(parents.fixed.as_deref()?)?;
    Some(ParentStats {
        variable: variable.stats,
        fixed: fixed.stats,
    })
}

/// Growth passed down by the variable parent
pub fn growth_bonus(dataset: &Dataset, parents: &Parents) -> Result<StatLine, DataError> {
    if let Some(fixed) = &parents.fixed {
        dataset.character(fixed)?;
    }
    match &parents.variable {
        Some(variable) => parent_bonus(dataset, variable),
        None => Ok(StatLine::zero()),
    }
}

/// Per-stat starting bonus from two parents' stat lines:
/// `max(0, floor((a + b - 2 * child) / 4))`
pub fn starting_bonus(child: &StatLine, parent_a: &StatLine, parent_b: &StatLine) -> StatLine {
    let mut bonus = StatLine::zero();
    for stat in Stat::ALL {
        let diff = parent_a[stat]
            .saturating_add(parent_b[stat])
            .saturating_sub(child[stat].saturating_mul(2));
        bonus.set(stat, diff.div_euclid(4).max(0));
    }
    bonus
}

/// Child starting stats after inheritance, limited by the class caps
pub fn inherit_start(
    child: &StatLine,
    parent_a: &StatLine,
    parent_b: &StatLine,
    cap: &StatLine,
) -> StatLine {
    (*child + starting_bonus(child, parent_a, parent_b)).capped(cap)
}
