//! Growth-rate composition
//!
//! A unit's growth rate on each stat is the sum of four parts: its personal
//! growth, half of a parent's personal growth (child units only), the bonus
//! of its current class, and the avatar's boon/bane adjustment.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{CHART_HEADROOM, TRAIT_BONUS};
use crate::data::{DataError, Dataset};
use crate::options::PlannerOptions;
use crate::stats::{Stat, StatLine};

/// The avatar's boon (strength) and bane (weakness) picks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trait {
    pub boon: Option<Stat>,
    pub bane: Option<Stat>,
}

impl Trait {
    pub const NONE: Trait = Trait {
        boon: None,
        bane: None,
    };

    pub const fn new(boon: Option<Stat>, bane: Option<Stat>) -> Self {
        Self { boon, bane }
    }

    /// +15 on the boon stat, -15 on the bane stat.
    ///
    /// When both name the same stat the boon applies and the bane is dropped.
    /// Callers warn about that pick where it is made.
    pub fn bonus(&self) -> StatLine {
        let mut line = StatLine::zero();
        if let Some(bane) = self.bane {
            line.set(bane, -TRAIT_BONUS);
        }
        if let Some(boon) = self.boon {
            line.set(boon, TRAIT_BONUS);
        }
        line
    }
}

/// What to look up for a growth breakdown
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrowthQuery {
    pub character: String,
    pub class: Option<String>,
    pub parent: Option<String>,
    pub traits: Trait,
}

impl GrowthQuery {
    pub fn new(character: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_traits(mut self, traits: Trait) -> Self {
        self.traits = traits;
        self
    }
}

/// One layer of the stacked growth chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Component {
    #[strum(to_string = "Personal")]
    Personal,
    #[strum(to_string = "Parent")]
    Parent,
    #[strum(to_string = "Class")]
    Class,
    #[strum(to_string = "Boon/Bane")]
    Trait,
}

/// Growth rates split by where they come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrowthBreakdown {
    pub personal: StatLine,
    pub parent: StatLine,
    pub class: StatLine,
    pub traits: StatLine,
}

impl GrowthBreakdown {
    /// Per-stat total growth rate
    pub fn total(&self) -> StatLine {
        self.personal + self.parent + self.class + self.traits
    }

    /// Sum of all total growth rates
    pub fn total_sum(&self) -> i32 {
        self.total().sum()
    }

    /// Growth used for expected gains; a negative rate never lowers a stat
    pub fn effective(&self) -> StatLine {
        self.total().floored_at(0)
    }

    /// Upper bound of the chart's value axis
    pub fn chart_ceiling(&self) -> i32 {
        self.total().max().max(0) + CHART_HEADROOM
    }

    /// The layers bottom to top
    pub fn components(&self) -> [(Component, StatLine); 4] {
        [
            (Component::Personal, self.personal),
            (Component::Parent, self.parent),
            (Component::Class, self.class),
            (Component::Trait, self.traits),
        ]
    }
}

/// Half of the parent's personal growth, rounded down
pub fn parent_bonus(dataset: &Dataset, parent: &str) -> Result<StatLine, DataError> {
    Ok(dataset.character(parent)?.growth.halved_floor())
}

/// Compose the growth breakdown for a query
pub fn compose(
    dataset: &Dataset,
    query: &GrowthQuery,
    options: &PlannerOptions,
) -> Result<GrowthBreakdown, DataError> {
    let character = dataset.character(&query.character)?;

    let parent = match &query.parent {
        Some(parent) => parent_bonus(dataset, parent)?,
        None => StatLine::zero(),
    };
    let class = match &query.class {
        Some(class) => dataset.class(class)?.growth,
        None => StatLine::zero(),
    };
    let traits = if options.is_avatar(&character.name) {
        query.traits.bonus()
    } else {
        if query.traits != Trait::NONE {
            tracing::debug!(character = %character.name, "boon/bane ignored for non-avatar unit");
        }
        StatLine::zero()
    };

    Ok(GrowthBreakdown {
        personal: character.growth,
        parent,
        class,
        traits,
    })
}
