//! Unit stats (HP, Str, Mag, Skl, Spd, Lck, Def, Res)

mod line;

pub use line::{ExpectedStats, StatLine};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A unit stat, in the order the game lists them
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumIter,
)]
#[repr(u8)]
pub enum Stat {
    #[strum(to_string = "HP")]
    Hp = 0,
    #[strum(to_string = "Str")]
    Strength = 1,
    #[strum(to_string = "Mag")]
    Magic = 2,
    #[strum(to_string = "Skl")]
    Skill = 3,
    #[strum(to_string = "Spd")]
    Speed = 4,
    #[strum(to_string = "Lck")]
    Luck = 5,
    #[strum(to_string = "Def")]
    Defense = 6,
    #[strum(to_string = "Res")]
    Resistance = 7,
}

impl Stat {
    /// All stats in display order
    pub const ALL: [Stat; 8] = [
        Stat::Hp,
        Stat::Strength,
        Stat::Magic,
        Stat::Skill,
        Stat::Speed,
        Stat::Luck,
        Stat::Defense,
        Stat::Resistance,
    ];

    /// Short name for display
    pub const fn short_name(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Strength => "Str",
            Stat::Magic => "Mag",
            Stat::Skill => "Skl",
            Stat::Speed => "Spd",
            Stat::Luck => "Lck",
            Stat::Defense => "Def",
            Stat::Resistance => "Res",
        }
    }

    /// Full English name
    pub const fn full_name(&self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
            Stat::Skill => "skill",
            Stat::Speed => "speed",
            Stat::Luck => "luck",
            Stat::Defense => "defense",
            Stat::Resistance => "resistance",
        }
    }

    /// Column label used by the Japanese data sheets
    pub const fn jp_label(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Strength => "力",
            Stat::Magic => "魔力",
            Stat::Skill => "技",
            Stat::Speed => "速さ",
            Stat::Luck => "幸運",
            Stat::Defense => "守備",
            Stat::Resistance => "魔防",
        }
    }

    /// Create from index (0-7)
    pub const fn from_index(idx: usize) -> Option<Self> {
        if idx < Self::ALL.len() {
            Some(Self::ALL[idx])
        } else {
            None
        }
    }

    /// Get index (0-7)
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Parse a column header or user-typed stat name.
    ///
    /// Accepts the short name, the full English name or the Japanese label.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|stat| {
            label.eq_ignore_ascii_case(stat.short_name())
                || label.eq_ignore_ascii_case(stat.full_name())
                || label == stat.jp_label()
        })
    }
}
