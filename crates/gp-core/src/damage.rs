//! Battle damage formula
//!
//! ```text
//! attack  = stat + (weapon + crit_adjust) * critical + level_bonus + triangle
//! defense = def_or_res + terrain
//! damage  = (attack - defense) * offline * special
//! ```
//!
//! `stat` is strength for physical attacks and magic for magical ones; the
//! defending stat follows the same split. Inputs are real numbers and the
//! result is not clamped.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

/// Damage calculator errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DamageError {
    #[error("Unknown damage kind '{0}' (use 1/physical or 2/magical)")]
    UnknownKind(String),

    #[error("{field} = {value} is out of range (allowed: {allowed})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        allowed: &'static str,
    },
}

/// Physical or magical attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum DamageKind {
    #[strum(to_string = "physical")]
    Physical,
    #[strum(to_string = "magical")]
    Magical,
}

impl DamageKind {
    /// Numeric code used on the printed calculator sheet
    pub const fn code(&self) -> u8 {
        match self {
            DamageKind::Physical => 1,
            DamageKind::Magical => 2,
        }
    }
}

impl FromStr for DamageKind {
    type Err = DamageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "physical" | "phys" | "p" => Ok(DamageKind::Physical),
            "2" | "magical" | "magic" | "m" => Ok(DamageKind::Magical),
            _ => Err(DamageError::UnknownKind(s.to_string())),
        }
    }
}

/// Attacker side of the formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackInput {
    pub strength: f64,
    pub magic: f64,
    pub weapon_might: f64,
    /// Critical multiplier: 1, 2 or 3
    pub critical: f64,
    /// Weapon adjustment on critical hits: 0 or -4
    pub crit_adjust: f64,
    /// Level difference bonus: 1 to 4
    pub level_bonus: f64,
    /// Weapon triangle: -2, 0 or +2
    pub triangle: f64,
}

impl Default for AttackInput {
    fn default() -> Self {
        Self {
            strength: 0.0,
            magic: 0.0,
            weapon_might: 0.0,
            critical: 1.0,
            crit_adjust: 0.0,
            level_bonus: 1.0,
            triangle: 0.0,
        }
    }
}

/// Defender side of the formula
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DefenseInput {
    pub defense: f64,
    pub resistance: f64,
    pub terrain: f64,
}

/// Final multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    /// 1 normally, 0.5 when the attacker is off the battle line
    pub offline: f64,
    /// Special effectiveness: 1, 3 or 4
    pub special: f64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            offline: 1.0,
            special: 1.0,
        }
    }
}

/// Attack power for the chosen kind
pub fn attack_power(kind: DamageKind, attack: &AttackInput) -> f64 {
    let stat = match kind {
        DamageKind::Physical => attack.strength,
        DamageKind::Magical => attack.magic,
    };
    stat + (attack.weapon_might + attack.crit_adjust) * attack.critical
        + attack.level_bonus
        + attack.triangle
}

/// Defense power for the chosen kind
pub fn defense_power(kind: DamageKind, defense: &DefenseInput) -> f64 {
    let stat = match kind {
        DamageKind::Physical => defense.defense,
        DamageKind::Magical => defense.resistance,
    };
    stat + defense.terrain
}

/// Damage dealt
pub fn damage(
    kind: DamageKind,
    attack: &AttackInput,
    defense: &DefenseInput,
    multipliers: &Multipliers,
) -> f64 {
    let dealt = (attack_power(kind, attack) - defense_power(kind, defense))
        * multipliers.offline
        * multipliers.special;
    tracing::debug!(%kind, dealt, "damage computed");
    dealt
}

fn one_of(
    field: &'static str,
    value: f64,
    allowed_values: &[f64],
    allowed: &'static str,
) -> Result<(), DamageError> {
    if allowed_values.iter().any(|v| (v - value).abs() < f64::EPSILON) {
        Ok(())
    } else {
        Err(DamageError::OutOfRange {
            field,
            value,
            allowed,
        })
    }
}

/// Check inputs against the values the game can produce
pub fn validate(attack: &AttackInput, multipliers: &Multipliers) -> Result<(), DamageError> {
    one_of("critical", attack.critical, &[1.0, 2.0, 3.0], "1, 2, 3")?;
    one_of("crit_adjust", attack.crit_adjust, &[0.0, -4.0], "0, -4")?;
    if !(1.0..=4.0).contains(&attack.level_bonus) {
        return Err(DamageError::OutOfRange {
            field: "level_bonus",
            value: attack.level_bonus,
            allowed: "1 to 4",
        });
    }
    one_of("triangle", attack.triangle, &[-2.0, 0.0, 2.0], "-2, 0, 2")?;
    one_of("offline", multipliers.offline, &[1.0, 0.5], "1, 0.5")?;
    one_of("special", multipliers.special, &[1.0, 3.0, 4.0], "1, 3, 4")?;
    Ok(())
}
