//! Per-stat vectors: integer lines for rates, offsets and caps, and
//! fractional lines for expected values.

use core::ops::{Add, AddAssign, Index, IndexMut, Sub};

use serde::{Deserialize, Serialize};

use super::Stat;
use crate::consts::NUM_STATS;

/// One integer per stat (growth rates in percent, stat values, offsets or caps)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatLine {
    values: [i32; NUM_STATS],
}

impl StatLine {
    /// All zeroes
    pub const fn zero() -> Self {
        Self {
            values: [0; NUM_STATS],
        }
    }

    /// Create from values in `Stat::ALL` order
    pub const fn new(values: [i32; NUM_STATS]) -> Self {
        Self { values }
    }

    /// Same value for every stat
    pub const fn splat(value: i32) -> Self {
        Self {
            values: [value; NUM_STATS],
        }
    }

    pub const fn get(&self, stat: Stat) -> i32 {
        self.values[stat as usize]
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        self.values[stat as usize] = value;
    }

    /// Raw values in `Stat::ALL` order
    pub const fn values(&self) -> [i32; NUM_STATS] {
        self.values
    }

    /// Iterate `(stat, value)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        Stat::ALL.into_iter().map(|stat| (stat, self.get(stat)))
    }

    pub fn sum(&self) -> i32 {
        self.values.iter().sum()
    }

    pub fn max(&self) -> i32 {
        self.values.iter().copied().max().unwrap_or(0)
    }

    /// Half of every value, rounded toward negative infinity
    pub fn halved_floor(&self) -> Self {
        self.map(|v| v.div_euclid(2))
    }

    /// Raise every value to at least `floor`
    pub fn floored_at(&self, floor: i32) -> Self {
        self.map(|v| v.max(floor))
    }

    /// Element-wise minimum with `cap`
    pub fn capped(&self, cap: &StatLine) -> Self {
        let mut out = *self;
        for (v, c) in out.values.iter_mut().zip(cap.values) {
            *v = (*v).min(c);
        }
        out
    }

    fn map(&self, f: impl Fn(i32) -> i32) -> Self {
        Self {
            values: self.values.map(f),
        }
    }
}

impl Index<Stat> for StatLine {
    type Output = i32;

    fn index(&self, stat: Stat) -> &i32 {
        &self.values[stat as usize]
    }
}

impl IndexMut<Stat> for StatLine {
    fn index_mut(&mut self, stat: Stat) -> &mut i32 {
        &mut self.values[stat as usize]
    }
}

impl Add for StatLine {
    type Output = StatLine;

    fn add(self, rhs: StatLine) -> StatLine {
        let mut out = self;
        out += rhs;
        out
    }
}

impl AddAssign for StatLine {
    fn add_assign(&mut self, rhs: StatLine) {
        for (v, r) in self.values.iter_mut().zip(rhs.values) {
            *v = v.saturating_add(r);
        }
    }
}

impl Sub for StatLine {
    type Output = StatLine;

    fn sub(self, rhs: StatLine) -> StatLine {
        let mut out = self;
        for (v, r) in out.values.iter_mut().zip(rhs.values) {
            *v = v.saturating_sub(r);
        }
        out
    }
}

impl From<[i32; NUM_STATS]> for StatLine {
    fn from(values: [i32; NUM_STATS]) -> Self {
        Self::new(values)
    }
}

/// Expected (fractional) stat values produced by a projection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpectedStats {
    values: [f64; NUM_STATS],
}

impl ExpectedStats {
    pub const fn new(values: [f64; NUM_STATS]) -> Self {
        Self { values }
    }

    pub const fn get(&self, stat: Stat) -> f64 {
        self.values[stat as usize]
    }

    pub const fn values(&self) -> [f64; NUM_STATS] {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::ALL.into_iter().map(|stat| (stat, self.get(stat)))
    }

    /// Add the expected gain of `levels` level-ups at `growth` percent
    pub fn add_scaled(&mut self, growth: &StatLine, levels: u32) {
        for (v, g) in self.values.iter_mut().zip(growth.values()) {
            *v += f64::from(g) * f64::from(levels) / 100.0;
        }
    }

    /// Add a flat per-stat offset (class-change delta)
    pub fn add_offset(&mut self, offset: &StatLine) {
        for (v, o) in self.values.iter_mut().zip(offset.values()) {
            *v += f64::from(o);
        }
    }

    /// Element-wise minimum with a cap line
    pub fn capped(&self, cap: &StatLine) -> Self {
        let mut out = *self;
        for (v, c) in out.values.iter_mut().zip(cap.values()) {
            *v = v.min(f64::from(c));
        }
        out
    }

    /// Values rounded to two decimals, for display
    pub fn rounded(&self) -> Self {
        Self {
            values: self.values.map(|v| (v * 100.0).round() / 100.0),
        }
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl From<StatLine> for ExpectedStats {
    fn from(line: StatLine) -> Self {
        Self {
            values: line.values().map(f64::from),
        }
    }
}

impl Index<Stat> for ExpectedStats {
    type Output = f64;

    fn index(&self, stat: Stat) -> &f64 {
        &self.values[stat as usize]
    }
}
