use gp_core::damage::{self, AttackInput, DamageKind, DefenseInput, Multipliers};
use gp_core::growth::GrowthBreakdown;
use gp_core::{ExpectedStats, Stat, StatLine};
use proptest::prelude::*;

fn stat_line(range: std::ops::Range<i32>) -> impl Strategy<Value = StatLine> {
    prop::array::uniform8(range).prop_map(StatLine::new)
}

proptest! {
    #[test]
    fn halved_floor_never_exceeds_half(line in stat_line(-200..200)) {
        let half = line.halved_floor();
        for stat in Stat::ALL {
            prop_assert!(2 * half[stat] <= line[stat]);
            prop_assert!(line[stat] - 2 * half[stat] < 2);
        }
    }

    #[test]
    fn effective_growth_is_non_negative(
        personal in stat_line(0..100),
        parent in stat_line(0..50),
        class in stat_line(-10..30),
        traits in stat_line(-15..16),
    ) {
        let breakdown = GrowthBreakdown { personal, parent, class, traits };
        let effective = breakdown.effective();
        for stat in Stat::ALL {
            prop_assert!(effective[stat] >= 0);
            prop_assert!(effective[stat] >= breakdown.total()[stat]);
        }
        prop_assert!(breakdown.chart_ceiling() >= breakdown.total().max());
    }

    #[test]
    fn expected_gain_is_monotonic(growth in stat_line(0..200), levels in 0u32..40) {
        let start = ExpectedStats::from(StatLine::splat(10));
        let mut after = start;
        after.add_scaled(&growth, levels);
        for stat in Stat::ALL {
            prop_assert!(after[stat] >= start[stat]);
        }
    }

    #[test]
    fn capped_never_exceeds_cap(values in stat_line(0..100), cap in stat_line(0..100)) {
        let capped = ExpectedStats::from(values).capped(&cap);
        for stat in Stat::ALL {
            prop_assert!(capped[stat] <= f64::from(cap[stat]));
        }
    }

    #[test]
    fn damage_scales_with_special(strength in 0.0f64..60.0, defense in 0.0f64..60.0) {
        let attack = AttackInput { strength, weapon_might: 10.0, ..AttackInput::default() };
        let defense = DefenseInput { defense, ..DefenseInput::default() };
        let base = damage::damage(DamageKind::Physical, &attack, &defense, &Multipliers::default());
        let effective = damage::damage(
            DamageKind::Physical,
            &attack,
            &defense,
            &Multipliers { offline: 1.0, special: 3.0 },
        );
        prop_assert!((effective - 3.0 * base).abs() < 1e-9);
    }
}
