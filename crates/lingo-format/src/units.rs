#![forbid(unsafe_code)]

//! Conversion from internal units to display units.
//!
//! Each conversion is `value * multiplier / 2^shift`, rounded half away
//! from zero. Velocities are stored in km-ish/h, where 1 km-ish/h is
//! 1/1.6 mph, so they are scaled by 10/16 on top of the unit conversion.

use lingo_i18n::{Quantity, UnitSettings, UnitSystem};

/// A fixed-point linear conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConversion {
    pub multiplier: i64,
    pub shift: u32,
}

impl UnitConversion {
    pub const IDENTITY: Self = Self::new(1, 0);

    #[must_use]
    pub const fn new(multiplier: i64, shift: u32) -> Self {
        Self { multiplier, shift }
    }

    /// Internal value to display value, rounded half away from zero.
    #[must_use]
    pub fn to_display(self, value: i64) -> i64 {
        self.to_display_scaled(value, 1, 1)
    }

    /// `value * num / den` converted for display, rounded once at the end.
    #[must_use]
    pub fn to_display_scaled(self, value: i64, num: i64, den: i64) -> i64 {
        let numerator = i128::from(value) * i128::from(self.multiplier) * i128::from(num);
        let denominator = i128::from(den) << self.shift;
        saturate(div_round_half_away(numerator, denominator))
    }

    /// Display value back to the internal unit, rounding up.
    #[must_use]
    pub fn from_display(self, value: i64) -> i64 {
        let numerator = i128::from(value) << self.shift;
        let m = i128::from(self.multiplier);
        saturate((numerator + m - 1).div_euclid(m))
    }
}

fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        quotient + numerator.signum() * denominator.signum()
    } else {
        quotient
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// The conversion for `quantity` in `system`.
#[must_use]
pub const fn conversion(quantity: Quantity, system: UnitSystem) -> UnitConversion {
    use UnitSystem::{Imperial, Metric, Si};
    let (multiplier, shift) = match (quantity, system) {
        (Quantity::Velocity, Imperial) => (1, 0),
        (Quantity::Velocity, Metric) => (103, 6),
        (Quantity::Velocity, Si) => (1831, 12),
        (Quantity::Power, Imperial) => (1, 0),
        (Quantity::Power, Metric) => (4153, 12),
        (Quantity::Power, Si) => (6109, 13),
        (Quantity::WeightShort | Quantity::WeightLong, Imperial) => (4515, 12),
        (Quantity::WeightShort | Quantity::WeightLong, Metric) => (1, 0),
        (Quantity::WeightShort | Quantity::WeightLong, Si) => (1000, 0),
        (Quantity::VolumeShort | Quantity::VolumeLong, Imperial) => (4227, 4),
        (Quantity::VolumeShort | Quantity::VolumeLong, Metric) => (1000, 0),
        (Quantity::VolumeShort | Quantity::VolumeLong, Si) => (1, 0),
        (Quantity::Force, Imperial) => (3597, 4),
        (Quantity::Force, Metric) => (3263, 5),
        (Quantity::Force, Si) => (1, 0),
        (Quantity::Height, Imperial) => (3, 0),
        (Quantity::Height, Metric | Si) => (1, 0),
    };
    UnitConversion::new(multiplier, shift)
}

/// The configured unit system for `quantity`.
#[must_use]
pub const fn system_for(units: &UnitSettings, quantity: Quantity) -> UnitSystem {
    match quantity {
        Quantity::Velocity => units.velocity,
        Quantity::Power => units.power,
        Quantity::WeightShort | Quantity::WeightLong => units.weight,
        Quantity::VolumeShort | Quantity::VolumeLong => units.volume,
        Quantity::Force => units.force,
        Quantity::Height => units.height,
    }
}

/// Convert an internal value of `quantity` for display in `system`.
#[must_use]
pub fn to_display(quantity: Quantity, system: UnitSystem, value: i64) -> i64 {
    let conv = conversion(quantity, system);
    match quantity {
        Quantity::Velocity => conv.to_display_scaled(value, 10, 16),
        _ => conv.to_display(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_rounds_half_away_from_zero() {
        // 7 / 1.6 = 4.375
        assert_eq!(to_display(Quantity::Velocity, UnitSystem::Imperial, 7), 4);
        // 4 / 1.6 = 2.5
        assert_eq!(to_display(Quantity::Velocity, UnitSystem::Imperial, 4), 3);
        assert_eq!(to_display(Quantity::Velocity, UnitSystem::Imperial, -4), -3);
        assert_eq!(to_display(Quantity::Velocity, UnitSystem::Imperial, 8), 5);
    }

    #[test]
    fn metric_and_si_velocity() {
        assert_eq!(to_display(Quantity::Velocity, UnitSystem::Metric, 160), 161);
        assert_eq!(to_display(Quantity::Velocity, UnitSystem::Si, 160), 45);
    }

    #[test]
    fn other_quantities() {
        assert_eq!(to_display(Quantity::Power, UnitSystem::Metric, 1000), 1014);
        assert_eq!(to_display(Quantity::WeightShort, UnitSystem::Imperial, 100), 110);
        assert_eq!(to_display(Quantity::WeightLong, UnitSystem::Si, 3), 3000);
        assert_eq!(to_display(Quantity::VolumeLong, UnitSystem::Imperial, 1), 264);
        assert_eq!(to_display(Quantity::Force, UnitSystem::Metric, 10), 1020);
        assert_eq!(to_display(Quantity::Height, UnitSystem::Imperial, 10), 30);
    }

    #[test]
    fn extremes_saturate() {
        let conv = conversion(Quantity::Force, UnitSystem::Imperial);
        assert_eq!(conv.to_display(i64::MAX), i64::MAX);
        assert_eq!(conv.to_display(i64::MIN), i64::MIN);
    }

    #[test]
    fn from_display_rounds_up() {
        let conv = conversion(Quantity::Velocity, UnitSystem::Metric);
        assert_eq!(conv.from_display(103), 64);
        assert_eq!(conv.from_display(1), 1);
        assert_eq!(UnitConversion::IDENTITY.from_display(-5), -5);
    }

    #[test]
    fn system_lookup() {
        let units = UnitSettings::default();
        assert_eq!(system_for(&units, Quantity::WeightLong), units.weight);
        assert_eq!(system_for(&units, Quantity::Height), units.height);
    }
}
