use std::fmt;
use std::str::FromStr;

use serde::{
    de::{value, IntoDeserializer},
    Deserialize, Serialize,
};

use super::ClimateMode;

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FanSpeed {
    Low,
    Medium,
    High,
    TopHigh,
}

/// Gear index for every speed. `TopHigh` exists only in `Cool`.
const GEARS: [(u8, FanSpeed); 4] = [
    (0, FanSpeed::Low),
    (1, FanSpeed::Medium),
    (2, FanSpeed::High),
    (9, FanSpeed::TopHigh),
];

impl FanSpeed {
    pub const ALL: [FanSpeed; 4] = [
        FanSpeed::Low,
        FanSpeed::Medium,
        FanSpeed::High,
        FanSpeed::TopHigh,
    ];

    pub fn is_supported_in(self, mode: ClimateMode) -> bool {
        match mode {
            ClimateMode::Off => false,
            ClimateMode::Cool => true,
            ClimateMode::Heat | ClimateMode::Dehumidify | ClimateMode::Ventilate => {
                self != FanSpeed::TopHigh
            }
        }
    }

    /// Gear index for `set_gears_idx`, `None` when `mode` has no such speed.
    pub fn gear_index(self, mode: ClimateMode) -> Option<u8> {
        if !self.is_supported_in(mode) {
            return None;
        }

        GEARS
            .iter()
            .find(|(_, speed)| *speed == self)
            .map(|(index, _)| *index)
    }

    fn from_gear_index(index: u8) -> Option<FanSpeed> {
        GEARS
            .iter()
            .find(|(known, _)| *known == index)
            .map(|(_, speed)| *speed)
    }
}

/// Position of the mode's gear digit in `fan_speed_idx`, counted from the
/// right.
fn digit_position(mode: ClimateMode) -> Option<usize> {
    match mode {
        ClimateMode::Off => None,
        ClimateMode::Heat => Some(0),
        ClimateMode::Cool => Some(1),
        ClimateMode::Dehumidify => Some(2),
        ClimateMode::Ventilate => Some(3),
    }
}

/// Decodes `fan_speed_idx`, which packs one gear digit per mode.
///
/// Off and unknown modes report `Low`. Missing leading digits count as `0`,
/// since the device may report the value as a number. A digit that is not a
/// gear of `mode` yields `None`.
pub fn decode_fan_speed(mode: Option<ClimateMode>, raw: &str) -> Option<FanSpeed> {
    let Some((mode, position)) = mode.and_then(|mode| Some((mode, digit_position(mode)?))) else {
        return Some(FanSpeed::Low);
    };

    let digit = raw.trim().chars().rev().nth(position).unwrap_or('0');
    let index = digit.to_digit(10)?;

    let speed = FanSpeed::from_gear_index(index as u8)?;
    speed.is_supported_in(mode).then_some(speed)
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.serialize(f)
    }
}

impl FromStr for FanSpeed {
    type Err = value::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::deserialize(s.into_deserializer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ClimateMode::*;
    use FanSpeed::*;

    #[test]
    fn test_heat_reads_last_digit() {
        assert_eq!(decode_fan_speed(Some(Heat), "0000"), Some(Low));
        assert_eq!(decode_fan_speed(Some(Heat), "0001"), Some(Medium));
        assert_eq!(decode_fan_speed(Some(Heat), "2222"), Some(High));
        assert_eq!(decode_fan_speed(Some(Heat), "001"), Some(Medium));
    }

    #[test]
    fn test_cool_reads_second_to_last_digit() {
        assert_eq!(decode_fan_speed(Some(Cool), "0002"), Some(Low));
        assert_eq!(decode_fan_speed(Some(Cool), "0010"), Some(Medium));
        assert_eq!(decode_fan_speed(Some(Cool), "0020"), Some(High));
        assert_eq!(decode_fan_speed(Some(Cool), "0090"), Some(TopHigh));
    }

    #[test]
    fn test_dehumidify_reads_third_to_last_digit() {
        assert_eq!(decode_fan_speed(Some(Dehumidify), "0022"), Some(Low));
        assert_eq!(decode_fan_speed(Some(Dehumidify), "0100"), Some(Medium));
        assert_eq!(decode_fan_speed(Some(Dehumidify), "0200"), Some(High));
    }

    #[test]
    fn test_ventilate_reads_fourth_to_last_digit() {
        assert_eq!(decode_fan_speed(Some(Ventilate), "0222"), Some(Low));
        assert_eq!(decode_fan_speed(Some(Ventilate), "1000"), Some(Medium));
        assert_eq!(decode_fan_speed(Some(Ventilate), "2000"), Some(High));
    }

    #[test]
    fn test_top_high_only_in_cool() {
        assert_eq!(decode_fan_speed(Some(Heat), "0009"), None);
        assert_eq!(decode_fan_speed(Some(Dehumidify), "0900"), None);
        assert_eq!(decode_fan_speed(Some(Ventilate), "9000"), None);
    }

    #[test]
    fn test_off_and_unknown_modes_are_low() {
        assert_eq!(decode_fan_speed(Some(Off), "2222"), Some(Low));
        assert_eq!(decode_fan_speed(None, "2222"), Some(Low));
        assert_eq!(decode_fan_speed(None, ""), Some(Low));
    }

    #[test]
    fn test_short_and_malformed_codes() {
        assert_eq!(decode_fan_speed(Some(Ventilate), "12"), Some(Low));
        assert_eq!(decode_fan_speed(Some(Cool), ""), Some(Low));
        assert_eq!(decode_fan_speed(Some(Heat), " 1 "), Some(Medium));
        assert_eq!(decode_fan_speed(Some(Heat), "000x"), None);
        assert_eq!(decode_fan_speed(Some(Heat), "0005"), None);
        assert_eq!(decode_fan_speed(Some(Cool), "ÿÿ"), None);
    }

    #[test]
    fn test_gear_index() {
        for mode in [Heat, Dehumidify, Ventilate] {
            assert_eq!(Low.gear_index(mode), Some(0));
            assert_eq!(Medium.gear_index(mode), Some(1));
            assert_eq!(High.gear_index(mode), Some(2));
            assert_eq!(TopHigh.gear_index(mode), None);
        }

        assert_eq!(Low.gear_index(Cool), Some(0));
        assert_eq!(Medium.gear_index(Cool), Some(1));
        assert_eq!(High.gear_index(Cool), Some(2));
        assert_eq!(TopHigh.gear_index(Cool), Some(9));

        for speed in FanSpeed::ALL {
            assert_eq!(speed.gear_index(Off), None);
        }
    }

    #[test]
    fn test_parsing() {
        assert_eq!("tophigh".parse::<FanSpeed>().unwrap(), TopHigh);
        assert_eq!("medium".parse::<FanSpeed>().unwrap(), Medium);
        assert!("Med".parse::<FanSpeed>().is_err());
        assert_eq!(TopHigh.to_string(), "tophigh");
    }
}
