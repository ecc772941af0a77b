use std::str::FromStr;

use strum::{Display, EnumCount, EnumIter};
use thiserror::Error;

use crate::number;

/// Wire code of the first known carrier. Carrier codes are contiguous.
const CARRIER_CODE_BASE: i64 = 22000;

/// One of the known carriers, stored as a dense index in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Carrier(u8);

impl Carrier {
    pub const COUNT: usize = 5;

    pub fn new(index: u8) -> Option<Self> {
        (1..=Self::COUNT as u8).contains(&index).then_some(Self(index))
    }

    /// Maps a wire code such as `22003` onto its carrier. The code is rounded
    /// first, so `22002.6` is carrier 3.
    pub fn from_code(code: f64) -> Option<Self> {
        let rounded = number::round(code);
        let index = rounded - CARRIER_CODE_BASE as f64;
        if index < 1.0 || index > Self::COUNT as f64 {
            return None;
        }
        Self::new(index as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn code(self) -> i64 {
        CARRIER_CODE_BASE + self.0 as i64
    }

    pub fn iter() -> impl Iterator<Item = Carrier> {
        (1..=Self::COUNT as u8).map(Carrier)
    }
}

/// Provider selector as accepted by read endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierFilter {
    All,
    Only(Carrier),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown carrier")]
pub struct InvalidCarrier;

impl CarrierFilter {
    pub fn admits(self, carrier: Carrier) -> bool {
        match self {
            CarrierFilter::All => true,
            CarrierFilter::Only(x) => x == carrier,
        }
    }

    /// The concrete carrier, or `None` for the wildcard.
    pub fn carrier(self) -> Option<Carrier> {
        match self {
            CarrierFilter::All => None,
            CarrierFilter::Only(x) => Some(x),
        }
    }
}

impl FromStr for CarrierFilter {
    type Err = InvalidCarrier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(CarrierFilter::All);
        }
        number::parse(s)
            .and_then(Carrier::from_code)
            .map(CarrierFilter::Only)
            .ok_or(InvalidCarrier)
    }
}

/// Coarse radio generation a raw network type code falls into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumCount, EnumIter,
)]
#[repr(u8)]
pub enum Generation {
    /// Codes that are unknown or not deployed in the service area.
    #[strum(serialize = "unknown")]
    Unknown = 1,
    #[strum(serialize = "2G")]
    Second = 2,
    #[strum(serialize = "3G")]
    Third = 3,
    #[strum(serialize = "4G")]
    Fourth = 4,
}

impl Generation {
    /// Classifies an Android `TelephonyManager` network type code.
    pub fn from_network_type(code: i32) -> Self {
        match code {
            16 // GSM
            | 1 // GPRS
            | 2 // EDGE
            => Generation::Second,
            3 // UMTS
            | 17 // TD-SCDMA
            | 8 // HSDPA
            | 9 // HSUPA
            | 10 // HSPA
            | 15 // HSPA+
            => Generation::Third,
            13 => Generation::Fourth, // LTE
            _ => Generation::Unknown,
        }
    }
}

/// A single signal strength measurement as persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    pub dbm: i32,
    /// Raw network type code as reported by the device.
    pub network_type: i32,
    pub carrier: Carrier,
}

impl Sample {
    pub fn generation(&self) -> Generation {
        Generation::from_network_type(self.network_type)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn carrier_filter() {
        assert_eq!("all".parse(), Ok(CarrierFilter::All));
        assert_eq!(
            "22003".parse(),
            Ok(CarrierFilter::Only(Carrier::new(3).unwrap()))
        );
        assert_eq!("22006".parse::<CarrierFilter>(), Err(InvalidCarrier));
        assert_eq!("22000".parse::<CarrierFilter>(), Err(InvalidCarrier));
        assert_eq!("ALL".parse::<CarrierFilter>(), Err(InvalidCarrier));
        assert_eq!("telenor".parse::<CarrierFilter>(), Err(InvalidCarrier));
        assert_eq!("".parse::<CarrierFilter>(), Err(InvalidCarrier));
    }

    #[test]
    fn carrier_codes_are_rounded() {
        assert_eq!(Carrier::from_code(22004.6), Carrier::new(5));
        assert_eq!(Carrier::from_code(22000.5), Carrier::new(1));
        assert_eq!(Carrier::from_code(22005.5), None);
        assert_eq!(Carrier::from_code(-22003.0), None);
    }

    #[test]
    fn carrier_round_trips_code() {
        for carrier in Carrier::iter() {
            assert_eq!(Carrier::from_code(carrier.code() as f64), Some(carrier));
        }
        assert_eq!(Carrier::iter().count(), Carrier::COUNT);
        assert_eq!(Carrier::new(0), None);
        assert_eq!(Carrier::new(6), None);
    }

    #[test]
    fn classifies_network_types() {
        assert_eq!(Generation::from_network_type(16), Generation::Second);
        assert_eq!(Generation::from_network_type(2), Generation::Second);
        assert_eq!(Generation::from_network_type(3), Generation::Third);
        assert_eq!(Generation::from_network_type(15), Generation::Third);
        assert_eq!(Generation::from_network_type(13), Generation::Fourth);
        // CDMA, EVDO and NR are not known here
        assert_eq!(Generation::from_network_type(4), Generation::Unknown);
        assert_eq!(Generation::from_network_type(20), Generation::Unknown);
        assert_eq!(Generation::from_network_type(0), Generation::Unknown);
    }

    #[test]
    fn generation_order() {
        let order: Vec<_> = Generation::iter().map(|x| x as u8).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
        assert_eq!(Generation::COUNT, 4);
    }
}
