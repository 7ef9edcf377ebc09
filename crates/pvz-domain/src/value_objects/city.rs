//! City allow-list for pickup points

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// City a pickup point may be registered in.
///
/// The set is closed; extending it means adding a variant here and
/// re-validating every parser that accepts city names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum City {
    /// Moscow
    #[serde(rename = "Moscow", alias = "Москва")]
    Moscow,
    /// Saint Petersburg
    #[serde(rename = "Saint Petersburg", alias = "Санкт-Петербург")]
    SaintPetersburg,
    /// Kazan
    #[serde(rename = "Kazan", alias = "Казань")]
    Kazan,
}

impl City {
    /// Every supported city
    pub const ALL: [City; 3] = [City::Moscow, City::SaintPetersburg, City::Kazan];

    /// Canonical (wire) name
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Moscow => "Moscow",
            City::SaintPetersburg => "Saint Petersburg",
            City::Kazan => "Kazan",
        }
    }

    /// Russian name, accepted on input
    pub fn native_name(&self) -> &'static str {
        match self {
            City::Moscow => "Москва",
            City::SaintPetersburg => "Санкт-Петербург",
            City::Kazan => "Казань",
        }
    }
}

impl FromStr for City {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        City::ALL
            .into_iter()
            .find(|city| city.as_str() == name || city.native_name() == name)
            .ok_or_else(|| DomainError::InvalidCity(name.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_and_native_names() {
        assert_eq!("Moscow".parse::<City>().unwrap(), City::Moscow);
        assert_eq!("Москва".parse::<City>().unwrap(), City::Moscow);
        assert_eq!(
            "Санкт-Петербург".parse::<City>().unwrap(),
            City::SaintPetersburg
        );
        assert_eq!(" Kazan ".parse::<City>().unwrap(), City::Kazan);
    }

    #[test]
    fn test_parse_rejects_unknown_city() {
        let err = "Novosibirsk".parse::<City>().unwrap_err();
        assert_eq!(err, DomainError::InvalidCity("Novosibirsk".to_string()));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("moscow".parse::<City>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_name() {
        let json = serde_json::to_string(&City::SaintPetersburg).unwrap();
        assert_eq!(json, "\"Saint Petersburg\"");

        let native: City = serde_json::from_str("\"Казань\"").unwrap();
        assert_eq!(native, City::Kazan);
    }
}
