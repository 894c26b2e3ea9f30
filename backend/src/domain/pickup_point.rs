//! Pickup points and the cities they may be opened in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PickupPointId;

/// Cities where pickup points may be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    /// Moscow.
    #[serde(rename = "Москва")]
    Moscow,
    /// Saint Petersburg.
    #[serde(rename = "Санкт-Петербург")]
    SaintPetersburg,
    /// Kazan.
    #[serde(rename = "Казань")]
    Kazan,
}

/// Error returned when a city name is not on the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pickup points cannot be opened in {value:?}")]
pub struct UnsupportedCity {
    value: String,
}

impl City {
    /// Every supported city, in display order.
    pub const ALL: [Self; 3] = [Self::Moscow, Self::SaintPetersburg, Self::Kazan];

    /// Canonical display name, as stored and serialised.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Moscow => "Москва",
            Self::SaintPetersburg => "Санкт-Петербург",
            Self::Kazan => "Казань",
        }
    }
}

impl FromStr for City {
    type Err = UnsupportedCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|city| city.as_str() == s)
            .ok_or_else(|| UnsupportedCity {
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered pickup point. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupPoint {
    id: PickupPointId,
    city: City,
    registered_at: DateTime<Utc>,
}

impl PickupPoint {
    /// Assemble a pickup point from stored values.
    #[must_use]
    pub const fn new(id: PickupPointId, city: City, registered_at: DateTime<Utc>) -> Self {
        Self {
            id,
            city,
            registered_at,
        }
    }

    /// Storage-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> PickupPointId {
        self.id
    }

    /// City the pickup point operates in.
    #[must_use]
    pub const fn city(&self) -> City {
        self.city
    }

    /// Registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Москва", City::Moscow)]
    #[case("Санкт-Петербург", City::SaintPetersburg)]
    #[case("Казань", City::Kazan)]
    fn parses_allow_listed_cities(#[case] raw: &str, #[case] expected: City) {
        assert_eq!(raw.parse::<City>(), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("Moscow")]
    #[case("москва")]
    #[case("")]
    fn rejects_other_cities(#[case] raw: &str) {
        assert!(raw.parse::<City>().is_err());
    }

    #[rstest]
    fn serde_uses_display_names() {
        let value = serde_json::to_value(City::Kazan).expect("serialise city");
        assert_eq!(value, "Казань");
        assert!(serde_json::from_str::<City>("\"Тверь\"").is_err());
    }
}
