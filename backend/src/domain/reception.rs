//! Receptions: work sessions during which items are logged at a pickup point.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{PickupPointId, ReceptionId};

/// Lifecycle status of a reception. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceptionStatus {
    /// Items may be added and removed.
    InProgress,
    /// No further changes are accepted.
    Closed,
}

/// Error raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reception status {0:?}")]
pub struct UnknownReceptionStatus(String);

impl ReceptionStatus {
    /// Database and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for ReceptionStatus {
    type Err = UnknownReceptionStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            other => Err(UnknownReceptionStatus(other.to_owned())),
        }
    }
}

impl fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reception opened at a pickup point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reception {
    id: ReceptionId,
    pickup_point_id: PickupPointId,
    started_at: DateTime<Utc>,
    status: ReceptionStatus,
}

impl Reception {
    /// Assemble a reception from stored values.
    #[must_use]
    pub const fn new(
        id: ReceptionId,
        pickup_point_id: PickupPointId,
        started_at: DateTime<Utc>,
        status: ReceptionStatus,
    ) -> Self {
        Self {
            id,
            pickup_point_id,
            started_at,
            status,
        }
    }

    /// Storage-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> ReceptionId {
        self.id
    }

    /// Owning pickup point.
    #[must_use]
    pub const fn pickup_point_id(&self) -> PickupPointId {
        self.pickup_point_id
    }

    /// Start timestamp, also the ordering key for "most recent".
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ReceptionStatus {
        self.status
    }

    /// Whether items may still be added or removed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == ReceptionStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReceptionStatus::InProgress, "in_progress")]
    #[case(ReceptionStatus::Closed, "closed")]
    fn status_text_round_trips(#[case] status: ReceptionStatus, #[case] text: &str) {
        assert_eq!(status.as_str(), text);
        assert_eq!(text.parse::<ReceptionStatus>(), Ok(status));
        assert_eq!(
            serde_json::to_value(status).expect("serialise status"),
            text
        );
    }

    #[rstest]
    fn unknown_status_is_rejected() {
        let err = "open".parse::<ReceptionStatus>().expect_err("unknown status");
        assert_eq!(err.to_string(), "unknown reception status \"open\"");
    }
}
