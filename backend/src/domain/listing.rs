//! Read model for the pickup point overview listing.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Item, PickupPoint, Reception};

/// Rejected reception window bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("window start {start} is after window end {end}")]
pub struct InvertedWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Inclusive creation-time filter applied to receptions.
///
/// Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceptionWindow {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl ReceptionWindow {
    /// Build a window, rejecting `start > end`.
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, InvertedWindow> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(InvertedWindow { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Lower bound, inclusive.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Upper bound, inclusive.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Whether `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// A reception with its attached items in attachment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionOverview {
    /// The reception record.
    pub reception: Reception,
    /// Items, oldest attachment first.
    pub items: Vec<Item>,
}

/// A pickup point with its receptions, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupPointOverview {
    /// The pickup point record.
    pub pickup_point: PickupPoint,
    /// Receptions inside the requested window; possibly empty.
    pub receptions: Vec<ReceptionOverview>,
}
