//! Items logged against a reception.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ItemId, ReceptionId};

/// Validation errors for [`ItemCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemCategoryValidationError {
    /// Category is blank.
    #[error("item category must not be empty")]
    Empty,
}

/// Free-form item category, trimmed and non-empty.
///
/// # Examples
/// ```
/// use pvz_backend::domain::ItemCategory;
///
/// let category = ItemCategory::new("  электроника ").expect("valid category");
/// assert_eq!(category.as_ref(), "электроника");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemCategory(String);

impl ItemCategory {
    /// Trim and validate a category.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ItemCategoryValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ItemCategoryValidationError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemCategory {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ItemCategory> for String {
    fn from(value: ItemCategory) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemCategory {
    type Error = ItemCategoryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// An item attached to a reception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    reception_id: ReceptionId,
    category: ItemCategory,
    added_at: DateTime<Utc>,
}

impl Item {
    /// Assemble an item from stored values.
    #[must_use]
    pub const fn new(
        id: ItemId,
        reception_id: ReceptionId,
        category: ItemCategory,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            reception_id,
            category,
            added_at,
        }
    }

    /// Storage-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Reception the item is attached to.
    #[must_use]
    pub const fn reception_id(&self) -> ReceptionId {
        self.reception_id
    }

    /// Item category.
    #[must_use]
    pub const fn category(&self) -> &ItemCategory {
        &self.category
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}
