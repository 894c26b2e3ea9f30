//! Response bodies shared by the PVZ handlers.
//!
//! Field names follow the public camelCase contract, which differs from the
//! domain accessor names (`registered_at` is `registrationDate`, and so on).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Item, PickupPoint, PickupPointOverview, Reception, ReceptionOverview};

/// A pickup point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointBody {
    #[schema(example = 1)]
    pub id: i64,
    pub registration_date: DateTime<Utc>,
    #[schema(example = "Москва")]
    pub city: String,
}

impl From<&PickupPoint> for PickupPointBody {
    fn from(value: &PickupPoint) -> Self {
        Self {
            id: value.id().get(),
            registration_date: value.registered_at(),
            city: value.city().as_str().to_owned(),
        }
    }
}

/// A reception session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionBody {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub pvz_id: i64,
    #[schema(example = "in_progress")]
    pub status: String,
}

impl From<&Reception> for ReceptionBody {
    fn from(value: &Reception) -> Self {
        Self {
            id: value.id().get(),
            start_date: value.started_at(),
            pvz_id: value.pickup_point_id().get(),
            status: value.status().as_str().to_owned(),
        }
    }
}

/// An item logged against a reception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub id: i64,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    #[schema(example = "электроника")]
    pub item_type: String,
    pub reception_id: i64,
}

impl From<&Item> for ItemBody {
    fn from(value: &Item) -> Self {
        Self {
            id: value.id().get(),
            date_time: value.added_at(),
            item_type: value.category().as_ref().to_owned(),
            reception_id: value.reception_id().get(),
        }
    }
}

/// A reception with its items, oldest attachment first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReceptionOverviewBody {
    pub reception: ReceptionBody,
    pub products: Vec<ItemBody>,
}

impl From<&ReceptionOverview> for ReceptionOverviewBody {
    fn from(value: &ReceptionOverview) -> Self {
        Self {
            reception: ReceptionBody::from(&value.reception),
            products: value.items.iter().map(ItemBody::from).collect(),
        }
    }
}

/// One entry of the pickup point listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PickupPointOverviewBody {
    pub pvz: PickupPointBody,
    pub receptions: Vec<ReceptionOverviewBody>,
}

impl From<&PickupPointOverview> for PickupPointOverviewBody {
    fn from(value: &PickupPointOverview) -> Self {
        Self {
            pvz: PickupPointBody::from(&value.pickup_point),
            receptions: value
                .receptions
                .iter()
                .map(ReceptionOverviewBody::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    use crate::domain::{City, ItemCategory, ItemId, PickupPointId, ReceptionId, ReceptionStatus};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn item_body_uses_public_field_names() {
        let item = Item::new(
            ItemId::new(4).expect("id"),
            ReceptionId::new(2).expect("id"),
            ItemCategory::new("обувь").expect("category"),
            at(),
        );
        let value = serde_json::to_value(ItemBody::from(&item)).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": 4,
                "dateTime": "2025-04-01T09:00:00Z",
                "type": "обувь",
                "receptionId": 2,
            })
        );
    }

    #[rstest]
    fn overview_nests_receptions_and_products() {
        let pickup_point = PickupPoint::new(PickupPointId::new(1).expect("id"), City::Moscow, at());
        let reception = Reception::new(
            ReceptionId::new(2).expect("id"),
            pickup_point.id(),
            at(),
            ReceptionStatus::Closed,
        );
        let overview = PickupPointOverview {
            pickup_point,
            receptions: vec![ReceptionOverview {
                reception,
                items: Vec::new(),
            }],
        };

        let value = serde_json::to_value(PickupPointOverviewBody::from(&overview))
            .expect("serialise");
        assert_eq!(value["pvz"]["city"], "Москва");
        assert_eq!(value["pvz"]["registrationDate"], "2025-04-01T09:00:00Z");
        assert_eq!(value["receptions"][0]["reception"]["status"], "closed");
        assert_eq!(value["receptions"][0]["reception"]["startDate"], "2025-04-01T09:00:00Z");
        assert_eq!(value["receptions"][0]["products"], json!([]));
    }
}
