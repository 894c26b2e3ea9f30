//! PostgreSQL-backed `ItemRepository`.
//!
//! Items live in `products`; the association lives in `reception_products`,
//! whose `seq` column is the stack order for removals.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{Item, ItemCategory, ItemId, ReceptionId};

use super::diesel_error_mapping::DieselFailure;
use super::models::{NewProductRow, NewReceptionProductRow, ProductRow};
use super::pool::DbPool;
use super::schema::{products, reception_products};

/// Diesel-backed item repository.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DieselFailure>) -> ItemRepositoryError {
    failure
        .into()
        .into_port(ItemRepositoryError::connection, ItemRepositoryError::query)
}

fn row_to_item(reception_id: i64, row: ProductRow) -> Result<Item, ItemRepositoryError> {
    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        ItemRepositoryError::query(format!("corrupt product {field}: {err}"))
    };
    let id = ItemId::new(row.id).map_err(|err| corrupt("id", &err))?;
    let reception_id =
        ReceptionId::new(reception_id).map_err(|err| corrupt("reception_id", &err))?;
    let category = ItemCategory::new(&row.product_type).map_err(|err| corrupt("type", &err))?;
    Ok(Item::new(id, reception_id, category, row.created_at))
}

/// Detach and delete the newest association of `reception_id` in one
/// transaction. The association row is locked so concurrent removals from
/// other processes cannot pick the same item.
async fn detach_newest(
    conn: &mut AsyncPgConnection,
    reception_id: i64,
) -> Result<Option<ProductRow>, diesel::result::Error> {
    conn.transaction(|conn| {
        async move {
            let newest: Option<(i64, i64)> = reception_products::table
                .filter(reception_products::reception_id.eq(reception_id))
                .select((reception_products::seq, reception_products::product_id))
                .order_by(reception_products::seq.desc())
                .for_update()
                .first(conn)
                .await
                .optional()?;
            let Some((seq, product_id)) = newest else {
                return Ok(None);
            };

            diesel::delete(reception_products::table.filter(reception_products::seq.eq(seq)))
                .execute(conn)
                .await?;
            diesel::delete(products::table.filter(products::id.eq(product_id)))
                .returning(ProductRow::as_returning())
                .get_result(conn)
                .await
                .optional()
        }
        .scope_boxed()
    })
    .await
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn create(
        &self,
        category: &ItemCategory,
        added_at: DateTime<Utc>,
    ) -> Result<ItemId, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let raw: i64 = diesel::insert_into(products::table)
            .values(&NewProductRow {
                created_at: added_at,
                product_type: category.as_ref(),
            })
            .returning(products::id)
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        ItemId::new(raw).map_err(|err| ItemRepositoryError::query(err.to_string()))
    }

    async fn attach(
        &self,
        reception_id: ReceptionId,
        item_id: ItemId,
    ) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::insert_into(reception_products::table)
            .values(&NewReceptionProductRow {
                reception_id: reception_id.get(),
                product_id: item_id.get(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_failure)
    }

    async fn detach_last(
        &self,
        reception_id: ReceptionId,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let raw_reception = reception_id.get();
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let removed = detach_newest(&mut conn, raw_reception)
            .await
            .map_err(map_failure)?;
        removed
            .map(|row| row_to_item(raw_reception, row))
            .transpose()
    }

    async fn list_for_receptions(
        &self,
        reception_ids: &[ReceptionId],
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        if reception_ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = reception_ids.iter().map(|id| id.get()).collect();

        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<(i64, ProductRow)> = reception_products::table
            .inner_join(products::table)
            .filter(reception_products::reception_id.eq_any(raw))
            .select((reception_products::reception_id, ProductRow::as_select()))
            .order_by(reception_products::seq.asc())
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter()
            .map(|(reception_id, row)| row_to_item(reception_id, row))
            .collect()
    }
}
