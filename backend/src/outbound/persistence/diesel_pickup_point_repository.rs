//! PostgreSQL-backed `PickupPointRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{PickupPointRepository, PickupPointRepositoryError};
use crate::domain::{City, PickupPoint, PickupPointId};

use super::diesel_error_mapping::DieselFailure;
use super::models::{NewPickupPointRow, PickupPointRow};
use super::pool::DbPool;
use super::schema::pvz;

/// Diesel-backed pickup point repository.
#[derive(Clone)]
pub struct DieselPickupPointRepository {
    pool: DbPool,
}

impl DieselPickupPointRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DieselFailure>) -> PickupPointRepositoryError {
    failure.into().into_port(
        PickupPointRepositoryError::connection,
        PickupPointRepositoryError::query,
    )
}

fn row_to_pickup_point(
    row: PickupPointRow,
) -> Result<PickupPoint, PickupPointRepositoryError> {
    let id = PickupPointId::new(row.id)
        .map_err(|err| PickupPointRepositoryError::query(format!("corrupt pvz id: {err}")))?;
    let city = row
        .city
        .parse::<City>()
        .map_err(|err| PickupPointRepositoryError::query(format!("corrupt pvz city: {err}")))?;
    Ok(PickupPoint::new(id, city, row.registration_date))
}

fn page_bounds(page: PageRequest) -> Result<(i64, i64), PickupPointRepositoryError> {
    let offset = i64::try_from(page.offset())
        .map_err(|_| PickupPointRepositoryError::query("page offset out of range"))?;
    Ok((offset, i64::from(page.limit())))
}

#[async_trait]
impl PickupPointRepository for DieselPickupPointRepository {
    async fn create(
        &self,
        city: City,
        registered_at: DateTime<Utc>,
    ) -> Result<PickupPoint, PickupPointRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: PickupPointRow = diesel::insert_into(pvz::table)
            .values(&NewPickupPointRow {
                city: city.as_str(),
                registration_date: registered_at,
            })
            .returning(PickupPointRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        row_to_pickup_point(row)
    }

    async fn find_by_id(
        &self,
        id: PickupPointId,
    ) -> Result<Option<PickupPoint>, PickupPointRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<PickupPointRow> = pvz::table
            .filter(pvz::id.eq(id.get()))
            .select(PickupPointRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(row_to_pickup_point).transpose()
    }

    async fn list_page(
        &self,
        page: PageRequest,
    ) -> Result<Vec<PickupPoint>, PickupPointRepositoryError> {
        let (offset, limit) = page_bounds(page)?;
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<PickupPointRow> = pvz::table
            .select(PickupPointRow::as_select())
            .order_by(pvz::id.asc())
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter().map(row_to_pickup_point).collect()
    }
}
