//! PostgreSQL-backed `ReceptionRepository`.
//!
//! The partial unique index `uniq_receptions_active_per_pvz` rejects a second
//! in-progress reception; that violation is reported as
//! `ActiveReceptionExists`. Closing is a conditional update, so a reception
//! can only be closed once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReceptionRepository, ReceptionRepositoryError};
use crate::domain::{PickupPointId, Reception, ReceptionId, ReceptionStatus, ReceptionWindow};

use super::diesel_error_mapping::DieselFailure;
use super::models::{NewReceptionRow, ReceptionRow};
use super::pool::DbPool;
use super::schema::receptions;

/// Name of the partial unique index guarding the single active reception.
pub(crate) const ACTIVE_RECEPTION_INDEX: &str = "uniq_receptions_active_per_pvz";

/// Diesel-backed reception repository.
#[derive(Clone)]
pub struct DieselReceptionRepository {
    pool: DbPool,
}

impl DieselReceptionRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DieselFailure>) -> ReceptionRepositoryError {
    failure.into().into_port(
        ReceptionRepositoryError::connection,
        ReceptionRepositoryError::query,
    )
}

fn row_to_reception(row: ReceptionRow) -> Result<Reception, ReceptionRepositoryError> {
    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        ReceptionRepositoryError::query(format!("corrupt reception {field}: {err}"))
    };
    let id = ReceptionId::new(row.id).map_err(|err| corrupt("id", &err))?;
    let pvz_id = PickupPointId::new(row.pvz_id).map_err(|err| corrupt("pvz_id", &err))?;
    let status = row
        .status
        .parse::<ReceptionStatus>()
        .map_err(|err| corrupt("status", &err))?;
    Ok(Reception::new(id, pvz_id, row.created_at, status))
}

fn raw_ids(ids: &[PickupPointId]) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

#[async_trait]
impl ReceptionRepository for DieselReceptionRepository {
    async fn latest_for_pickup_point(
        &self,
        pvz_id: PickupPointId,
    ) -> Result<Option<Reception>, ReceptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<ReceptionRow> = receptions::table
            .filter(receptions::pvz_id.eq(pvz_id.get()))
            .select(ReceptionRow::as_select())
            .order_by((receptions::created_at.desc(), receptions::id.desc()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(row_to_reception).transpose()
    }

    async fn create(
        &self,
        pvz_id: PickupPointId,
        started_at: DateTime<Utc>,
    ) -> Result<Reception, ReceptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let inserted = diesel::insert_into(receptions::table)
            .values(&NewReceptionRow {
                pvz_id: pvz_id.get(),
                created_at: started_at,
                status: ReceptionStatus::InProgress.as_str(),
            })
            .returning(ReceptionRow::as_returning())
            .get_result::<ReceptionRow>(&mut conn)
            .await;

        match inserted {
            Ok(row) => row_to_reception(row),
            Err(err) => {
                let failure = DieselFailure::from(err);
                if failure.violates(ACTIVE_RECEPTION_INDEX) {
                    Err(ReceptionRepositoryError::active_reception_exists(pvz_id))
                } else {
                    Err(map_failure(failure))
                }
            }
        }
    }

    async fn close(&self, id: ReceptionId) -> Result<Option<Reception>, ReceptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<ReceptionRow> = diesel::update(
            receptions::table
                .filter(receptions::id.eq(id.get()))
                .filter(receptions::status.eq(ReceptionStatus::InProgress.as_str())),
        )
        .set(receptions::status.eq(ReceptionStatus::Closed.as_str()))
        .returning(ReceptionRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_failure)?;
        row.map(row_to_reception).transpose()
    }

    async fn list_for_pickup_points(
        &self,
        pvz_ids: &[PickupPointId],
        window: ReceptionWindow,
    ) -> Result<Vec<Reception>, ReceptionRepositoryError> {
        if pvz_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = receptions::table
            .filter(receptions::pvz_id.eq_any(raw_ids(pvz_ids)))
            .select(ReceptionRow::as_select())
            .into_boxed();
        if let Some(start) = window.start() {
            query = query.filter(receptions::created_at.ge(start));
        }
        if let Some(end) = window.end() {
            query = query.filter(receptions::created_at.le(end));
        }

        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let rows: Vec<ReceptionRow> = query
            .order_by((
                receptions::pvz_id.asc(),
                receptions::created_at.desc(),
                receptions::id.desc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        rows.into_iter().map(row_to_reception).collect()
    }
}
