//! PostgreSQL-backed `AccountRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, Email, NewAccount, PasswordHash, Role};

use super::diesel_error_mapping::DieselFailure;
use super::models::{AccountRow, NewAccountRow};
use super::pool::DbPool;
use super::schema::users;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed account repository.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: impl Into<DieselFailure>) -> AccountRepositoryError {
    failure.into().into_port(
        AccountRepositoryError::connection,
        AccountRepositoryError::query,
    )
}

fn row_to_account(row: AccountRow) -> Result<Account, AccountRepositoryError> {
    let corrupt = |field: &str, err: &dyn std::fmt::Display| {
        AccountRepositoryError::query(format!("corrupt account {field}: {err}"))
    };
    let id = AccountId::new(row.id).map_err(|err| corrupt("id", &err))?;
    let email = Email::new(&row.email).map_err(|err| corrupt("email", &err))?;
    let role = row.role.parse::<Role>().map_err(|err| corrupt("role", &err))?;
    Ok(Account::new(
        id,
        email,
        PasswordHash::new(row.password_hash),
        role,
    ))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let inserted = diesel::insert_into(users::table)
            .values(&NewAccountRow {
                email: account.email.as_ref(),
                password_hash: account.password_hash.as_ref(),
                role: account.role.as_str(),
            })
            .returning(AccountRow::as_returning())
            .get_result::<AccountRow>(&mut conn)
            .await;

        match inserted {
            Ok(row) => row_to_account(row),
            Err(err) => {
                let failure = DieselFailure::from(err);
                if failure.violates(EMAIL_UNIQUE_CONSTRAINT) {
                    Err(AccountRepositoryError::email_taken(account.email.as_ref()))
                } else {
                    Err(map_failure(failure))
                }
            }
        }
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row: Option<AccountRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_failure)?;
        row.map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(email: &str, role: &str) -> AccountRow {
        AccountRow {
            id: 12,
            email: email.to_owned(),
            password_hash: "$argon2id$v=19$stub".to_owned(),
            role: role.to_owned(),
        }
    }

    #[rstest]
    fn rows_convert_to_accounts() {
        let account = row_to_account(row("clerk@example.com", "employee")).expect("valid row");
        assert_eq!(account.id().get(), 12);
        assert_eq!(account.role(), Role::Employee);
    }

    #[rstest]
    #[case(row("not-an-email", "employee"))]
    #[case(row("clerk@example.com", "admin"))]
    fn corrupt_rows_are_query_errors(#[case] bad: AccountRow) {
        let error = row_to_account(bad).expect_err("corrupt row");
        assert!(matches!(error, AccountRepositoryError::Query { .. }));
    }
}
