//! Tests for the account service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockAccessTokens, MockAccountRepository};
use crate::test_support::{InMemoryStore, PlainPasswordHasher};

type Service<T> = AccountService<InMemoryStore, PlainPasswordHasher, T>;

fn echo_tokens() -> MockAccessTokens {
    let mut tokens = MockAccessTokens::new();
    tokens
        .expect_issue()
        .returning(|principal| {
            Ok(AccessToken::new(format!(
                "{}:{}",
                principal.subject(),
                principal.role()
            )))
        });
    tokens
}

fn service_with(store: &InMemoryStore, tokens: MockAccessTokens) -> Service<MockAccessTokens> {
    AccountService::new(
        Arc::new(store.clone()),
        Arc::new(PlainPasswordHasher),
        Arc::new(tokens),
    )
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

fn registration(email: &str, role: Role) -> Registration {
    Registration::try_from_parts(email, "s3cret pass", role).expect("valid registration")
}

#[rstest]
#[case(Role::Employee, "dummy:employee")]
#[case(Role::Moderator, "dummy:moderator")]
#[tokio::test]
async fn dummy_login_issues_token_for_role(
    store: InMemoryStore,
    #[case] role: Role,
    #[case] expected: &str,
) {
    let service = service_with(&store, echo_tokens());

    let token = service.dummy_login(role).await.expect("token issued");

    assert_eq!(token.as_str(), expected);
}

#[rstest]
#[tokio::test]
async fn register_stores_hash_not_password(store: InMemoryStore) {
    let service = service_with(&store, echo_tokens());

    let account = service
        .register(&registration("Clerk@Example.com", Role::Employee))
        .await
        .expect("registered");

    assert_eq!(account.email().as_ref(), "clerk@example.com");
    assert_eq!(account.role(), Role::Employee);
    assert_eq!(account.password_hash().as_ref(), "plain$s3cret pass");
}

#[rstest]
#[tokio::test]
async fn duplicate_registration_conflicts(store: InMemoryStore) {
    let service = service_with(&store, echo_tokens());
    service
        .register(&registration("clerk@example.com", Role::Employee))
        .await
        .expect("first registration");

    let error = service
        .register(&registration("CLERK@example.com", Role::Moderator))
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn login_issues_token_for_account_principal(store: InMemoryStore) {
    let service = service_with(&store, echo_tokens());
    let account = service
        .register(&registration("boss@example.com", Role::Moderator))
        .await
        .expect("registered");

    let credentials =
        LoginCredentials::try_from_parts("boss@example.com", "s3cret pass").expect("valid");
    let token = service.login(&credentials).await.expect("login succeeds");

    assert_eq!(token.as_str(), format!("{}:moderator", account.id()));
}

#[rstest]
#[case("boss@example.com", "wrong")]
#[case("nobody@example.com", "s3cret pass")]
#[tokio::test]
async fn bad_credentials_are_unauthorized(
    store: InMemoryStore,
    #[case] email: &str,
    #[case] password: &str,
) {
    let service = service_with(&store, echo_tokens());
    service
        .register(&registration("boss@example.com", Role::Moderator))
        .await
        .expect("registered");

    let credentials = LoginCredentials::try_from_parts(email, password).expect("valid shape");
    let error = service.login(&credentials).await.expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn authenticate_maps_rejections_to_unauthorized(store: InMemoryStore) {
    let mut tokens = MockAccessTokens::new();
    tokens
        .expect_verify()
        .withf(|token| token == "expired")
        .returning(|_| Err(AccessTokenError::expired()));
    tokens
        .expect_verify()
        .withf(|token| token == "good")
        .returning(|_| Ok(Principal::new("5", Role::Employee)));
    let service = service_with(&store, tokens);

    let principal = service.authenticate("good").await.expect("valid token");
    assert_eq!(principal.role(), Role::Employee);

    let error = service.authenticate("expired").await.expect_err("expired");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn unavailable_storage_is_reported() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_email()
        .return_once(|_| Err(AccountRepositoryError::connection("pool exhausted")));
    let service = AccountService::new(
        Arc::new(accounts),
        Arc::new(PlainPasswordHasher),
        Arc::new(echo_tokens()),
    );

    let credentials =
        LoginCredentials::try_from_parts("boss@example.com", "pw").expect("valid shape");
    let error = service.login(&credentials).await.expect_err("storage down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
