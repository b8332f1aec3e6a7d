//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::{
        AuthServiceError, IssuedToken, NewUserToken, Principal, UserTokenUuid, generate_token,
        hash_token, repository::AuthRepository, validate_token,
    },
    domain::owners::UserUuid,
};

#[derive(Clone)]
pub struct AppAuthService {
    repository: Arc<dyn AuthRepository>,
}

impl AppAuthService {
    #[must_use]
    pub fn new(repository: Arc<dyn AuthRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AuthService for AppAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        validate_token(bearer_token).map_err(|_| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_token(&hash_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        Ok(Principal {
            user: token.user_uuid,
            is_admin: token.is_admin,
        })
    }

    async fn issue_token(
        &self,
        user: UserUuid,
        is_admin: bool,
    ) -> Result<IssuedToken, AuthServiceError> {
        let token = generate_token();

        let metadata = self
            .repository
            .create_token(NewUserToken {
                uuid: UserTokenUuid::new(),
                user_uuid: user,
                is_admin,
                token_hash: hash_token(&token),
            })
            .await?;

        Ok(IssuedToken { token, metadata })
    }

    async fn revoke_token(&self, token: UserTokenUuid) -> Result<(), AuthServiceError> {
        if self.repository.revoke_token(token).await? == 0 {
            return Err(AuthServiceError::NotFound);
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolves a raw bearer token to the user behind it.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;

    /// Issues a new token for `user`. The raw token is only ever returned here.
    async fn issue_token(
        &self,
        user: UserUuid,
        is_admin: bool,
    ) -> Result<IssuedToken, AuthServiceError>;

    async fn revoke_token(&self, token: UserTokenUuid) -> Result<(), AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates() -> TestResult {
        let ctx = TestContext::new();
        let user = UserUuid::new();

        let issued = ctx.auth.issue_token(user, true).await?;
        let principal = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(
            principal,
            Principal {
                user,
                is_admin: true
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let ctx = TestContext::new();

        let result = ctx.auth.authenticate_bearer(&generate_token()).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn malformed_token_is_not_found() {
        let ctx = TestContext::new();

        let result = ctx.auth.authenticate_bearer("Basic abc").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn revoked_token_no_longer_authenticates() -> TestResult {
        let ctx = TestContext::new();

        let issued = ctx.auth.issue_token(UserUuid::new(), false).await?;

        ctx.auth.revoke_token(issued.metadata.uuid).await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
