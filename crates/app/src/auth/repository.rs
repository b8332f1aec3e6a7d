//! Auth repository.

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    auth::models::{NewUserToken, UserToken, UserTokenUuid},
    database::Db,
    domain::owners::UserUuid,
    storage::RepositoryError,
};

const CREATE_USER_TOKEN_SQL: &str = include_str!("sql/create_user_token.sql");
const FIND_ACTIVE_USER_TOKEN_SQL: &str = include_str!("sql/find_active_user_token.sql");
const REVOKE_USER_TOKEN_SQL: &str = include_str!("sql/revoke_user_token.sql");

#[automock]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_token(&self, token: NewUserToken) -> Result<UserToken, RepositoryError>;

    /// The unrevoked token with the given hash.
    async fn find_active_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserToken>, RepositoryError>;

    async fn revoke_token(&self, token: UserTokenUuid) -> Result<u64, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    db: Db,
}

impl PgAuthRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthRepository for PgAuthRepository {
    async fn create_token(&self, token: NewUserToken) -> Result<UserToken, RepositoryError> {
        let created = query_as::<Postgres, UserToken>(CREATE_USER_TOKEN_SQL)
            .bind(token.uuid.into_uuid())
            .bind(token.user_uuid.into_uuid())
            .bind(token.is_admin)
            .bind(token.token_hash)
            .fetch_one(self.db.pool())
            .await?;

        Ok(created)
    }

    async fn find_active_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserToken>, RepositoryError> {
        let token = query_as::<Postgres, UserToken>(FIND_ACTIVE_USER_TOKEN_SQL)
            .bind(token_hash)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(token)
    }

    async fn revoke_token(&self, token: UserTokenUuid) -> Result<u64, RepositoryError> {
        let rows_affected = query(REVOKE_USER_TOKEN_SQL)
            .bind(token.into_uuid())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for UserToken {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserTokenUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            is_admin: row.try_get("is_admin")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            revoked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("revoked_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
