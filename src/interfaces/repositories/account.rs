use std::{borrow::Cow, sync::Arc};

use async_trait::async_trait;

use crate::{
    entities::account::{Account, AccountInsert},
    errors::AppError,
    repositories::{memory_repo::MemoryStore, sqlx_repo::SqlxAccountRepo},
};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn create_account(&self, account: &AccountInsert) -> Result<Account, AppError>;
    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>, AppError>;
}

#[async_trait]
impl<T: AccountRepository + ?Sized> AccountRepository for Arc<T> {
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn create_account(&self, account: &AccountInsert) -> Result<Account, AppError> {
        (**self).create_account(account).await
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        (**self).get_account_by_email(email).await
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        (**self).get_account_by_id(id).await
    }
}

impl SqlxAccountRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxAccountRepo { pool }
    }
}

#[async_trait]
impl AccountRepository for SqlxAccountRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_account(&self, account: &AccountInsert) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, name, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(&account.email)
        .bind(&account.name)
        .bind(account.role)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            match e {
                sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                    AppError::Conflict("Email already registered".to_string())
                }
                _ => AppError::from(e),
            }
        })
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_account(&self, account: &AccountInsert) -> Result<Account, AppError> {
        let mut tables = self.tables.write();

        if tables.accounts.values().any(|a| a.email == account.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let id = tables.next_account_id();
        let created = Account {
            id,
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role,
            password_hash: account.password_hash.clone(),
            created_at: account.created_at,
        };
        tables.accounts.insert(id, created.clone());
        Ok(created)
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        Ok(self.tables
            .read()
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        Ok(self.tables.read().accounts.get(&id).cloned())
    }
}
