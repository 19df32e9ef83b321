use validator::Validate;

use crate::entities::account::{Account, AccountResponse, LoginAccount, NewAccount};
use crate::entities::token::{AuthResponse, Claims};
use crate::errors::AuthError;
use crate::repositories::account::AccountRepository;
use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T>
where
    R: AccountRepository,
    T: TokenServiceRepository,
{
    pub account_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: AccountRepository,
    T: TokenServiceRepository,
{
    pub fn new(account_repo: R, token_service: T) -> Self {
        AuthHandler {
            account_repo,
            token_service
        }
    }

    /// Registers a new account and signs it in
    pub async fn register(&self, request: NewAccount) -> Result<AuthResponse, AuthError> {
        request.validate()?;
        let role = request.role
            .ok_or_else(|| AuthError::InvalidInput("role: Role is required".into()))?;

        let hashed_password = hash_password(&request.password)?;
        let insert = request.prepare_for_insert(role, hashed_password);

        let account = self.account_repo.create_account(&insert)
            .await
            .map_err(|e| {
                let err = AuthError::from(e);
                if matches!(err, AuthError::EmailTaken) {
                    tracing::info!("Registration rejected: email already registered");
                }
                err
            })?;

        tracing::info!(account_id = account.id, role = %account.role, "Account registered");
        self.create_auth_response(&account)
    }

    /// Checks credentials. Unknown email and wrong password produce the same error.
    pub async fn login(&self, request: LoginAccount) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let account = self.account_repo.get_account_by_email(request.email.trim())
            .await
            .map_err(AuthError::from)?;

        let Some(account) = account else {
            verify_against_dummy(&request.password);
            return Err(AuthError::WrongCredentials);
        };

        let is_password_valid = verify_password(&request.password, &account.password_hash)
            .map_err(|e| {
                tracing::warn!(account_id = account.id, "Stored password hash unusable: {}", e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        tracing::info!(account_id = account.id, "Account logged in successfully");
        self.create_auth_response(&account)
    }

    /// Resolves the account a verified token was issued for
    pub async fn current_account(&self, claims: &Claims) -> Result<AccountResponse, AuthError> {
        let account_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        self.account_repo.get_account_by_id(account_id)
            .await
            .map_err(AuthError::from)?
            .map(AccountResponse::from)
            .ok_or(AuthError::InvalidToken)
    }

    fn create_auth_response(&self, account: &Account) -> Result<AuthResponse, AuthError> {
        let token = self.token_service.create_jwt(account)?;
        Ok(AuthResponse::new(token, account.name.clone(), account.role))
    }
}
