use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};
use uuid::Uuid;
use crate::entities::account::Account;
use crate::entities::token::Claims;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
        }
    }

    pub fn create_jwt(&self, account: &Account) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.access_expiration).timestamp().max(0) as usize;

        let claims = Claims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role,
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(|e| {
            tracing::warn!("Failed to encode JWT: {}", e);
            AuthError::TokenCreation
        })
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &self.keys.decoding,
            &validation
        )
        .map_err(AuthError::from)
    }
}

impl TokenServiceRepository for JwtService {
    fn create_jwt(&self, account: &Account) -> Result<String, AuthError> {
        self.create_jwt(account)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        self.decode_jwt(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::account::Role;
    use crate::settings::{AppEnvironment, LogFormat, StorageBackend};

    fn config(expiration_minutes: i64) -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            storage_backend: StorageBackend::Memory,
            database_url: String::new(),
            database_max_connections: 1,
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
            jwt_expiration_minutes: expiration_minutes,
            log_format: LogFormat::Pretty,
        }
    }

    fn account() -> Account {
        Account {
            id: 42,
            email: "alice@x.com".into(),
            name: "Alice".into(),
            role: Role::Employer,
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_decodes_to_account_claims() {
        let service = JwtService::new(&config(15));
        let token = service.create_jwt(&account()).unwrap();

        let claims = service.decode_jwt(&token).unwrap().claims;
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, Role::Employer);
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let service = JwtService::new(&config(15));
        let first = service.create_jwt(&account()).unwrap();
        let second = service.create_jwt(&account()).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default 60s leeway.
        let service = JwtService::new(&config(-5));
        let token = service.create_jwt(&account()).unwrap();

        assert!(matches!(service.decode_jwt(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let token = JwtService::new(&config(15)).create_jwt(&account()).unwrap();

        let mut other = config(15);
        other.jwt_secret = "a_completely_different_secret_of_sufficient_length".into();
        let result = JwtService::new(&other).decode_jwt(&token);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
