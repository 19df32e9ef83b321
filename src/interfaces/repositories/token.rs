use jsonwebtoken::TokenData;
use crate::{entities::{account::Account, token::Claims}, errors::AuthError};

pub trait TokenServiceRepository: Send + Sync {
    /// Issues a signed session token for the account
    fn create_jwt(&self, account: &Account) -> Result<String, AuthError>;

    /// Verifies a session token and returns its claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
