//! Access-token claims and named permissions.
//!
//! Accounts and tokens are issued by an external identity service; this server
//! validates bearer tokens signed with the shared secret.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Named permissions carried by an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CanRenew,
    CanMarkReturned,
    CanEditAuthors,
    CanEditBooks,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CanRenew => "can_renew",
            Permission::CanMarkReturned => "can_mark_returned",
            Permission::CanEditAuthors => "can_edit_authors",
            Permission::CanEditBooks => "can_edit_books",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User id
    pub sub: i32,
    pub username: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

impl UserClaims {
    /// Sign the claims (HS256)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            self,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Decode and validate a token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<UserClaims>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
            &jsonwebtoken::Validation::default(),
        )?;
        Ok(data.claims)
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("Missing permission {}", permission)))
        }
    }
}
