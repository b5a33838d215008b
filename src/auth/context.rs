use super::Claims;
use uuid::Uuid;

/// Authenticated contractor context extracted from a verified JWT
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID (from JWT sub claim)
    pub user_id: Uuid,

    /// Tenant the user belongs to
    pub company_id: Uuid,

    /// User email if available
    pub email: Option<String>,

    /// User role if specified
    pub role: Option<String>,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims) -> Result<Self, &'static str> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token")?;
        let company_id = claims
            .company_id
            .as_deref()
            .ok_or("Token missing company claim")
            .and_then(|id| Uuid::parse_str(id).map_err(|_| "Invalid company ID in token"))?;

        Ok(Self {
            user_id,
            company_id,
            email: claims.email.clone(),
            role: claims.role.clone(),
        })
    }
}
