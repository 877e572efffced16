//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use electo_core::error::CoreError;
use electo_core::roles::{capabilities_for_role, CapabilitySet};
use electo_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Carries the caller's organization and resolved capability set so handlers
/// never re-derive permissions from the raw role string.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(profile_id = user.profile_id, org = user.organization_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's profile id (from `claims.sub`).
    pub profile_id: DbId,
    /// The caller's role name (`"dirigente"`, `"admin"`, `"superadmin"`).
    pub role: String,
    /// The caller's organization. All data access is scoped to it.
    pub organization_id: DbId,
    /// Capabilities resolved from the role at extraction time.
    pub capabilities: CapabilitySet,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let capabilities = capabilities_for_role(&claims.role);

        Ok(AuthUser {
            profile_id: claims.sub,
            role: claims.role,
            organization_id: claims.org,
            capabilities,
        })
    }
}
