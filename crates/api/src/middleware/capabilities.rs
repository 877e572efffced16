//! Capability-based authorization extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose resolved
//! capability set lacks the required capability. Use these in route handlers
//! to enforce authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use electo_core::error::CoreError;
use electo_core::roles::Capability;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require(
    parts: &mut Parts,
    state: &AppState,
    capability: Capability,
    denial: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !user.capabilities.contains(capability) {
        return Err(AppError::Core(CoreError::Forbidden(denial.into())));
    }
    Ok(user)
}

/// Requires the `ManageStaff` capability (admins). Rejects with 403 otherwise.
///
/// ```ignore
/// async fn staff_only(RequireManageStaff(user): RequireManageStaff) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManageStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireManageStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require(
            parts,
            state,
            Capability::ManageStaff,
            "Staff management permission required",
        )
        .await?;
        Ok(RequireManageStaff(user))
    }
}

/// Requires the `ManageFleet` capability (admins). Rejects with 403 otherwise.
pub struct RequireManageFleet(pub AuthUser);

impl FromRequestParts<AppState> for RequireManageFleet {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require(
            parts,
            state,
            Capability::ManageFleet,
            "Fleet management permission required",
        )
        .await?;
        Ok(RequireManageFleet(user))
    }
}

/// Requires the `RegisterVoters` capability (dirigentes).
pub struct RequireRegisterVoters(pub AuthUser);

impl FromRequestParts<AppState> for RequireRegisterVoters {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require(
            parts,
            state,
            Capability::RegisterVoters,
            "Voter registration permission required",
        )
        .await?;
        Ok(RequireRegisterVoters(user))
    }
}

/// Requires the `ViewDashboard` capability (admins).
pub struct RequireViewDashboard(pub AuthUser);

impl FromRequestParts<AppState> for RequireViewDashboard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require(
            parts,
            state,
            Capability::ViewDashboard,
            "Dashboard permission required",
        )
        .await?;
        Ok(RequireViewDashboard(user))
    }
}

/// Requires the `UseAssistant` capability (admins).
pub struct RequireUseAssistant(pub AuthUser);

impl FromRequestParts<AppState> for RequireUseAssistant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = require(
            parts,
            state,
            Capability::UseAssistant,
            "Assistant permission required",
        )
        .await?;
        Ok(RequireUseAssistant(user))
    }
}
