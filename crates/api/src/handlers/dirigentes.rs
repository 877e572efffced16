//! Handlers for the `/dirigentes` resource.
//!
//! Creating a dirigente provisions both the authentication identity and the
//! profile in one transaction, so a failure partway leaves no orphan login.

use std::sync::LazyLock;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use electo_core::error::CoreError;
use electo_core::import::DNI_RE;
use electo_core::roles::ROLE_DIRIGENTE;
use electo_core::types::DbId;
use electo_db::models::{CreateProfile, CreateUser, DirigenteWithVehicles, Profile, UpdateProfile};
use electo_db::repositories::{ProfileRepo, UserRepo, VehicleRepo};
use regex::Regex;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::capabilities::RequireManageStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Loose email shape check: one `@`, no whitespace, a dot in the domain.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile")
});

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /dirigentes`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

/// Request body for `POST /dirigentes`.
#[derive(Debug, Deserialize)]
pub struct CreateDirigenteRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub dni: String,
    #[serde(default)]
    pub address: String,
    pub operating_barrio: Option<String>,
}

/// Request body for `PUT /dirigentes/{id}`.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateDirigenteRequest {
    pub full_name: Option<String>,
    pub dni: Option<String>,
    pub address: Option<String>,
    pub operating_barrio: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/dirigentes
///
/// List the caller's organization's dirigentes with assigned-vehicle counts.
pub async fn list(
    RequireManageStaff(user): RequireManageStaff,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<DirigenteWithVehicles>>>> {
    let dirigentes = ProfileRepo::list_dirigentes(
        &state.pool,
        user.organization_id,
        params.search.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse::new(dirigentes)))
}

/// POST /api/v1/dirigentes
///
/// Create a dirigente account (auth identity + profile) in the caller's
/// organization. Returns 201 with the new profile.
pub async fn create(
    RequireManageStaff(user): RequireManageStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateDirigenteRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Profile>>)> {
    let email = input.email.trim().to_lowercase();
    let full_name = input.full_name.trim().to_string();
    let dni = input.dni.trim().to_string();
    let operating_barrio = input
        .operating_barrio
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    // Field-level validation, in a fixed order so messages are predictable.
    if email.is_empty()
        || input.password.is_empty()
        || full_name.is_empty()
        || dni.is_empty()
        || operating_barrio.is_empty()
    {
        return Err(AppError::Core(CoreError::Validation(
            "Todos los campos son requeridos".into(),
        )));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::Core(CoreError::Validation(
            "Formato de email inválido".into(),
        )));
    }
    if !DNI_RE.is_match(&dni) {
        return Err(AppError::Core(CoreError::Validation(
            "El DNI debe contener solo números".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // Duplicate checks before touching the database state. The unique
    // constraints still back these up against concurrent creates.
    if UserRepo::email_exists(&state.pool, &email).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "El email ya está registrado".into(),
        )));
    }
    if ProfileRepo::dni_exists(&state.pool, user.organization_id, &dni).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "El DNI ya está registrado en esta organización".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // User and profile land together or not at all.
    let mut tx = state.pool.begin().await?;
    let created_user = UserRepo::create(
        &mut tx,
        &CreateUser {
            email,
            password_hash,
        },
    )
    .await?;
    let profile = ProfileRepo::create(
        &mut tx,
        &CreateProfile {
            id: created_user.id,
            organization_id: user.organization_id,
            full_name,
            role: ROLE_DIRIGENTE.to_string(),
            dni,
            address: input.address.trim().to_string(),
            operating_barrio: Some(operating_barrio),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        profile_id = profile.id,
        organization_id = profile.organization_id,
        "Dirigente created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(profile))))
}

/// PUT /api/v1/dirigentes/{id}
///
/// Update a dirigente's profile fields.
pub async fn update(
    RequireManageStaff(user): RequireManageStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDirigenteRequest>,
) -> AppResult<Json<DataResponse<Profile>>> {
    if let Some(dni) = &input.dni {
        if !DNI_RE.is_match(dni.trim()) {
            return Err(AppError::Core(CoreError::Validation(
                "El DNI debe contener solo números".into(),
            )));
        }
    }

    let changes = UpdateProfile {
        full_name: input.full_name.map(|s| s.trim().to_string()),
        dni: input.dni.map(|s| s.trim().to_string()),
        address: input.address.map(|s| s.trim().to_string()),
        operating_barrio: input.operating_barrio.map(|s| s.trim().to_string()),
    };

    let profile = ProfileRepo::update(&state.pool, user.organization_id, id, &changes)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Dirigente".into(),
                id,
            })
        })?;

    Ok(Json(DataResponse::new(profile)))
}

/// DELETE /api/v1/dirigentes/{id}
///
/// Delete a dirigente account. Refused while vehicles remain assigned; the
/// dirigente's voter registrations are kept with the reference cleared.
pub async fn delete(
    RequireManageStaff(user): RequireManageStaff,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let profile = ProfileRepo::find_in_org(&state.pool, user.organization_id, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Dirigente".into(),
                id,
            })
        })?;

    if profile.role != ROLE_DIRIGENTE {
        return Err(AppError::Core(CoreError::Forbidden(
            "Solo se pueden eliminar cuentas de dirigente".into(),
        )));
    }

    let assigned = VehicleRepo::count_assigned_to(&state.pool, id).await?;
    if assigned > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "No se puede eliminar un dirigente con vehículos asignados".into(),
        )));
    }

    // Deleting the user cascades to the profile.
    UserRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
