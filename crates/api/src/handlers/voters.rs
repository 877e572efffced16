//! Handlers for the `/voters` resource.
//!
//! Registrations are immutable; there is no update or delete. Every
//! successful registration is published on the event bus so dashboards
//! update in real time.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use electo_core::error::CoreError;
use electo_core::import::DNI_RE;
use electo_core::roles::Capability;
use electo_db::models::{CreateVoter, MobilizedVoter};
use electo_db::repositories::VoterRepo;
use electo_events::{DomainEvent, EVENT_VOTER_REGISTERED};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::capabilities::RequireRegisterVoters;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /voters`.
#[derive(Debug, Deserialize)]
pub struct CreateVoterRequest {
    pub full_name: String,
    pub dni: String,
    pub phone: String,
    pub destination_school: String,
}

/// POST /api/v1/voters
///
/// Register a mobilized voter, attributed to the calling dirigente.
pub async fn create(
    RequireRegisterVoters(user): RequireRegisterVoters,
    State(state): State<AppState>,
    Json(input): Json<CreateVoterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MobilizedVoter>>)> {
    let full_name = input.full_name.trim().to_string();
    let dni = input.dni.trim().to_string();
    let phone = input.phone.trim().to_string();
    let destination_school = input.destination_school.trim().to_string();

    if full_name.is_empty() || dni.is_empty() || phone.is_empty() || destination_school.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Todos los campos son requeridos".into(),
        )));
    }
    if !DNI_RE.is_match(&dni) {
        return Err(AppError::Core(CoreError::Validation(
            "El DNI debe contener solo números".into(),
        )));
    }

    let voter = VoterRepo::create(
        &state.pool,
        &CreateVoter {
            organization_id: user.organization_id,
            full_name,
            dni,
            phone,
            destination_school,
            registered_by: user.profile_id,
        },
    )
    .await?;

    // Feed subscribers in the same organization see the new registration.
    let payload = serde_json::to_value(&voter).unwrap_or_default();
    state.event_bus.publish(
        DomainEvent::new(EVENT_VOTER_REGISTERED, user.organization_id)
            .with_entity(voter.id)
            .with_actor(user.profile_id)
            .with_payload(payload),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(voter))))
}

/// GET /api/v1/voters
///
/// List registrations: dirigentes see their own, dashboard viewers see the
/// whole organization.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MobilizedVoter>>>> {
    let voters = if user.capabilities.contains(Capability::ViewDashboard) {
        VoterRepo::list_for_org(&state.pool, user.organization_id).await?
    } else if user.capabilities.contains(Capability::RegisterVoters) {
        VoterRepo::list_registered_by(&state.pool, user.organization_id, user.profile_id).await?
    } else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Voter access permission required".into(),
        )));
    };

    Ok(Json(DataResponse::new(voters)))
}
