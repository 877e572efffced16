//! Handler for the `/assistant/ask` endpoint.
//!
//! Builds the organization's data snapshot, renders it into the prompt, and
//! queries the configured chat backend. The snapshot is echoed back so the
//! client can show what the answer was grounded on.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use electo_core::error::CoreError;
use electo_db::repositories::{ProfileRepo, VehicleRepo, VoterRepo};
use serde::{Deserialize, Serialize};

use crate::assistant::{
    build_prompt, context::performance_entry, ChatRequest, DataContext, SYSTEM_PROMPT,
};
use crate::error::{AppError, AppResult};
use crate::middleware::capabilities::RequireUseAssistant;
use crate::state::AppState;

/// Request body for `POST /assistant/ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

/// Response body: the answer plus the data snapshot it was grounded on.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub response_time_ms: u64,
    pub data_context: DataContext,
}

/// POST /api/v1/assistant/ask
pub async fn ask(
    RequireUseAssistant(user): RequireUseAssistant,
    State(state): State<AppState>,
    Json(input): Json<AskRequest>,
) -> AppResult<Json<AskResponse>> {
    let question = input.question.trim();
    if question.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "La pregunta es requerida".into(),
        )));
    }

    let chat_model = state.chat_model.as_ref().ok_or_else(|| {
        AppError::Configuration("Error de configuración: API key de IA no disponible".into())
    })?;

    let context = build_data_context(&state, user.organization_id).await?;
    let prompt = build_prompt(&context, question);

    let started = Instant::now();
    let answer = chat_model
        .complete(ChatRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: prompt,
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Assistant backend error: {e}")))?;
    let response_time_ms = started.elapsed().as_millis() as u64;

    Ok(Json(AskResponse {
        answer,
        response_time_ms,
        data_context: context,
    }))
}

/// Fetch and assemble the organization's snapshot for the prompt.
async fn build_data_context(
    state: &AppState,
    organization_id: electo_core::types::DbId,
) -> AppResult<DataContext> {
    let total_voters = VoterRepo::count_for_org(&state.pool, organization_id).await?;
    let dirigentes = ProfileRepo::list_dirigente_profiles(&state.pool, organization_id).await?;
    let vehicles = VehicleRepo::list_all(&state.pool, organization_id).await?;
    let counts = VoterRepo::counts_by_dirigente(&state.pool, organization_id).await?;

    let dirigente_performance = dirigentes
        .iter()
        .map(|d| {
            let voters_count = counts
                .iter()
                .find(|(id, _)| *id == d.id)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            performance_entry(
                &d.full_name,
                &d.dni,
                voters_count,
                d.operating_barrio.as_deref(),
            )
        })
        .collect();

    let mut vehicles_by_status: BTreeMap<String, i64> = BTreeMap::new();
    for vehicle in &vehicles {
        *vehicles_by_status.entry(vehicle.status.clone()).or_insert(0) += 1;
    }

    Ok(DataContext {
        total_voters,
        total_dirigentes: dirigentes.len() as i64,
        total_vehicles: vehicles.len() as i64,
        dirigente_performance,
        vehicles_by_status,
    })
}
