//! Handlers for the `/vehicles` resource, including the bulk import.
//!
//! The bulk import is all-or-nothing: every row is validated (and checked
//! against existing plates) before a single insert happens, and the inserts
//! run in one transaction so a concurrent duplicate still fails the whole
//! batch via the unique plate constraint.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use electo_core::error::CoreError;
use electo_core::import::{normalize_plate, validate_rows, RawVehicleRow, PLATE_RE};
use electo_core::roles::Capability;
use electo_core::status::VehicleStatus;
use electo_core::types::DbId;
use electo_db::models::{CreateVehicle, UpdateVehicle, Vehicle, VehicleWithDirigente};
use electo_db::repositories::{ProfileRepo, VehicleRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::import::{build_template, parse_workbook, ImportFileError, TEMPLATE_FILENAME};
use crate::middleware::auth::AuthUser;
use crate::middleware::capabilities::RequireManageFleet;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /vehicles`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
}

/// Request body for `POST /vehicles`.
#[derive(Debug, Deserialize)]
pub struct CreateVehicleRequest {
    pub license_plate: String,
    pub description: String,
    pub capacity: i32,
    pub assigned_dirigente_id: Option<DbId>,
}

/// Request body for `PUT /vehicles/{id}`.
///
/// For `assigned_dirigente_id`, an explicit `null` unassigns the vehicle
/// while omitting the field keeps the current assignment.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateVehicleRequest {
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_dirigente_id: Option<Option<DbId>>,
}

/// Deserialize into the outer `Some` so an absent field (`None`) stays
/// distinguishable from an explicit null (`Some(None)`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}

/// Request body for `PATCH /vehicles/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `POST /vehicles/import`.
#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    #[serde(default)]
    pub vehicles: Vec<RawVehicleRow>,
}

/// Response for a failed bulk import: per-row Spanish messages, nothing
/// imported.
#[derive(Debug, Serialize)]
pub struct BulkImportErrorResponse {
    pub error: String,
    pub errors: Vec<String>,
    #[serde(rename = "importedCount")]
    pub imported_count: usize,
}

/// Response for a successful bulk import.
#[derive(Debug, Serialize)]
pub struct BulkImportSuccessResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "importedCount")]
    pub imported_count: usize,
    #[serde(rename = "importedVehicles")]
    pub imported_vehicles: Vec<Vehicle>,
}

/// Either outcome of the import pipeline, with its HTTP status.
pub enum BulkImportOutcome {
    Rejected(BulkImportErrorResponse),
    Imported(BulkImportSuccessResponse),
}

impl IntoResponse for BulkImportOutcome {
    fn into_response(self) -> axum::response::Response {
        match self {
            BulkImportOutcome::Rejected(body) => {
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            BulkImportOutcome::Imported(body) => (StatusCode::OK, Json(body)).into_response(),
        }
    }
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/vehicles
///
/// List the fleet with assigned dirigente names. Admins see the whole
/// organization; dirigentes see only the vehicles assigned to them.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<VehicleWithDirigente>>>> {
    if let Some(status) = params.status.as_deref() {
        parse_status(status)?;
    }
    let fleet_wide = user.capabilities.contains(Capability::ManageFleet)
        || user.capabilities.contains(Capability::ViewDashboard);

    let vehicles = if fleet_wide {
        VehicleRepo::list(
            &state.pool,
            user.organization_id,
            params.search.as_deref(),
            params.status.as_deref(),
        )
        .await?
    } else if user.capabilities.contains(Capability::UpdateAssignedVehicle) {
        VehicleRepo::list_assigned_to(&state.pool, user.organization_id, user.profile_id).await?
    } else {
        return Err(AppError::Core(CoreError::Forbidden(
            "Vehicle access permission required".into(),
        )));
    };
    Ok(Json(DataResponse::new(vehicles)))
}

/// POST /api/v1/vehicles
///
/// Create a single vehicle. Plates are globally unique.
pub async fn create(
    RequireManageFleet(user): RequireManageFleet,
    State(state): State<AppState>,
    Json(input): Json<CreateVehicleRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Vehicle>>)> {
    let license_plate = normalize_plate(&input.license_plate);
    if !PLATE_RE.is_match(&license_plate) {
        return Err(AppError::Core(CoreError::Validation(
            "Formato de patente inválido (ej: ABC123)".into(),
        )));
    }
    let description = input.description.trim().to_string();
    if description.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "La descripción es requerida".into(),
        )));
    }
    if input.capacity < 1 {
        return Err(AppError::Core(CoreError::Validation(
            "La capacidad debe ser un número mayor a 0".into(),
        )));
    }
    if VehicleRepo::plate_exists(&state.pool, &license_plate).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "La patente {license_plate} ya existe en la base de datos"
        ))));
    }
    if let Some(dirigente_id) = input.assigned_dirigente_id {
        ensure_assignable(&state, user.organization_id, dirigente_id).await?;
    }

    let vehicle = VehicleRepo::create(
        &state.pool,
        &CreateVehicle {
            organization_id: user.organization_id,
            license_plate,
            description,
            capacity: input.capacity,
            status: VehicleStatus::Disponible.as_str().to_string(),
            assigned_dirigente_id: input.assigned_dirigente_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(vehicle))))
}

/// PUT /api/v1/vehicles/{id}
///
/// Update a vehicle. Passing `assigned_dirigente_id: null` unassigns it;
/// omitting the field keeps the current assignment.
pub async fn update(
    RequireManageFleet(user): RequireManageFleet,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVehicleRequest>,
) -> AppResult<Json<DataResponse<Vehicle>>> {
    if let Some(status) = input.status.as_deref() {
        parse_status(status)?;
    }
    if let Some(capacity) = input.capacity {
        if capacity < 1 {
            return Err(AppError::Core(CoreError::Validation(
                "La capacidad debe ser un número mayor a 0".into(),
            )));
        }
    }
    if let Some(Some(dirigente_id)) = input.assigned_dirigente_id {
        ensure_assignable(&state, user.organization_id, dirigente_id).await?;
    }

    let changes = UpdateVehicle {
        description: input.description.map(|s| s.trim().to_string()),
        capacity: input.capacity,
        status: input.status,
        assigned_dirigente_id: input.assigned_dirigente_id,
    };

    let vehicle = VehicleRepo::update(&state.pool, user.organization_id, id, &changes)
        .await?
        .ok_or_else(|| vehicle_not_found(id))?;

    Ok(Json(DataResponse::new(vehicle)))
}

/// PATCH /api/v1/vehicles/{id}/status
///
/// Change a vehicle's status. Admins may change any vehicle in their
/// organization; dirigentes only vehicles currently assigned to them.
pub async fn update_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Vehicle>>> {
    if !user.capabilities.contains(Capability::UpdateAssignedVehicle) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Vehicle status permission required".into(),
        )));
    }
    let status = parse_status(&input.status)?;

    let vehicle = VehicleRepo::find_in_org(&state.pool, user.organization_id, id)
        .await?
        .ok_or_else(|| vehicle_not_found(id))?;

    // Without fleet management rights, the caller must be the assigned
    // dirigente.
    if !user.capabilities.contains(Capability::ManageFleet)
        && vehicle.assigned_dirigente_id != Some(user.profile_id)
    {
        return Err(AppError::Core(CoreError::Forbidden(
            "El vehículo no está asignado a este dirigente".into(),
        )));
    }

    let updated = VehicleRepo::update_status(&state.pool, user.organization_id, id, status)
        .await?
        .ok_or_else(|| vehicle_not_found(id))?;

    Ok(Json(DataResponse::new(updated)))
}

/// DELETE /api/v1/vehicles/{id}
///
/// Delete a vehicle. Refused while the vehicle is on a trip.
pub async fn delete(
    RequireManageFleet(user): RequireManageFleet,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let vehicle = VehicleRepo::find_in_org(&state.pool, user.organization_id, id)
        .await?
        .ok_or_else(|| vehicle_not_found(id))?;

    if vehicle.status == VehicleStatus::EnViaje.as_str() {
        return Err(AppError::Core(CoreError::Conflict(
            "No se puede eliminar un vehículo en viaje".into(),
        )));
    }

    VehicleRepo::delete(&state.pool, user.organization_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Bulk import handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/vehicles/import
///
/// Bulk-import vehicles from a JSON batch. All-or-nothing.
pub async fn import(
    RequireManageFleet(user): RequireManageFleet,
    State(state): State<AppState>,
    Json(input): Json<BulkImportRequest>,
) -> AppResult<BulkImportOutcome> {
    if input.vehicles.is_empty() {
        return Ok(BulkImportOutcome::Rejected(BulkImportErrorResponse {
            error: "No se recibieron vehículos para importar".into(),
            errors: vec![
                "El cuerpo de la solicitud debe contener un array de vehículos".into(),
            ],
            imported_count: 0,
        }));
    }
    run_import(&state, user.organization_id, &input.vehicles).await
}

/// POST /api/v1/vehicles/import/file
///
/// Bulk-import vehicles from an uploaded `.xlsx`/`.xls` workbook. The file
/// goes through the same validation pipeline as the JSON batch.
pub async fn import_file(
    RequireManageFleet(user): RequireManageFleet,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<BulkImportOutcome> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or(TEMPLATE_FILENAME).to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "No se recibieron vehículos para importar".into(),
        ))
    })?;

    let rows = match parse_workbook(&filename, &bytes) {
        Ok(rows) => rows,
        Err(e @ (ImportFileError::UnsupportedExtension | ImportFileError::TooLarge)) => {
            return Err(AppError::Core(CoreError::Validation(e.to_string())));
        }
        Err(e) => {
            return Ok(BulkImportOutcome::Rejected(BulkImportErrorResponse {
                error: e.to_string(),
                errors: vec![],
                imported_count: 0,
            }));
        }
    };

    run_import(&state, user.organization_id, &rows).await
}

/// GET /api/v1/vehicles/import/template
///
/// Download the example workbook for the bulk import.
pub async fn import_template(
    RequireManageFleet(_user): RequireManageFleet,
) -> AppResult<impl IntoResponse> {
    let bytes = build_template()
        .map_err(|e| AppError::InternalError(format!("Template generation error: {e}")))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{TEMPLATE_FILENAME}\""),
            ),
        ],
        bytes,
    ))
}

/// Shared import pipeline: validate every row, check plates against the
/// database, then insert the whole batch in one transaction.
async fn run_import(
    state: &AppState,
    organization_id: DbId,
    rows: &[RawVehicleRow],
) -> AppResult<BulkImportOutcome> {
    let (valid, mut errors) = validate_rows(rows);

    // Plates that already exist anywhere in the system reject their row,
    // reported with the same row numbering as the field errors.
    for row in &valid {
        if VehicleRepo::plate_exists(&state.pool, &row.license_plate).await? {
            errors.push(format!(
                "Fila {}: La patente {} ya existe en la base de datos",
                row.row, row.license_plate
            ));
        }
    }

    if !errors.is_empty() {
        errors.sort_by_key(|e| row_number(e));
        return Ok(BulkImportOutcome::Rejected(BulkImportErrorResponse {
            error: "Se encontraron errores en los datos".into(),
            errors,
            imported_count: 0,
        }));
    }

    let mut tx = state.pool.begin().await?;
    let imported = VehicleRepo::insert_batch(&mut tx, organization_id, &valid).await?;
    tx.commit().await?;

    let count = imported.len();
    tracing::info!(organization_id, count, "Bulk vehicle import committed");

    Ok(BulkImportOutcome::Imported(BulkImportSuccessResponse {
        success: true,
        message: format!("Se importaron {count} vehículos exitosamente"),
        imported_count: count,
        imported_vehicles: imported,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn vehicle_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Vehículo".into(),
        id,
    })
}

/// Parse a canonical status value, rejecting anything else.
fn parse_status(raw: &str) -> AppResult<VehicleStatus> {
    VehicleStatus::parse(raw).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Estado de vehículo inválido: {raw}"
        )))
    })
}

/// Verify the assignment target is a dirigente of the caller's organization.
async fn ensure_assignable(
    state: &AppState,
    organization_id: DbId,
    dirigente_id: DbId,
) -> AppResult<()> {
    if !ProfileRepo::is_dirigente_in_org(&state.pool, organization_id, dirigente_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "El dirigente asignado no pertenece a esta organización".into(),
        )));
    }
    Ok(())
}

/// Extract the leading "Fila N" number for stable error ordering.
fn row_number(message: &str) -> usize {
    message
        .strip_prefix("Fila ")
        .and_then(|rest| rest.split(':').next())
        .and_then(|n| n.trim().parse().ok())
        .unwrap_or(usize::MAX)
}
