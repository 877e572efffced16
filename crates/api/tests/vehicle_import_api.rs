mod common;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use rust_xlsxwriter::Workbook;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    body_bytes, body_json, build_test_app, get_auth, login_token, post_json_auth, seed_account,
    seed_org,
};

async fn seed_admin_org(pool: &PgPool, name: &str, email: &str) -> (i64, String) {
    let org = seed_org(pool, name).await;
    seed_account(pool, org, email, "admin", "99999999", None).await;
    let token = login_token(build_test_app(pool.clone()), email).await;
    (org, token)
}

/// Build an .xlsx workbook with a header row and the given data rows.
fn build_workbook(rows: &[(&str, &str, f64)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "license_plate").unwrap();
    sheet.write_string(0, 1, "description").unwrap();
    sheet.write_string(0, 2, "capacity").unwrap();
    for (i, (plate, description, capacity)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, *plate).unwrap();
        sheet.write_string(row, 1, *description).unwrap();
        sheet.write_number(row, 2, *capacity).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

/// POST a file to the multipart import endpoint.
async fn post_file(app: Router, filename: &str, bytes: Vec<u8>, token: &str) -> Response<Body> {
    let boundary = "----import-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(&bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/vehicles/import/file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

// ---------------------------------------------------------------------------
// JSON batch import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_success(pool: PgPool) {
    let (org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/vehicles/import",
        json!({ "vehicles": [
            { "license_plate": "abc123", "description": "Toyota Hilux", "capacity": 5 },
            { "license_plate": "DEF456", "description": "VW Amarok", "capacity": 6 }
        ]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Se importaron 2 vehículos exitosamente");
    assert_eq!(body["importedCount"], 2);
    let imported = body["importedVehicles"].as_array().unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(imported[0]["license_plate"], "ABC123");
    assert_eq!(imported[0]["status"], "disponible");
    assert_eq!(imported[0]["organization_id"], org);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_all_or_nothing(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/vehicles/import",
        json!({ "vehicles": [
            { "license_plate": "ABC123", "description": "Toyota Hilux", "capacity": 5 },
            { "license_plate": "??", "description": "", "capacity": 0 }
        ]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Se encontraron errores en los datos");
    assert_eq!(body["importedCount"], 0);
    let errors: Vec<String> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap().to_string())
        .collect();
    // Only the first failing check per row is reported, data rows start at 2.
    assert_eq!(
        errors,
        vec!["Fila 3: Formato de patente inválido (ej: ABC123)".to_string()]
    );

    // The valid row was NOT inserted.
    let list = get_auth(build_test_app(pool), "/api/v1/vehicles", &token).await;
    let json = body_json(list).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_validation_messages(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/vehicles/import",
        json!({ "vehicles": [
            { "license_plate": "", "description": "Camioneta", "capacity": 4 },
            { "license_plate": "GHI789", "description": "Camioneta", "capacity": "mucha" },
            { "license_plate": "JKL012", "description": "   ", "capacity": 4 }
        ]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors: Vec<String> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        errors,
        vec![
            "Fila 2: La patente es requerida".to_string(),
            "Fila 3: La capacidad debe ser un número mayor a 0".to_string(),
            "Fila 4: La descripción es requerida".to_string(),
        ]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_duplicate_plate_in_database(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/vehicles",
        json!({ "license_plate": "ABC123", "description": "Existente", "capacity": 4 }),
        &token,
    )
    .await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/vehicles/import",
        json!({ "vehicles": [
            { "license_plate": "ABC123", "description": "Toyota Hilux", "capacity": 5 },
            { "license_plate": "DEF456", "description": "VW Amarok", "capacity": 6 }
        ]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0],
        "Fila 2: La patente ABC123 ya existe en la base de datos"
    );

    // Nothing new was inserted.
    let list = get_auth(build_test_app(pool), "/api/v1/vehicles", &token).await;
    let json = body_json(list).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_import_empty_batch(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/vehicles/import",
        json!({ "vehicles": [] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "No se recibieron vehículos para importar");
    assert_eq!(body["importedCount"], 0);
}

// ---------------------------------------------------------------------------
// File import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_file_import_success(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let bytes = build_workbook(&[("ABC123", "Toyota Hilux", 5.0), ("DEF456", "VW Amarok", 6.0)]);

    let response = post_file(build_test_app(pool), "flota.xlsx", bytes, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["importedCount"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_file_import_bad_extension(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let response = post_file(
        build_test_app(pool),
        "flota.csv",
        b"license_plate,description,capacity".to_vec(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Por favor selecciona un archivo Excel (.xlsx o .xls)"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_file_import_too_large(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let bytes = vec![0_u8; 10 * 1024 * 1024 + 1];

    let response = post_file(build_test_app(pool), "flota.xlsx", bytes, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "El archivo no puede superar 10MB");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_file_import_invalid_rows_rejected(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let bytes = build_workbook(&[("ABC123", "Toyota Hilux", 5.0), ("", "Sin patente", 4.0)]);

    let response = post_file(
        build_test_app(pool.clone()),
        "flota.xlsx",
        bytes,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Se encontraron errores en los datos");

    let list = get_auth(build_test_app(pool), "/api/v1/vehicles", &token).await;
    let json = body_json(list).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_template_download(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/vehicles/import/template",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"plantilla_vehiculos.xlsx\""
    );

    // The template itself imports cleanly.
    let bytes = body_bytes(response).await;
    let import = post_file(
        build_test_app(pool),
        "plantilla_vehiculos.xlsx",
        bytes,
        &token,
    )
    .await;
    assert_eq!(import.status(), StatusCode::OK);

    let body = body_json(import).await;
    assert_eq!(body["importedCount"], 2);
}
