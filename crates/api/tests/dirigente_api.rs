mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    body_json, build_test_app, delete_auth, get_auth, login_token, post_json_auth, put_json_auth,
    seed_account, seed_org,
};

/// Seed an org with an admin and return (org_id, admin_token).
async fn seed_admin_org(pool: &PgPool, name: &str, email: &str) -> (i64, String) {
    let org = seed_org(pool, name).await;
    seed_account(pool, org, email, "admin", "99999999", None).await;
    let token = login_token(build_test_app(pool.clone()), email).await;
    (org, token)
}

fn valid_create_body() -> serde_json::Value {
    json!({
        "email": "nuevo@org.test",
        "password": "super-secreta-123",
        "full_name": "Juan Pérez",
        "dni": "12345678",
        "address": "Av. Siempreviva 742",
        "operating_barrio": "Centro"
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dirigente(pool: PgPool) {
    let (org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/dirigentes",
        valid_create_body(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["full_name"], "Juan Pérez");
    assert_eq!(body["data"]["role"], "dirigente");
    assert_eq!(body["data"]["organization_id"], org);
    assert_eq!(body["data"]["operating_barrio"], "Centro");

    // The new account can log in immediately.
    let login = common::post_json(
        build_test_app(pool),
        "/api/v1/auth/login",
        json!({ "email": "nuevo@org.test", "password": "super-secreta-123" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dirigente_missing_fields(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let mut body = valid_create_body();
    body["full_name"] = json!("   ");

    let response = post_json_auth(build_test_app(pool), "/api/v1/dirigentes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Todos los campos son requeridos");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dirigente_requires_operating_barrio(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let mut body = valid_create_body();
    body.as_object_mut().unwrap().remove("operating_barrio");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/dirigentes",
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Todos los campos son requeridos");

    // A blank barrio is just as missing.
    let mut body = valid_create_body();
    body["operating_barrio"] = json!("   ");
    let response = post_json_auth(build_test_app(pool), "/api/v1/dirigentes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dirigente_bad_email(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let mut body = valid_create_body();
    body["email"] = json!("no-es-un-email");

    let response = post_json_auth(build_test_app(pool), "/api/v1/dirigentes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Formato de email inválido");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dirigente_bad_dni(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let mut body = valid_create_body();
    body["dni"] = json!("12a45678");

    let response = post_json_auth(build_test_app(pool), "/api/v1/dirigentes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "El DNI debe contener solo números");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dirigente_short_password(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let mut body = valid_create_body();
    body["password"] = json!("corta");

    let response = post_json_auth(build_test_app(pool), "/api/v1/dirigentes", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "La contraseña debe tener al menos 8 caracteres"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dirigente_duplicate_email(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let first = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/dirigentes",
        valid_create_body(),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut body = valid_create_body();
    body["dni"] = json!("87654321");
    let second = post_json_auth(build_test_app(pool), "/api/v1/dirigentes", body, &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let json = body_json(second).await;
    assert_eq!(json["error"], "El email ya está registrado");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_dirigente_duplicate_dni_same_org(pool: PgPool) {
    let (_org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;

    let first = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/dirigentes",
        valid_create_body(),
        &token,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut body = valid_create_body();
    body["email"] = json!("otro@org.test");
    let second = post_json_auth(build_test_app(pool), "/api/v1/dirigentes", body, &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let json = body_json(second).await;
    assert_eq!(json["error"], "El DNI ya está registrado en esta organización");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_same_dni_allowed_across_orgs(pool: PgPool) {
    let (_org_a, token_a) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let (_org_b, token_b) = seed_admin_org(&pool, "Org B", "admin@org-b.test").await;

    let first = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/dirigentes",
        valid_create_body(),
        &token_a,
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut body = valid_create_body();
    body["email"] = json!("nuevo@org-b.test");
    let second = post_json_auth(build_test_app(pool), "/api/v1/dirigentes", body, &token_b).await;
    assert_eq!(second.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_dirigente_cannot_manage_staff(pool: PgPool) {
    let org = seed_org(&pool, "Org A").await;
    seed_account(&pool, org, "lider@org-a.test", "dirigente", "22222222", None).await;
    let token = login_token(build_test_app(pool.clone()), "lider@org-a.test").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/dirigentes",
        valid_create_body(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Staff management permission required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_dirigentes_scoped_to_org(pool: PgPool) {
    let (org_a, token_a) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let (org_b, _token_b) = seed_admin_org(&pool, "Org B", "admin@org-b.test").await;
    seed_account(&pool, org_a, "a1@org-a.test", "dirigente", "10000001", None).await;
    seed_account(&pool, org_a, "a2@org-a.test", "dirigente", "10000002", None).await;
    seed_account(&pool, org_b, "b1@org-b.test", "dirigente", "10000001", None).await;

    let response = get_auth(build_test_app(pool), "/api/v1/dirigentes", &token_a).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json["data"].as_array().expect("data must be an array");
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row["organization_id"], org_a);
        assert_eq!(row["vehicles_count"], 0);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_dirigentes_search(pool: PgPool) {
    let (org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    seed_account(&pool, org, "ana@org-a.test", "dirigente", "10000001", None).await;
    seed_account(&pool, org, "beto@org-a.test", "dirigente", "10000002", None).await;

    let response = get_auth(
        build_test_app(pool),
        "/api/v1/dirigentes?search=ana",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["full_name"], "Test ana@org-a.test");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_dirigente(pool: PgPool) {
    let (org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let id = seed_account(&pool, org, "lider@org-a.test", "dirigente", "10000001", None).await;

    let response = put_json_auth(
        build_test_app(pool),
        &format!("/api/v1/dirigentes/{id}"),
        json!({ "full_name": "Nombre Nuevo", "operating_barrio": "Norte" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["full_name"], "Nombre Nuevo");
    assert_eq!(json["data"]["operating_barrio"], "Norte");
    // Untouched fields keep their values.
    assert_eq!(json["data"]["dni"], "10000001");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_dirigente_in_other_org_is_404(pool: PgPool) {
    let (_org_a, token_a) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let (org_b, _token_b) = seed_admin_org(&pool, "Org B", "admin@org-b.test").await;
    let foreign = seed_account(&pool, org_b, "b1@org-b.test", "dirigente", "10000001", None).await;

    let response = put_json_auth(
        build_test_app(pool),
        &format!("/api/v1/dirigentes/{foreign}"),
        json!({ "full_name": "Hijacked" }),
        &token_a,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_dirigente(pool: PgPool) {
    let (org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let id = seed_account(&pool, org, "lider@org-a.test", "dirigente", "10000001", None).await;

    let response = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/dirigentes/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The cascade removed both the profile and the login.
    let login = common::post_json(
        build_test_app(pool),
        "/api/v1/auth/login",
        json!({ "email": "lider@org-a.test", "password": common::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_dirigente_with_assigned_vehicle_is_409(pool: PgPool) {
    let (org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let id = seed_account(&pool, org, "lider@org-a.test", "dirigente", "10000001", None).await;

    let created = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/vehicles",
        json!({
            "license_plate": "ABC123",
            "description": "Toyota Hilux",
            "capacity": 5,
            "assigned_dirigente_id": id
        }),
        &token,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = delete_auth(
        build_test_app(pool),
        &format!("/api/v1/dirigentes/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "No se puede eliminar un dirigente con vehículos asignados"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_admin_account_refused(pool: PgPool) {
    let (org, token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let other_admin = seed_account(&pool, org, "admin2@org-a.test", "admin", "10000001", None).await;

    let response = delete_auth(
        build_test_app(pool),
        &format!("/api/v1/dirigentes/{other_admin}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Solo se pueden eliminar cuentas de dirigente");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_dirigente_keeps_voter_rows(pool: PgPool) {
    let (org, admin_token) = seed_admin_org(&pool, "Org A", "admin@org-a.test").await;
    let id = seed_account(&pool, org, "lider@org-a.test", "dirigente", "10000001", None).await;
    let dirigente_token = login_token(build_test_app(pool.clone()), "lider@org-a.test").await;

    let registered = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/voters",
        json!({
            "full_name": "Votante Uno",
            "dni": "40111222",
            "phone": "1155550000",
            "destination_school": "Escuela 12"
        }),
        &dirigente_token,
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);

    let deleted = delete_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/dirigentes/{id}"),
        &admin_token,
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    // The registration survives with its reference cleared.
    let response = get_auth(build_test_app(pool), "/api/v1/voters", &admin_token).await;
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0]["registered_by"].is_null());
}
