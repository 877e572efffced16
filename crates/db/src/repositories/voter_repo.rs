//! Repository for the `mobilized_voters` table.

use electo_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::voter::{CreateVoter, MobilizedVoter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, full_name, dni, phone, destination_school, \
                        registered_by, created_at";

/// Provides read and insert operations for voter registrations. There is no
/// update or delete; registrations are immutable.
pub struct VoterRepo;

impl VoterRepo {
    /// Insert a new registration, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateVoter) -> Result<MobilizedVoter, sqlx::Error> {
        let query = format!(
            "INSERT INTO mobilized_voters (organization_id, full_name, dni, phone, destination_school, registered_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MobilizedVoter>(&query)
            .bind(input.organization_id)
            .bind(&input.full_name)
            .bind(&input.dni)
            .bind(&input.phone)
            .bind(&input.destination_school)
            .bind(input.registered_by)
            .fetch_one(pool)
            .await
    }

    /// List an organization's registrations, newest first.
    pub async fn list_for_org(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<MobilizedVoter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mobilized_voters
             WHERE organization_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, MobilizedVoter>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// List the registrations made by one profile, newest first.
    pub async fn list_registered_by(
        pool: &PgPool,
        organization_id: DbId,
        profile_id: DbId,
    ) -> Result<Vec<MobilizedVoter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mobilized_voters
             WHERE organization_id = $1 AND registered_by = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, MobilizedVoter>(&query)
            .bind(organization_id)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    /// Total registrations for an organization.
    pub async fn count_for_org(pool: &PgPool, organization_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM mobilized_voters WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Registration timestamps since a cutoff, oldest first. Feeds the
    /// hour-of-day histogram.
    pub async fn timestamps_since(
        pool: &PgPool,
        organization_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<Timestamp>, sqlx::Error> {
        let rows: Vec<(Timestamp,)> = sqlx::query_as(
            "SELECT created_at FROM mobilized_voters
             WHERE organization_id = $1 AND created_at >= $2
             ORDER BY created_at ASC",
        )
        .bind(organization_id)
        .bind(since)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(ts,)| ts).collect())
    }

    /// `(registered_by, full_name)` pairs for every attributed registration,
    /// oldest first. Feeds the dirigente performance ranking; ordering
    /// determines tie-breaks, so it must be stable.
    pub async fn performance_rows(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT mv.registered_by, p.full_name
             FROM mobilized_voters mv
             JOIN profiles p ON p.id = mv.registered_by
             WHERE mv.organization_id = $1
             ORDER BY mv.created_at ASC, mv.id ASC",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }

    /// Operating barrios of the registering dirigentes, one entry per
    /// registration, oldest first. Feeds the barrio coverage summary.
    pub async fn barrio_rows(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<Option<String>>, sqlx::Error> {
        let rows: Vec<(Option<String>,)> = sqlx::query_as(
            "SELECT p.operating_barrio
             FROM mobilized_voters mv
             LEFT JOIN profiles p ON p.id = mv.registered_by
             WHERE mv.organization_id = $1
             ORDER BY mv.created_at ASC, mv.id ASC",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(barrio,)| barrio).collect())
    }

    /// Registration counts grouped by dirigente. Dirigentes with no
    /// registrations are absent; callers default them to zero.
    pub async fn counts_by_dirigente(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<(DbId, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT registered_by, COUNT(*) FROM mobilized_voters
             WHERE organization_id = $1 AND registered_by IS NOT NULL
             GROUP BY registered_by",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }

    /// Count of distinct dirigentes who registered at least one voter in the
    /// trailing window.
    pub async fn active_dirigentes(
        pool: &PgPool,
        organization_id: DbId,
        window_minutes: i32,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT registered_by) FROM mobilized_voters
             WHERE organization_id = $1
               AND registered_by IS NOT NULL
               AND created_at >= NOW() - make_interval(mins => $2)",
        )
        .bind(organization_id)
        .bind(window_minutes)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
