//! Dashboard aggregation functions.
//!
//! All three aggregators are pure: they take already-fetched rows and a
//! caller-supplied clock, so they can be unit-tested deterministically and
//! reused by both the widget endpoints and the assistant context builder.

use chrono::{DateTime, Duration, TimeZone, Timelike};
use serde::Serialize;

use crate::types::DbId;

/// Label used when a dirigente has no operating neighborhood on file.
pub const UNSPECIFIED_BARRIO: &str = "No especificado";

/// One hour-of-day bucket of the registration histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    /// Hour-of-day label, `"HH:00"`.
    pub hour: String,
    pub count: u32,
}

/// Voter count for a single dirigente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirigentePerformance {
    pub name: String,
    pub count: u32,
}

/// Voter count for a single operating neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarrioCoverage {
    pub barrio: String,
    pub count: u32,
}

/// Bucket registration timestamps into the trailing 24 hour-of-day slots.
///
/// Returns exactly 24 entries labelled `"HH:00"`, ordered from the hour 23
/// slots before `now` up to the hour of `now`. Timestamps are bucketed by
/// hour-of-day in `now`'s timezone, so two registrations exactly 24 hours
/// apart land in the same bucket. Unparseable timestamps are skipped with a
/// warning and never abort the aggregation.
pub fn voters_by_hour<Tz: TimeZone>(timestamps: &[String], now: DateTime<Tz>) -> Vec<HourBucket> {
    let mut counts = [0u32; 24];

    for raw in timestamps {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => {
                let hour = ts.with_timezone(&now.timezone()).hour() as usize;
                counts[hour] += 1;
            }
            Err(_) => {
                tracing::warn!(timestamp = %raw, "Skipping unparseable registration timestamp");
            }
        }
    }

    (0..24)
        .rev()
        .map(|offset| {
            let hour = (now.clone() - Duration::hours(offset)).hour();
            HourBucket {
                hour: format!("{hour:02}:00"),
                count: counts[hour as usize],
            }
        })
        .collect()
}

/// Rank dirigentes by number of registered voters, descending.
///
/// Input is one `(dirigente_id, dirigente_name)` pair per voter record.
/// Dirigentes with zero voters never appear; ties keep first-encountered
/// order (the sort is stable).
pub fn rank_dirigentes(records: &[(DbId, String)]) -> Vec<DirigentePerformance> {
    let mut tally: Vec<(DbId, DirigentePerformance)> = Vec::new();

    for (id, name) in records {
        match tally.iter_mut().find(|(seen, _)| seen == id) {
            Some((_, entry)) => entry.count += 1,
            None => tally.push((
                *id,
                DirigentePerformance {
                    name: name.clone(),
                    count: 1,
                },
            )),
        }
    }

    let mut ranked: Vec<DirigentePerformance> = tally.into_iter().map(|(_, e)| e).collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Group voter records by the registering dirigente's neighborhood.
///
/// A missing neighborhood is bucketed under [`UNSPECIFIED_BARRIO`] rather
/// than excluded. Sorted by count descending, stable; consumers display the
/// top 10.
pub fn barrio_coverage(barrios: &[Option<String>]) -> Vec<BarrioCoverage> {
    let mut tally: Vec<BarrioCoverage> = Vec::new();

    for barrio in barrios {
        let label = barrio.as_deref().unwrap_or(UNSPECIFIED_BARRIO);
        match tally.iter_mut().find(|entry| entry.barrio == label) {
            Some(entry) => entry.count += 1,
            None => tally.push(BarrioCoverage {
                barrio: label.to_string(),
                count: 1,
            }),
        }
    }

    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally
}
