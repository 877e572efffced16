//! Pure context and prompt construction for the electoral assistant.
//!
//! Everything here is deterministic string building over already-fetched
//! data, so it is unit-testable without a database or an LLM.

use std::collections::BTreeMap;

use electo_core::stats::UNSPECIFIED_BARRIO;
use serde::Serialize;

/// System message sent with every assistant request.
pub const SYSTEM_PROMPT: &str = "Eres un asistente experto en análisis de datos electorales. \
     Proporciona respuestas basadas únicamente en los datos proporcionados.";

/// Per-dirigente line of the data snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DirigentePerformanceEntry {
    pub name: String,
    pub voters_count: i64,
    pub dni: String,
    pub operating_barrio: String,
}

/// Data snapshot echoed back to the client alongside the answer.
///
/// `vehicles_by_status` uses a `BTreeMap` so serialization order is stable.
#[derive(Debug, Clone, Serialize)]
pub struct DataContext {
    pub total_voters: i64,
    pub total_dirigentes: i64,
    pub total_vehicles: i64,
    pub dirigente_performance: Vec<DirigentePerformanceEntry>,
    pub vehicles_by_status: BTreeMap<String, i64>,
}

/// Render the data snapshot into the Spanish context block embedded in the
/// user prompt.
pub fn build_context_text(ctx: &DataContext) -> String {
    let performance_lines: Vec<String> = ctx
        .dirigente_performance
        .iter()
        .map(|d| {
            format!(
                "- {} ({}): {} votantes, barrio: {}",
                d.name, d.dni, d.voters_count, d.operating_barrio
            )
        })
        .collect();

    let fleet_lines: Vec<String> = ctx
        .vehicles_by_status
        .iter()
        .map(|(status, count)| format!("- {status}: {count} vehículos"))
        .collect();

    // Distinct barrios in first-appearance order.
    let mut barrios: Vec<&str> = Vec::new();
    for d in &ctx.dirigente_performance {
        if !barrios.contains(&d.operating_barrio.as_str()) {
            barrios.push(&d.operating_barrio);
        }
    }

    let avg_per_dirigente = if ctx.total_dirigentes > 0 {
        (ctx.total_voters as f64 / ctx.total_dirigentes as f64).round() as i64
    } else {
        0
    };
    let available = ctx.vehicles_by_status.get("disponible").copied().unwrap_or(0);

    format!(
        "\nContexto actual de la movilización electoral:\n\n\
         Datos generales:\n\
         - Total de votantes movilizados: {}\n\
         - Total de dirigentes activos: {}\n\
         - Total de vehículos en flota: {}\n\n\
         Rendimiento por dirigente:\n{}\n\n\
         Estado de la flota vehicular:\n{}\n\n\
         Preguntas frecuentes y datos relevantes:\n\
         - Los dirigentes están operando principalmente en los barrios: {}\n\
         - El promedio de votantes por dirigente es: {}\n\
         - Disponibilidad de vehículos: {} disponibles de {} totales\n",
        ctx.total_voters,
        ctx.total_dirigentes,
        ctx.total_vehicles,
        performance_lines.join("\n"),
        fleet_lines.join("\n"),
        barrios.join(", "),
        avg_per_dirigente,
        available,
        ctx.total_vehicles,
    )
}

/// Render the full user prompt: instructions, context block, and question.
pub fn build_prompt(ctx: &DataContext, question: &str) -> String {
    let context = build_context_text(ctx);
    format!(
        "\nEres un asistente experto en análisis de datos electorales. \
         Tu tarea es responder preguntas sobre la movilización electoral \
         basándote únicamente en los datos proporcionados.\n\n\
         {context}\n\n\
         Pregunta del usuario: \"{question}\"\n\n\
         Por favor, proporciona una respuesta clara, concisa y basada únicamente \
         en los datos anteriores. Si la pregunta no puede responderse con los datos \
         disponibles, indícalo amablemente y sugiere qué información adicional podría \
         ser útil.\n\n\
         Formato de respuesta:\n\
         - Respuesta directa a la pregunta\n\
         - Datos relevantes que respaldan tu respuesta\n\
         - Si aplica, recomendaciones o insights basados en los datos\n"
    )
}

/// Build a performance entry, substituting the placeholder barrio when the
/// dirigente has none recorded.
pub fn performance_entry(
    name: &str,
    dni: &str,
    voters_count: i64,
    operating_barrio: Option<&str>,
) -> DirigentePerformanceEntry {
    DirigentePerformanceEntry {
        name: name.to_string(),
        voters_count,
        dni: dni.to_string(),
        operating_barrio: operating_barrio
            .filter(|b| !b.is_empty())
            .unwrap_or(UNSPECIFIED_BARRIO)
            .to_string(),
    }
}
