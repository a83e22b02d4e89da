use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{AnalysisFailure, CandidateRecord, FitVerdict};
use crate::models::job::{JobDescription, ResumeUpload};
use crate::screening::{keywords, pipeline};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub text: String,
    /// Present when re-processing an existing job after a JD edit.
    #[serde(default)]
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: Uuid,
    pub keywords: Vec<String>,
    pub degraded: bool,
}

/// POST /api/v1/jobs
///
/// Processes a JD: keyword extraction runs here, exactly once, before any
/// resume scoring can start.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<Json<CreateJobResponse>, AppError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "job description text must not be empty".to_string(),
        ));
    }

    let extraction = keywords::extract_keywords(text, &state.llm).await;
    let jd = JobDescription {
        id: req.job_id.unwrap_or_else(Uuid::new_v4),
        raw_text: text.to_string(),
        keywords: extraction.keywords,
        degraded_keywords: extraction.degraded,
        created_at: Utc::now(),
    };

    let response = CreateJobResponse {
        job_id: jd.id,
        keywords: jd.keywords.clone(),
        degraded: jd.degraded_keywords,
    };
    let job_id = state.store.upsert_job(jd).await;
    info!(job_id = %job_id, keywords = response.keywords.len(), degraded = response.degraded, "job processed");

    Ok(Json(response))
}

/// Summary of one successfully analyzed resume, returned from the upload call.
#[derive(Debug, Serialize)]
pub struct AnalyzedResume {
    pub resume_id: Uuid,
    pub filename: String,
    pub final_score: f64,
    pub final_verdict: FitVerdict,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: Uuid,
    pub degraded: bool,
    pub analyzed: Vec<AnalyzedResume>,
    pub failed: Vec<AnalysisFailure>,
}

/// POST /api/v1/jobs/:id/resumes
///
/// Multipart upload of one or more resume documents. Runs the analysis
/// batch and commits the results unless the JD was re-processed meanwhile.
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let filename = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read uploaded file: {e}")))?;
        if bytes.is_empty() {
            continue;
        }
        uploads.push(ResumeUpload {
            id: Uuid::new_v4(),
            filename,
            content_type,
            bytes,
        });
    }

    if uploads.is_empty() {
        return Err(AppError::Validation(
            "no resume files in upload".to_string(),
        ));
    }

    let ticket = state
        .store
        .begin_batch(job_id, uploads.len() as u64)
        .await
        .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

    info!(job_id = %job_id, count = uploads.len(), "starting resume batch analysis");
    let outcome = pipeline::run_batch(
        ticket.jd_text.clone(),
        ticket.keywords.clone(),
        uploads,
        ticket.first_seq,
        state.analyzer.clone(),
        &state.config,
    )
    .await;

    let analyzed: Vec<AnalyzedResume> = outcome
        .records
        .iter()
        .map(|r| AnalyzedResume {
            resume_id: r.resume_id,
            filename: r.filename.clone(),
            final_score: r.final_score,
            final_verdict: r.final_verdict,
        })
        .collect();
    let failed = outcome.failures.clone();

    let committed = state
        .store
        .commit_batch(job_id, ticket.generation, outcome.records, outcome.failures)
        .await;
    if !committed {
        warn!(job_id = %job_id, "job was re-processed mid-batch, discarding results");
        return Err(AppError::Conflict(
            "job description was re-processed during analysis; results discarded".to_string(),
        ));
    }

    Ok(Json(UploadResponse {
        job_id,
        degraded: ticket.degraded,
        analyzed,
        failed,
    }))
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub job_id: Uuid,
    pub keywords: Vec<String>,
    pub degraded: bool,
    /// Ranked best-first.
    pub candidates: Vec<CandidateRecord>,
    pub failures: Vec<AnalysisFailure>,
}

/// GET /api/v1/jobs/:id/results
pub async fn handle_get_results(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ResultsResponse>, AppError> {
    let results = state
        .store
        .results(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

    Ok(Json(ResultsResponse {
        job_id,
        keywords: results.jd.keywords,
        degraded: results.jd.degraded_keywords,
        candidates: results.candidates,
        failures: results.failures,
    }))
}
