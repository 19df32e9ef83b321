use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::job::{JobRequest, MatchRequest},
    errors::AppError,
    AppState,
};

#[instrument(name = "create_job", skip_all)]
pub async fn create_job(
    state: web::Data<AppState>,
    request: web::Json<JobRequest>,
) -> Result<impl Responder, AppError> {
    let job = state.job_handler.create_job(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[instrument(name = "list_jobs", skip_all)]
pub async fn list_jobs(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let jobs = state.job_handler.get_all_jobs().await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[instrument(name = "get_job", skip(state))]
pub async fn get_job(
    state: web::Data<AppState>,
    job_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let job = state.job_handler.get_job_by_id(job_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[instrument(name = "update_job", skip(state, request))]
pub async fn update_job(
    state: web::Data<AppState>,
    job_id: web::Path<i64>,
    request: web::Json<JobRequest>,
) -> Result<impl Responder, AppError> {
    let job = state.job_handler
        .update_job(job_id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(job))
}

#[instrument(name = "delete_job", skip(state))]
pub async fn delete_job(
    state: web::Data<AppState>,
    job_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    state.job_handler.delete_job(job_id.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

#[instrument(name = "match_jobs", skip_all)]
pub async fn match_jobs(
    state: web::Data<AppState>,
    request: web::Json<MatchRequest>,
) -> Result<impl Responder, AppError> {
    let jobs = state.job_handler.find_matching_jobs(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[instrument(name = "employer_jobs", skip(state))]
pub async fn employer_jobs(
    state: web::Data<AppState>,
    employer_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let jobs = state.job_handler
        .get_active_jobs_by_employer(employer_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(jobs))
}
