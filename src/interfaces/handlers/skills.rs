use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::skill::{NewSkill, SkillNameQuery},
    errors::AppError,
    AppState,
};

#[instrument(name = "create_skill", skip_all)]
pub async fn create_skill(
    state: web::Data<AppState>,
    request: web::Json<NewSkill>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler.create_skill(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(skill))
}

#[instrument(name = "list_skills", skip_all)]
pub async fn list_skills(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let skills = state.skill_handler.get_all_skills().await?;
    Ok(HttpResponse::Ok().json(skills))
}

#[instrument(name = "get_skill", skip(state))]
pub async fn get_skill(
    state: web::Data<AppState>,
    skill_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler.get_skill_by_id(skill_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(skill))
}

#[instrument(name = "search_skill", skip(state))]
pub async fn search_skill(
    state: web::Data<AppState>,
    query: web::Query<SkillNameQuery>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler.find_by_name(&query.name).await?;
    Ok(HttpResponse::Ok().json(skill))
}
