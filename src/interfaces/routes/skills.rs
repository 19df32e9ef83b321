use actix_web::web;

use crate::handlers::skills;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/skills")
            .service(
                web::resource("")
                    .route(web::get().to(skills::list_skills))
                    .route(web::post().to(skills::create_skill))
            )
            .service(
                web::resource("/search")
                    .route(web::get().to(skills::search_skill))
            )
            .service(
                web::resource("/{skill_id}")
                    .route(web::get().to(skills::get_skill))
            )
    );
}
