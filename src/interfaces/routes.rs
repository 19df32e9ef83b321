use actix_web::web;

mod auth;
mod jobs;
mod json_error;
mod skills;
mod system;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth::config_routes)
            .configure(jobs::config_routes)
            .configure(skills::config_routes)
            .configure(system::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
