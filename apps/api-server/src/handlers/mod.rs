//! HTTP handlers and route configuration.

mod health;
mod posts;
mod servers;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/upload", web::post().to(posts::upload))
            .route("/servers", web::get().to(servers::list_servers))
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::upload))
                    .route("/{post_id}", web::get().to(posts::get_post)),
            ),
    );
}
