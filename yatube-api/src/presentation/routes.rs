use crate::application::AppServices;
use crate::presentation::errors::{json_error_handler, method_not_allowed};
use crate::presentation::http_handlers as h;
use crate::presentation::middleware::authenticate;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

/// Mounts the whole API under `/api/v1` together with the shared state it needs.
pub fn configure(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.app_data(web::Data::new(services.auth.clone()))
        .app_data(web::Data::new(services.posts.clone()))
        .app_data(web::Data::new(services.groups.clone()))
        .app_data(web::Data::new(services.comments.clone()))
        .app_data(web::Data::new(services.follows.clone()))
        .app_data(web::Data::new(services.jwt.clone()))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api/v1")
                .wrap(HttpAuthentication::with_fn(authenticate))
                .service(
                    web::resource("/users/")
                        .route(web::post().to(h::register))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/jwt/create/")
                        .route(web::post().to(h::create_token))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/jwt/verify/")
                        .route(web::post().to(h::verify_token))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/posts/")
                        .route(web::get().to(h::list_posts))
                        .route(web::post().to(h::create_post))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/posts/{id}/")
                        .route(web::get().to(h::get_post))
                        .route(web::put().to(h::update_post))
                        .route(web::patch().to(h::partial_update_post))
                        .route(web::delete().to(h::delete_post))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/posts/{post_id}/comments/")
                        .route(web::get().to(h::list_comments))
                        .route(web::post().to(h::create_comment))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/posts/{post_id}/comments/{id}/")
                        .route(web::get().to(h::get_comment))
                        .route(web::put().to(h::update_comment))
                        .route(web::patch().to(h::partial_update_comment))
                        .route(web::delete().to(h::delete_comment))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/groups/")
                        .route(web::get().to(h::list_groups))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/groups/{id}/")
                        .route(web::get().to(h::get_group))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/follow/")
                        .route(web::get().to(h::list_follows))
                        .route(web::post().to(h::create_follow))
                        .default_service(web::to(method_not_allowed)),
                ),
        );
}
