pub mod health;

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /profile                             get, update, delete own profile
///
/// /talents                             public directory (GET, filters via query)
/// /talents/{username}                  single public profile
///
/// /media                               upload (POST, multipart), own gallery (GET)
/// /media/{id}                          delete (owner or admin)
/// /media/{id}/visibility               toggle public/private (PATCH)
/// /media/{id}/profile-photo            designate profile photo (POST)
///
/// /images/{filename}                   access-controlled retrieval (GET/HEAD,
///                                      optional auth; anonymous gets only
///                                      approved+public media)
///
/// /messages                            list mailbox (GET), send (POST)
/// /messages/{id}                       read/archive actions (PATCH), delete
///
/// /admin/stats                         dashboard counters
/// /admin/pending-profiles              profile moderation queue
/// /admin/profiles/{user_id}/approve    verify profile + approve media (POST)
/// /admin/profiles/{user_id}/reject     unverify profile (POST)
/// /admin/pending-media                 media moderation queue
/// /admin/media/{id}/approve            approve one media row (POST)
/// /admin/media/{id}/reject             delete record + objects (POST)
/// /admin/users                         paginated user list
/// /admin/broadcast                     message many members (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/logout", post(handlers::auth::logout));

    let admin_routes = Router::new()
        .route("/stats", get(handlers::admin::stats))
        .route("/pending-profiles", get(handlers::admin::pending_profiles))
        .route(
            "/profiles/{user_id}/approve",
            post(handlers::admin::approve_profile),
        )
        .route(
            "/profiles/{user_id}/reject",
            post(handlers::admin::reject_profile),
        )
        .route("/pending-media", get(handlers::admin::pending_media))
        .route("/media/{id}/approve", post(handlers::admin::approve_media))
        .route("/media/{id}/reject", post(handlers::admin::reject_media))
        .route("/users", get(handlers::admin::list_users))
        .route("/broadcast", post(handlers::admin::broadcast));

    Router::new()
        .nest("/auth", auth_routes)
        .route(
            "/profile",
            get(handlers::profile::get_own)
                .put(handlers::profile::update)
                .delete(handlers::profile::delete),
        )
        .route("/talents", get(handlers::talents::list))
        .route("/talents/{username}", get(handlers::talents::get_by_username))
        .route(
            "/media",
            post(handlers::media::upload).get(handlers::media::list_own),
        )
        .route("/media/{id}", delete(handlers::media::delete))
        .route(
            "/media/{id}/visibility",
            patch(handlers::media::set_visibility),
        )
        .route(
            "/media/{id}/profile-photo",
            post(handlers::media::set_profile_photo),
        )
        // GET also serves HEAD; axum strips the body for HEAD requests.
        .route("/images/{filename}", get(handlers::images::serve_image))
        .route(
            "/messages",
            get(handlers::messages::list).post(handlers::messages::send),
        )
        .route(
            "/messages/{id}",
            patch(handlers::messages::update).delete(handlers::messages::delete),
        )
        .nest("/admin", admin_routes)
}
