use axum::{
    Router,
    routing::{get, post, put},
    middleware,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, AvailabilityState};

/// Routes relative to `/salons`.
pub fn availability_routes(state: AvailabilityState) -> Router {
    let public_routes = Router::new()
        .route("/{salon_id}/staff/{staff_id}/availability", get(handlers::list_windows))
        .route("/{salon_id}/staff/{staff_id}/slots", get(handlers::get_bookable_slots));

    let protected_routes = Router::new()
        .route("/{salon_id}/staff/{staff_id}/availability", post(handlers::create_window))
        .route(
            "/{salon_id}/staff/{staff_id}/availability/{availability_id}",
            put(handlers::update_window).delete(handlers::delete_window),
        )
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
