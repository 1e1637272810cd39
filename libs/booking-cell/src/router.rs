use axum::{
    Router,
    routing::{get, patch, post, put},
    middleware,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, BookingState};

/// Routes relative to `/salons`.
pub fn booking_routes(state: BookingState) -> Router {
    let public_routes = Router::new()
        .route("/{salon_id}/bookings/validate", post(handlers::validate_booking));

    let protected_routes = Router::new()
        .route(
            "/{salon_id}/bookings",
            post(handlers::create_booking).get(handlers::list_bookings),
        )
        .route(
            "/{salon_id}/bookings/{booking_id}",
            get(handlers::get_booking).delete(handlers::cancel_booking),
        )
        .route("/{salon_id}/bookings/{booking_id}/reschedule", put(handlers::reschedule_booking))
        .route("/{salon_id}/bookings/{booking_id}/status", patch(handlers::update_booking_status))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
