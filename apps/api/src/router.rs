use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use availability_cell::handlers::AvailabilityState;
use availability_cell::{availability_routes, AvailabilityStore, BookingLedger};
use booking_cell::handlers::BookingState;
use booking_cell::{booking_routes, BookingService, BookingStore};
use shared_config::AppConfig;

/// The booking store doubles as the ledger the slot resolver reads.
pub fn create_router<W, B>(config: Arc<AppConfig>, windows: Arc<W>, bookings: Arc<B>) -> Router
where
    W: AvailabilityStore + 'static,
    B: BookingStore + 'static,
{
    let ledger: Arc<dyn BookingLedger> = bookings.clone();
    let service = Arc::new(BookingService::new(windows.clone(), bookings));

    let availability_state = AvailabilityState {
        config: config.clone(),
        store: windows,
        ledger,
    };
    let booking_state = BookingState { config, service };

    Router::new()
        .route("/", get(|| async { "Salon Scheduling API is running!" }))
        .nest(
            "/salons",
            availability_routes(availability_state).merge(booking_routes(booking_state)),
        )
}
