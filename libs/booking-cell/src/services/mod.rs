pub mod booking;
pub mod lifecycle;
pub mod store;
pub mod supabase_store;
pub mod validator;

pub use booking::BookingService;
pub use lifecycle::BookingLifecycleService;
pub use store::{BookingStore, InMemoryBookingStore};
pub use supabase_store::SupabaseBookingStore;
pub use validator::{check_notes, BookingValidator, MAX_NOTES_CHARS};
