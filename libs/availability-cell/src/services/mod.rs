pub mod intervals;
pub mod ledger;
pub mod resolver;
pub mod store;
pub mod supabase_store;

pub use ledger::BookingLedger;
pub use resolver::{DaySchedule, SlotResolver};
pub use store::{AvailabilityStore, InMemoryAvailabilityStore, validate_window};
pub use supabase_store::SupabaseAvailabilityStore;
