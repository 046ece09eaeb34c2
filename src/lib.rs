pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use domain::auth::AuthService;
pub use domain::booking::{BookingService, TourCatalog};
pub use domain::clock::{Clock, FixedClock, SystemClock};
pub use domain::error::Error;
pub use domain::lending::LendingService;
pub use storage::backend::{DocumentBackend, JsonFileBackend, MemoryBackend};
pub use storage::store::RecordStore;
