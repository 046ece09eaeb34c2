pub mod backend;
pub mod seed;
pub mod store;

/// Collection names, one JSON document each.
pub mod collections {
    pub const USERS: &str = "users";
    pub const BOOKS: &str = "books";
    pub const TRANSACTIONS: &str = "transactions";
    pub const TOURS: &str = "tours";
    pub const BOOKINGS: &str = "bookings";
    pub const SESSIONS: &str = "sessions";
}
