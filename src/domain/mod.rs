pub mod auth;
pub mod booking;
pub mod clock;
pub mod error;
pub mod lending;
pub mod model;
