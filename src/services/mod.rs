pub mod admin;
pub mod api;
pub mod auth;
pub mod booking;
pub mod history;
pub mod password_reset;
pub mod session;
pub mod slots;
