pub mod auth;
pub mod booking_window;
pub mod bookings;
pub mod client;
pub mod config;
pub mod console;
pub mod constants;
pub mod database;
pub mod error;
pub mod models;
pub mod parking;
pub mod payments;
pub mod pricing;
pub mod session;
pub mod spots;
pub mod transactions;
pub mod utils;
pub mod wallet;
