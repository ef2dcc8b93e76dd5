pub mod auth;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod contact;
pub mod dashboard;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod logging;
pub mod pricing;
pub mod server;
pub mod signals;
pub mod supabase;

pub use logging::init_tracing;
