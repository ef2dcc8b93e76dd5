//! Supabase data access over PostgREST

pub mod client;
pub mod one_or_many;
pub mod query;
pub mod row_id;

pub use client::SupabaseClient;
pub use one_or_many::OneOrMany;
pub use query::{Order, Select};
