pub mod bookings;
pub mod client;
pub mod context;
pub mod directory;
pub mod packages;
pub mod reference;
pub mod tickets;

#[cfg(test)]
mod testing;

pub use client::ApiClient;
pub use context::{AppContext, AppState};
