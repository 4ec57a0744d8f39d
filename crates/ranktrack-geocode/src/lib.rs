//! Geocoding adapter: resolves free-form location input to coordinates
//! through an ordered provider fallback chain (Google Geocoding →
//! OpenCage → Nominatim).

mod client;
mod error;
mod provider;

pub use client::{GeocodeClient, ProviderStatus};
pub use error::GeocodeError;
pub use provider::Provider;
