//! Ranking adapter: DataForSEO SERP client covering the organic and
//! local/maps legs of a ranking check.

mod client;
mod error;
mod language;
mod types;

pub use client::{DataForSeoClient, RankingOutcome};
pub use error::DataForSeoError;
pub use language::language_name;
