pub mod client;
pub mod error;
pub mod models;
pub mod similarity;

pub use client::EmbedClient;
pub use error::{Error, Result};
pub use models::{ClientConfig, Embedding};
pub use similarity::{verify, PairLabel, SimilarityPair, SimilarityReport, Thresholds};
