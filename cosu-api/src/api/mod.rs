//! HTTP API handlers for cosu-api
//!
//! - POST /score: full pipeline on an audio attempt
//! - POST /analyze, /draft, /sample: transcript coaching
//! - GET /health

pub mod coaching;
pub mod health;
pub mod request;
pub mod score;

pub use coaching::coaching_routes;
pub use health::health_routes;
pub use score::score_routes;
