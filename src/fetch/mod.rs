//! Fetch layer: URL normalization and the retrying HTTP client
//!
//! Everything network-facing lives here. The rest of the pipeline only
//! ever sees `(status, Option<body>)` pairs, so the heuristics stay pure
//! and the retry/content-type policy stays in one place.

mod client;
mod normalize;

pub use client::FetchClient;
pub use normalize::{absolutize, normalize_url};
