//! Browser-side half of a generation session, for non-browser consumers.
//!
//! [`GenerationClient`] posts a request to the backend and hands back the
//! response body as text chunks; [`run_session`] feeds those chunks through a
//! shared [`mealgen_planner::PlanState`].

mod client;
mod decoder;
mod error;
mod session;

pub use client::{ChunkStream, ClientConfig, GENERATE_PATH, GenerationClient};
pub use decoder::Utf8Decoder;
pub use error::ClientError;
pub use session::{SessionOutcome, run_session};
