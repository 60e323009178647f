mod accumulator;
mod error;
pub mod markdown;
mod prompt;
mod request;
mod session;

pub use accumulator::{SEPARATOR, StreamBuffer};
pub use error::{Error, Result};
pub use markdown::{Block, render};
pub use prompt::build_prompt;
pub use request::{GenerationRequest, MAX_DAYS, MAX_PEOPLE};
pub use session::{PlanState, PlanView, SessionId, user_error_message};
