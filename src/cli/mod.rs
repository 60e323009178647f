mod generate;
mod present;

pub use generate::{OutputFormat, generate, prompt, stream_plan};
pub use present::write_plan;
