pub mod logger;
pub use logger::{StdoutLogger, init_stdout_logger};

mod vec2;
pub use vec2::*;
