mod reader;
mod types;

pub use reader::ControlReader;
pub use types::ControlMessage;
