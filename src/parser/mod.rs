//! Basic low-level byte parser functionality.
pub mod byte_parser;
pub(crate) mod byte_source;
pub mod parsing_error;
pub(crate) mod stream_byte_source;
pub mod utils;

pub use byte_parser::{ByteParser, ConsumeMode};
pub use byte_source::ByteSource;
pub use parsing_error::{ParsingError, ParsingErrorType};
pub use stream_byte_source::StreamByteSource;
