//! Input loading and raw record types.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{Dataset, Record, SourceMetadata, UNKNOWN, Value, field};
