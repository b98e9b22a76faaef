mod error;
mod parse;
mod serialize;

pub use error::{FormatError, FrontMatterError, ValidationError};
pub use parse::parse_consignment;
pub use serialize::serialize_consignment;
