mod status;

pub(crate) use status::{JsonStatusFormatter, PlainTextStatusFormatter, StatusFormatter};
