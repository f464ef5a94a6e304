mod json;
pub use json::*;
mod parse;
pub use parse::*;
