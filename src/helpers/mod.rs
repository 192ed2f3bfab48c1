//! Helper functions
//!
//! String, date, and URL utilities shared by the renderer, the metadata
//! derivation, and the feed assembler.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
