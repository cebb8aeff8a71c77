//! Conversion between documents and tagged markup.

pub mod export;
pub mod formats;
pub mod import;
pub mod tags;

pub use export::DEFAULT_LINE_BREAK;
pub use formats::{FormatRegistry, MarkdownConverter, PulldownConverter};
pub use tags::TagMap;
