//! Human-readable views of tenant logs.

pub mod html;

pub use html::{escape_html, HtmlRenderer};
