//! Helper functions shared by the renderer, metadata and sitemap builders

mod html;
mod url;

pub use html::*;
pub use url::*;
