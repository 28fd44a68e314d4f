//! Content module - blog posts, locales, and the stores they are read from

pub mod firestore;
mod locale;
mod post;
pub mod storage;
pub mod store;

pub use locale::{Locale, Localized, MissingLocale};
pub use post::{parse_post_date, post_path, BlogPost, SeoOverride};
pub use storage::StorageResolver;
pub use store::{FirestoreStore, MemoryStore, PostStore, SiteStore, StoreError};
