//! Configuration module

mod site;

pub use site::ContactConfig;
pub use site::FirebaseConfig;
pub use site::ProductConfig;
pub use site::SiteConfig;
