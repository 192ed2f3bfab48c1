//! Configuration module

mod site;

pub use site::RemoteConfig;
pub use site::SiteConfig;
