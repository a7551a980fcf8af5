pub mod config;
pub mod identity;
pub mod settings;

pub use identity::ServiceIdentity;
