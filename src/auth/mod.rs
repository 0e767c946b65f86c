//! Bearer-token authentication against an external identity provider.

pub mod claims;
pub mod extractors;
pub mod jwt;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use extractors::AuthUser;
