//! Authentication: HS256 JWT validation and the bearer-token extractor.

pub mod extractor;
pub mod jwt;

pub use extractor::AuthUser;
