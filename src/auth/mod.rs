pub(crate) mod extractors;
pub mod jwt;
pub mod repo_types;
pub mod services;

pub use extractors::AuthUser;
pub use jwt::{Claims, JwtKeys, TokenKind};
