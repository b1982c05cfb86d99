//! Authentication: JWT issue/verify and Argon2 password hashing

pub mod jwt;
pub mod password;

pub use jwt::{extract_token_from_header, Claims, JwtValidator};
pub use password::{hash_password, verify_password};
