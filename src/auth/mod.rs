mod password;
mod session;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{generate_session_token, LoginRateLimiter, SessionManager};
