pub mod bootstrap;
pub mod cleanup;
pub mod middleware;
pub mod password;
pub mod session;

pub use bootstrap::ensure_initial_user;
pub use cleanup::{run_cleanup_worker, CLEANUP_INTERVAL};
pub use middleware::{cookie_value, request_token, MaybeUser, RequireUser};
pub use password::{hash_password, verify_password};
pub use session::{
    clear_session_cookie, expires_at, generate_session_token, is_expired, session_cookie,
    SESSION_COOKIE,
};
