use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Name of the browser cookie holding the session token.
pub const SESSION_COOKIE: &str = "session";

/// Generate a cryptographically secure random session token.
pub fn generate_session_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Expiry timestamp (RFC 3339) for a session created now.
#[must_use]
pub fn expires_at(lifetime: Duration) -> String {
    let lifetime = chrono::Duration::from_std(lifetime).unwrap_or(chrono::Duration::days(30));
    (Utc::now() + lifetime).to_rfc3339()
}

/// Whether a stored expiry lies in the past. Unparseable values count as expired.
#[must_use]
pub fn is_expired(expires_at: &str, now: DateTime<Utc>) -> bool {
    DateTime::parse_from_rfc3339(expires_at).map_or(true, |t| t.with_timezone(&Utc) <= now)
}

/// `Set-Cookie` value carrying a session token.
#[must_use]
pub fn session_cookie(token: &str, lifetime: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        lifetime.as_secs()
    )
}

/// `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token() {
        let token1 = generate_session_token();
        let token2 = generate_session_token();

        assert_eq!(token1.len(), 64);
        assert_ne!(token1, token2);
        assert!(token1.chars().all(|c| c.is_alphanumeric()));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let future = expires_at(Duration::from_secs(3600));
        assert!(!is_expired(&future, now));

        let past = (now - chrono::Duration::minutes(1)).to_rfc3339();
        assert!(is_expired(&past, now));
        assert!(is_expired("garbage", now));
    }

    #[test]
    fn test_session_cookie() {
        let cookie = session_cookie("abc", Duration::from_secs(60));
        assert!(cookie.starts_with("session=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=60"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
