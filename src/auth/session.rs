use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::RngCore;

/// Generate a random session token (64 hex characters)
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

struct ActiveSession {
    email: String,
    expires_at: DateTime<Utc>,
}

/// In-memory session manager. Sessions live for the configured timeout and
/// are swept periodically by a background task.
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, ActiveSession>>>,
    timeout_seconds: u64,
}

impl SessionManager {
    pub fn new(timeout_seconds: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            timeout_seconds,
        }
    }

    /// Create a session for a logged-in user, returning its token.
    pub fn create_session(&self, email: String) -> String {
        let token = generate_session_token();
        let session = ActiveSession {
            email,
            expires_at: Utc::now() + Duration::seconds(self.timeout_seconds as i64),
        };
        self.sessions.write().insert(token.clone(), session);
        token
    }

    /// Return the session's user email when the token is valid and unexpired.
    pub fn validate_token(&self, token: &str) -> Option<String> {
        let sessions = self.sessions.read();
        sessions.get(token).and_then(|session| {
            if Utc::now() < session.expires_at {
                Some(session.email.clone())
            } else {
                None
            }
        })
    }

    /// Revoke a session
    pub fn revoke_session(&self, token: &str) {
        self.sessions.write().remove(token);
    }

    /// Drop expired sessions, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        before - sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            timeout_seconds: self.timeout_seconds,
        }
    }
}

/// Sliding-window limiter for failed login attempts, keyed by client IP.
pub struct LoginRateLimiter {
    attempts: Arc<RwLock<HashMap<IpAddr, Vec<DateTime<Utc>>>>>,
    max_attempts: u32,
    window_seconds: i64,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: u32, window_seconds: i64) -> Self {
        Self {
            attempts: Arc::new(RwLock::new(HashMap::new())),
            max_attempts,
            window_seconds,
        }
    }

    /// Record a failed attempt; returns true when the IP is now limited.
    pub fn record_failure(&self, ip: IpAddr) -> bool {
        let now = Utc::now();
        let window_start = now - Duration::seconds(self.window_seconds);

        let mut attempts = self.attempts.write();
        let ip_attempts = attempts.entry(ip).or_default();
        ip_attempts.retain(|ts| *ts > window_start);
        ip_attempts.push(now);

        ip_attempts.len() >= self.max_attempts as usize
    }

    pub fn is_rate_limited(&self, ip: IpAddr) -> bool {
        let window_start = Utc::now() - Duration::seconds(self.window_seconds);
        let attempts = self.attempts.read();
        attempts
            .get(&ip)
            .map(|a| a.iter().filter(|ts| **ts > window_start).count() >= self.max_attempts as usize)
            .unwrap_or(false)
    }

    /// Forget an IP's failures (call on successful login)
    pub fn clear(&self, ip: IpAddr) {
        self.attempts.write().remove(&ip);
    }

    /// Drop IPs with no failures inside the window
    pub fn cleanup(&self) -> usize {
        let window_start = Utc::now() - Duration::seconds(self.window_seconds);
        let mut attempts = self.attempts.write();
        let before = attempts.len();
        attempts.retain(|_, ip_attempts| {
            ip_attempts.retain(|ts| *ts > window_start);
            !ip_attempts.is_empty()
        });
        before - attempts.len()
    }
}

impl Clone for LoginRateLimiter {
    fn clone(&self) -> Self {
        Self {
            attempts: Arc::clone(&self.attempts),
            max_attempts: self.max_attempts,
            window_seconds: self.window_seconds,
        }
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        // 10 failed attempts per minute
        Self::new(10, 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trip() {
        let manager = SessionManager::new(3600);
        let token = manager.create_session("ada@example.com".to_string());

        assert_eq!(
            manager.validate_token(&token).as_deref(),
            Some("ada@example.com")
        );
        assert!(manager.validate_token("bogus").is_none());

        manager.revoke_session(&token);
        assert!(manager.validate_token(&token).is_none());
    }

    #[test]
    fn test_token_format() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_expired_sessions_swept() {
        let manager = SessionManager::new(0);
        let token = manager.create_session("a@b.c".to_string());
        assert!(manager.validate_token(&token).is_none());
        assert_eq!(manager.cleanup_expired(), 1);
        assert_eq!(manager.session_count(), 0);
    }

    #[test]
    fn test_rate_limiter_trips_and_clears() {
        let limiter = LoginRateLimiter::new(3, 60);
        let ip: IpAddr = "192.168.1.1".parse().unwrap();

        assert!(!limiter.record_failure(ip));
        assert!(!limiter.record_failure(ip));
        assert!(limiter.record_failure(ip));
        assert!(limiter.is_rate_limited(ip));

        limiter.clear(ip);
        assert!(!limiter.is_rate_limited(ip));
    }

    #[test]
    fn test_rate_limiter_is_per_ip() {
        let limiter = LoginRateLimiter::new(2, 60);
        let ip1: IpAddr = "10.0.0.1".parse().unwrap();
        let ip2: IpAddr = "10.0.0.2".parse().unwrap();

        limiter.record_failure(ip1);
        limiter.record_failure(ip1);
        assert!(limiter.is_rate_limited(ip1));
        assert!(!limiter.is_rate_limited(ip2));
    }
}
