// auth/mod.rs — Bearer token issue/verify + password digests.
//
// Token format: "{user_id}.{expires_at_unix}.{hmac_hex}"
// The MAC covers "{user_id}.{expires_at_unix}" and is keyed by the
// server secret. The gate only needs pass/fail + the resolved user id.

use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn sign(payload: &str, secret: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(payload.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Mint a bearer token for `user_id`, valid for `ttl_secs`.
pub fn issue_token(user_id: &str, ttl_secs: u64, secret: &str) -> Result<String> {
    let expires_at = now_unix() + ttl_secs;
    let payload = format!("{user_id}.{expires_at}");
    let sig = sign(&payload, secret)?;
    Ok(format!("{payload}.{}", hex::encode(sig)))
}

/// Verify a bearer token. Returns the user id it resolves to.
pub fn verify_token(raw: &str, secret: &str) -> Result<String> {
    let parts: Vec<&str> = raw.splitn(3, '.').collect();
    if parts.len() != 3 {
        return Err(anyhow!("malformed token"));
    }
    let (user_id, expires_str, sig_hex) = (parts[0], parts[1], parts[2]);

    let payload = format!("{user_id}.{expires_str}");
    let sig = hex::decode(sig_hex).map_err(|_| anyhow!("invalid token signature hex"))?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&sig)
        .map_err(|_| anyhow!("token signature invalid"))?;

    let expires_at: u64 = expires_str
        .parse()
        .map_err(|_| anyhow!("invalid token expiry"))?;
    if expires_at <= now_unix() {
        return Err(anyhow!("token expired"));
    }

    Ok(user_id.to_string())
}

// ─── Password digests ─────────────────────────────────────────────────────────
//
// Salted SHA-256, stored as "{salt}${hex_digest}". The scheme is a
// collaborator contract — hash on write, verify on login — not a
// hardened KDF.

pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = issue_token("user-1", 3600, "secret").unwrap();
        assert_eq!(verify_token(&token, "secret").unwrap(), "user-1");
    }

    #[test]
    fn tampered_token_rejected() {
        let token = issue_token("user-1", 3600, "secret").unwrap();
        let tampered = token.replacen("user-1", "user-2", 1);
        assert!(verify_token(&tampered, "secret").is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token("user-1", 3600, "secret").unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let token = issue_token("user-1", 0, "secret").unwrap();
        assert!(verify_token(&token, "secret").is_err());
    }

    #[test]
    fn garbage_rejected() {
        assert!(verify_token("not-a-token", "secret").is_err());
        assert!(verify_token("a.b.zz", "secret").is_err());
    }

    #[test]
    fn password_round_trip() {
        let stored = hash_password("hunter2");
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn password_salts_differ() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }
}
