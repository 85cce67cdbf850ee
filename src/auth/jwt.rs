use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, Identity, TokenKind};
use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
    #[error("unexpected token kind")]
    WrongKind,
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs((cfg.ttl_minutes.max(0) as u64) * 60),
            refresh_ttl: Duration::from_secs((cfg.refresh_ttl_minutes.max(0) as u64) * 60),
        }
    }

    fn sign_at(
        &self,
        who: &Identity,
        kind: TokenKind,
        now: OffsetDateTime,
    ) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: who.user_id,
            email: who.email.clone(),
            role: who.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token =
            encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)?;
        debug!(user_id = who.user_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, who: &Identity) -> Result<String, TokenError> {
        self.sign_at(who, TokenKind::Access, OffsetDateTime::now_utc())
    }

    pub fn sign_refresh(&self, who: &Identity) -> Result<String, TokenError> {
        self.sign_at(who, TokenKind::Refresh, OffsetDateTime::now_utc())
    }

    /// Access + refresh pair for a freshly authenticated identity.
    pub fn issue(&self, who: &Identity) -> Result<TokenPair, TokenError> {
        let now = OffsetDateTime::now_utc();
        Ok(TokenPair {
            access_token: self.sign_at(who, TokenKind::Access, now)?,
            refresh_token: self.sign_at(who, TokenKind::Refresh, now)?,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind != kind {
            return Err(TokenError::WrongKind);
        }
        Ok(claims)
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_kind(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_kind(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Role;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 60,
            refresh_ttl_minutes: 60 * 24 * 30,
        })
    }

    fn cashier() -> Identity {
        Identity {
            user_id: 7,
            email: "cashier@shop.com".into(),
            role: Role::Sales,
        }
    }

    #[test]
    fn issued_pair_carries_identity_and_role() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let pair = keys.issue(&cashier()).expect("issue");

        let access = keys.verify_access(&pair.access_token).expect("verify access");
        assert_eq!(access.identity(), cashier());
        assert_eq!(access.iss, "test-issuer");
        assert_eq!(access.aud, "test-aud");
        assert_eq!(access.exp - access.iat, 60 * 60);

        let refresh = keys.verify_refresh(&pair.refresh_token).expect("verify refresh");
        assert_eq!(refresh.identity(), cashier());
        assert_eq!(refresh.exp - refresh.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let pair = keys.issue(&cashier()).unwrap();
        assert!(matches!(keys.verify_refresh(&pair.access_token), Err(TokenError::WrongKind)));
        assert!(matches!(keys.verify_access(&pair.refresh_token), Err(TokenError::WrongKind)));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let two_hours_ago = OffsetDateTime::now_utc() - TimeDuration::hours(2);
        let token = keys.sign_at(&cashier(), TokenKind::Access, two_hours_ago).unwrap();
        assert!(matches!(keys.verify_access(&token), Err(TokenError::Expired)));

        let stale_refresh = keys
            .sign_at(&cashier(), TokenKind::Refresh, two_hours_ago - TimeDuration::days(30))
            .unwrap();
        assert!(matches!(keys.verify_refresh(&stale_refresh), Err(TokenError::Expired)));
    }

    #[test]
    fn rotated_secret_invalidates_tokens() {
        let old = make_keys("old-secret", "iss", "aud");
        let new = make_keys("new-secret", "iss", "aud");
        let token = old.sign_access(&cashier()).unwrap();
        assert!(matches!(new.verify_access(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let bad = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good.sign_access(&cashier()).unwrap();
        assert!(matches!(bad.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_is_invalid() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert!(matches!(keys.verify("not.a.jwt"), Err(TokenError::Invalid(_))));
    }
}
