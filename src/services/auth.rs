use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Claims, LoginRequest, LoginResponse};

const ADMIN_SUBJECT: &str = "admin";

/// Admin authentication service
pub struct AuthService {
    password_hash: String,
    secret: String,
    previous_secrets: Vec<String>,
    session_expire_minutes: u64,
    /// Tokens issued under an older version are rejected
    session_version: AtomicI64,
    /// Where the version survives restarts
    session_state_path: Option<PathBuf>,
    persist_lock: Mutex<()>,
}

impl AuthService {
    pub fn from_config(config: &Config) -> Result<Self> {
        let password_hash = if !config.admin.password_hash.trim().is_empty() {
            let hash = config.admin.password_hash.trim().to_string();
            PasswordHash::new(&hash)
                .map_err(|e| AppError::Internal(format!("Invalid admin password hash: {}", e)))?;
            hash
        } else if !config.admin.password.is_empty() {
            tracing::warn!("Admin password configured in plaintext; prefer admin.password_hash");
            Self::hash_password(&config.admin.password)?
        } else {
            return Err(AppError::Internal(
                "No admin credential configured".to_string(),
            ));
        };

        let session_state_path = Some(config.jwt.session_state_path.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let session_version = match &session_state_path {
            Some(path) => Self::load_session_version(path)?,
            None => 0,
        };

        Ok(Self {
            password_hash,
            secret: config.jwt.secret.clone(),
            previous_secrets: config.jwt.previous_secrets.clone(),
            session_expire_minutes: config.jwt.session_expire_minutes,
            session_version: AtomicI64::new(session_version),
            session_state_path,
            persist_lock: Mutex::new(()),
        })
    }

    fn load_session_version(path: &Path) -> Result<i64> {
        if !path.exists() {
            return Ok(0);
        }
        let content = fs::read_to_string(path)?;
        let version: i64 = content.trim().parse().map_err(|e| {
            AppError::Internal(format!("Invalid session version in {:?}: {}", path, e))
        })?;
        tracing::info!("Loaded session version {} from {:?}", version, path);
        Ok(version)
    }

    /// Verify the admin password and issue a session token
    pub fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        if !Self::verify_password(&req.password, &self.password_hash)? {
            tracing::warn!("Rejected admin login attempt");
            return Err(AppError::Unauthorized("Invalid password".to_string()));
        }

        let access_token = self.generate_access_token()?;
        tracing::info!("Admin session started");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.session_expire_minutes * 60,
        })
    }

    /// Revoke every session issued so far, including across restarts
    pub fn logout(&self) -> Result<()> {
        let _guard = self.persist_lock.lock();
        let version = self.session_version.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(path) = &self.session_state_path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, version.to_string())?;
        }

        tracing::info!("Admin sessions revoked (version {})", version);
        Ok(())
    }

    fn generate_access_token(&self) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.session_expire_minutes as i64);

        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            ver: self.session_version.load(Ordering::SeqCst),
            jti: Uuid::new_v4().to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate a session token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let keys = std::iter::once(self.secret.as_str())
            .chain(self.previous_secrets.iter().map(|s| s.as_str()));

        for secret in keys {
            if let Ok(token_data) = decode::<Claims>(
                token,
                &DecodingKey::from_secret(secret.as_bytes()),
                &validation,
            ) {
                let claims = token_data.claims;
                if claims.sub != ADMIN_SUBJECT {
                    break;
                }
                if claims.ver != self.session_version.load(Ordering::SeqCst) {
                    return Err(AppError::Unauthorized("Session expired".to_string()));
                }
                return Ok(claims);
            }
        }

        Err(AppError::Unauthorized("Invalid token".to_string()))
    }

    /// Hash password using Argon2
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify password against hash
    fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
