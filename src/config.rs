use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

/// Which collaborator pair backs the workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Supabase,
    Local,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "local" => Ok(BackendKind::Local),
            other => anyhow::bail!("unknown backend kind {:?}", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl LocalConfig {
    /// Route prefix this server serves blobs under, taken from a path-only
    /// `public_base_url`. An absolute URL means another host serves them.
    pub fn media_mount(&self) -> Option<String> {
        let base = self.public_base_url.trim().trim_end_matches('/');
        base.starts_with('/').then(|| base.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    /// Argon2 PHC string
    #[serde(default)]
    pub password_hash: String,
    /// Plaintext fallback, hashed at startup
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
    #[serde(default)]
    pub previous_secrets: Vec<String>,
    #[serde(default = "default_session_expire")]
    pub session_expire_minutes: u64,
    /// File holding the logout session version; empty keeps it in memory only
    #[serde(default = "default_session_state_path")]
    pub session_state_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_mb() -> usize {
    25
}

fn default_bucket() -> String {
    "wedding-photos".to_string()
}

fn default_table() -> String {
    "photos".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_storage_path() -> String {
    "data/uploads".to_string()
}

fn default_database_path() -> String {
    "data/guestlens.db".to_string()
}

fn default_public_base_url() -> String {
    "/media".to_string()
}

fn default_jwt_secret() -> String {
    "change-me-guestlens-secret".to_string()
}

fn default_session_expire() -> u64 {
    12 * 60
}

fn default_session_state_path() -> String {
    "data/.session_version".to_string()
}

fn default_cache_ttl() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            bucket: default_bucket(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            database_path: default_database_path(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            previous_secrets: Vec::new(),
            session_expire_minutes: default_session_expire(),
            session_state_path: default_session_state_path(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.validate()?;
        config.ensure_directories()?;
        config.ensure_jwt_secret()?;
        tracing::info!(
            "Backend: {:?}, bucket={}, table={}",
            config.backend.kind,
            config.supabase.bucket,
            config.supabase.table
        );
        Ok(config)
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from conf.toml or config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = [
            "conf.toml",
            "config.toml",
            "data/conf.toml",
            "data/config.toml",
        ];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config = Self::from_toml(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    /// Format: GL_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(val) = lookup("GL_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("GL_CONF_SERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("GL_CONF_SERVER_MAX_UPLOAD_MB") {
            if let Ok(mb) = val.parse() {
                self.server.max_upload_mb = mb;
            }
        }

        // Backend selection
        if let Some(val) = lookup("GL_CONF_BACKEND_KIND") {
            match val.parse::<BackendKind>() {
                Ok(kind) => self.backend.kind = kind,
                Err(e) => tracing::warn!("Ignoring GL_CONF_BACKEND_KIND: {}", e),
            }
        }

        // Supabase overrides
        if let Some(val) = lookup("GL_CONF_SUPABASE_URL") {
            self.supabase.url = val;
        }
        if let Some(val) = lookup("GL_CONF_SUPABASE_API_KEY") {
            self.supabase.api_key = val;
        }
        if let Some(val) = lookup("GL_CONF_SUPABASE_BUCKET") {
            if !val.trim().is_empty() {
                self.supabase.bucket = val;
            }
        }
        if let Some(val) = lookup("GL_CONF_SUPABASE_TABLE") {
            if !val.trim().is_empty() {
                self.supabase.table = val;
            }
        }
        if let Some(val) = lookup("GL_CONF_SUPABASE_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.supabase.timeout_secs = secs;
            }
        }

        // Local backend overrides
        if let Some(val) = lookup("GL_CONF_LOCAL_STORAGE_PATH") {
            self.local.storage_path = val;
        }
        if let Some(val) = lookup("GL_CONF_LOCAL_DATABASE_PATH") {
            self.local.database_path = val;
        }
        if let Some(val) = lookup("GL_CONF_LOCAL_PUBLIC_BASE_URL") {
            self.local.public_base_url = val;
        }

        // Admin credential
        if let Some(val) = lookup("GL_CONF_ADMIN_PASSWORD_HASH") {
            self.admin.password_hash = val;
        }
        if let Some(val) = lookup("GL_CONF_ADMIN_PASSWORD") {
            self.admin.password = val;
        }

        // JWT overrides
        if let Some(val) = lookup("GL_CONF_JWT_SECRET") {
            self.jwt.secret = val;
        }
        if let Some(val) = lookup("GL_CONF_JWT_PREVIOUS_SECRETS") {
            self.jwt.previous_secrets = val
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
        }
        if let Some(val) = lookup("GL_CONF_JWT_SESSION_EXPIRE") {
            if let Ok(minutes) = val.parse() {
                self.jwt.session_expire_minutes = minutes;
            }
        }
        if let Some(val) = lookup("GL_CONF_JWT_SESSION_STATE_PATH") {
            self.jwt.session_state_path = val;
        }

        if let Some(val) = lookup("GL_CONF_GALLERY_CACHE_TTL") {
            if let Ok(secs) = val.parse() {
                self.gallery.cache_ttl_secs = secs;
            }
        }
    }

    /// Reject configurations the service cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend.kind == BackendKind::Supabase {
            if self.supabase.url.trim().is_empty() {
                anyhow::bail!("GL_CONF_SUPABASE_URL is required for the supabase backend");
            }
            if self.supabase.api_key.trim().is_empty() {
                anyhow::bail!("GL_CONF_SUPABASE_API_KEY is required for the supabase backend");
            }
        }
        if self.backend.kind == BackendKind::Local
            && self.local.public_base_url.trim().trim_end_matches('/').is_empty()
        {
            anyhow::bail!("local.public_base_url must be a path such as /media or an absolute URL");
        }
        if self.admin.password_hash.trim().is_empty() && self.admin.password.is_empty() {
            anyhow::bail!("an admin credential is required: set admin.password_hash or admin.password");
        }
        Ok(())
    }

    /// Ensure JWT secret is secure and persisted
    fn ensure_jwt_secret(&mut self) -> anyhow::Result<()> {
        if self.jwt.secret == default_jwt_secret() || self.jwt.secret.is_empty() {
            let secret_path = Path::new("data/.jwt_secret");

            if secret_path.exists() {
                let secret = fs::read_to_string(secret_path)?;
                self.jwt.secret = secret.trim().to_string();
                tracing::info!("Loaded persisted JWT secret from data/.jwt_secret");
            } else {
                let secret = uuid::Uuid::new_v4().to_string();
                if let Some(parent) = secret_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(secret_path, &secret)?;
                self.jwt.secret = secret;
                tracing::info!("Generated and persisted new JWT secret to data/.jwt_secret");
            }
        }
        Ok(())
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        if self.backend.kind == BackendKind::Local {
            if let Some(parent) = Path::new(&self.local.database_path).parent() {
                fs::create_dir_all(parent)?;
            }
            fs::create_dir_all(&self.local.storage_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.kind, BackendKind::Supabase);
        assert_eq!(config.supabase.bucket, "wedding-photos");
        assert_eq!(config.supabase.table, "photos");
        assert_eq!(config.local.public_base_url, "/media");
    }

    #[test]
    fn test_missing_supabase_credentials_is_fatal() {
        let mut config = Config::default();
        config.admin.password = "dugun".to_string();
        assert!(config.validate().is_err());

        config.supabase.url = "https://example.supabase.co".to_string();
        assert!(config.validate().is_err());

        config.supabase.api_key = "anon".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_backend_needs_no_supabase() {
        let config = Config::from_toml(
            r#"
            [backend]
            kind = "local"

            [admin]
            password = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.kind, BackendKind::Local);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_admin_credential_required() {
        let mut config = Config::default();
        config.backend.kind = BackendKind::Local;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GL_CONF_SERVER_PORT", "8080"),
            ("GL_CONF_BACKEND_KIND", "LOCAL"),
            ("GL_CONF_SUPABASE_BUCKET", "  "),
            ("GL_CONF_JWT_PREVIOUS_SECRETS", "a, b,,c"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.kind, BackendKind::Local);
        assert_eq!(config.supabase.bucket, "wedding-photos");
        assert_eq!(config.jwt.previous_secrets, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_timeout_and_path_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GL_CONF_SUPABASE_TIMEOUT_SECS", "5"),
            ("GL_CONF_LOCAL_PUBLIC_BASE_URL", "/files/"),
            ("GL_CONF_JWT_SESSION_STATE_PATH", "/var/lib/guestlens/session"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.supabase.timeout_secs, 5);
        assert_eq!(config.local.media_mount().as_deref(), Some("/files"));
        assert_eq!(config.jwt.session_state_path, "/var/lib/guestlens/session");
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(" Local ".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert_eq!("supabase".parse::<BackendKind>().unwrap(), BackendKind::Supabase);
        assert!("s3".parse::<BackendKind>().is_err());

        let mut config = Config::default();
        config.apply_overrides(|key| (key == "GL_CONF_BACKEND_KIND").then(|| "s3".to_string()));
        assert_eq!(config.backend.kind, BackendKind::Supabase);
    }

    #[test]
    fn test_media_mount() {
        let mut local = LocalConfig::default();
        assert_eq!(local.media_mount().as_deref(), Some("/media"));

        local.public_base_url = "https://cdn.example.com/photos".to_string();
        assert_eq!(local.media_mount(), None);

        let mut config = Config::default();
        config.backend.kind = BackendKind::Local;
        config.admin.password = "pw".to_string();
        config.local.public_base_url = "/".to_string();
        assert!(config.validate().is_err());
    }
}
