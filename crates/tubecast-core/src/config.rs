//! Configuration module
//!
//! Environment-driven configuration for the API. The config is read once at
//! startup, validated, and injected into application state; nothing reads the
//! environment after that.

use std::env;

const DEFAULT_PORT: u16 = 8091;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 300;
const DEFAULT_SIGNED_URL_EXPIRY_SECS: u64 = 600;
const DEFAULT_MAX_THUMBNAIL_SIZE_BYTES: usize = 10 << 20; // 10 MiB
const DEFAULT_MAX_VIDEO_SIZE_BYTES: usize = 1 << 30; // 1 GiB

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    public_base_url: String,
    environment: String,
    jwt_secret: String,
    jwt_expiry_hours: i64,
    database_url: String,
    assets_root: String,
    s3_bucket: String,
    s3_region: String,
    s3_endpoint: Option<String>,
    aws_access_key_id: Option<String>,
    aws_secret_access_key: Option<String>,
    ffmpeg_path: String,
    ffprobe_path: String,
    process_timeout_secs: u64,
    signed_url_expiry_secs: u64,
    max_thumbnail_size_bytes: usize,
    max_video_size_bytes: usize,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_required(key: &str) -> Result<String, anyhow::Error> {
    env_opt(key).ok_or_else(|| anyhow::anyhow!("{} must be set", key))
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error> {
    match env_opt(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not a valid value: {}", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = env_parse("PORT", DEFAULT_PORT)?;
        let public_base_url = env_opt("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));

        let config = Config {
            server_port,
            public_base_url,
            environment,
            jwt_secret: env_required("JWT_SECRET")?,
            jwt_expiry_hours: env_parse("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            database_url: env_opt("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:tubecast.db?mode=rwc".to_string()),
            assets_root: env_opt("ASSETS_ROOT").unwrap_or_else(|| "./assets".to_string()),
            s3_bucket: env_required("S3_BUCKET")?,
            s3_region: env_required("S3_REGION")?,
            s3_endpoint: env_opt("S3_ENDPOINT"),
            aws_access_key_id: env_opt("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: env_opt("AWS_SECRET_ACCESS_KEY"),
            ffmpeg_path: env_opt("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: env_opt("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            process_timeout_secs: env_parse("PROCESS_TIMEOUT_SECS", DEFAULT_PROCESS_TIMEOUT_SECS)?,
            signed_url_expiry_secs: env_parse(
                "SIGNED_URL_EXPIRY_SECS",
                DEFAULT_SIGNED_URL_EXPIRY_SECS,
            )?,
            max_thumbnail_size_bytes: env_parse(
                "MAX_THUMBNAIL_SIZE_BYTES",
                DEFAULT_MAX_THUMBNAIL_SIZE_BYTES,
            )?,
            max_video_size_bytes: env_parse("MAX_VIDEO_SIZE_BYTES", DEFAULT_MAX_VIDEO_SIZE_BYTES)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 && self.is_production() {
            anyhow::bail!("JWT_SECRET must be at least 32 bytes in production");
        }
        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            anyhow::bail!("upload size limits must be non-zero");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.jwt_expiry_hours
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn assets_root(&self) -> &str {
        &self.assets_root
    }

    pub fn s3_bucket(&self) -> &str {
        &self.s3_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.aws_secret_access_key.as_deref()
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.ffprobe_path
    }

    pub fn process_timeout_secs(&self) -> u64 {
        self.process_timeout_secs
    }

    pub fn signed_url_expiry_secs(&self) -> u64 {
        self.signed_url_expiry_secs
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.max_thumbnail_size_bytes
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.max_video_size_bytes
    }

    /// Build a config directly, bypassing the environment. Intended for tests.
    pub fn for_tests(
        jwt_secret: impl Into<String>,
        database_url: impl Into<String>,
        assets_root: impl Into<String>,
        s3_bucket: impl Into<String>,
    ) -> Self {
        Config {
            server_port: DEFAULT_PORT,
            public_base_url: format!("http://localhost:{}", DEFAULT_PORT),
            environment: "test".to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
            database_url: database_url.into(),
            assets_root: assets_root.into(),
            s3_bucket: s3_bucket.into(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            process_timeout_secs: DEFAULT_PROCESS_TIMEOUT_SECS,
            signed_url_expiry_secs: DEFAULT_SIGNED_URL_EXPIRY_SECS,
            max_thumbnail_size_bytes: DEFAULT_MAX_THUMBNAIL_SIZE_BYTES,
            max_video_size_bytes: DEFAULT_MAX_VIDEO_SIZE_BYTES,
        }
    }

    /// Override the upload ceilings. Intended for tests.
    pub fn with_upload_limits(
        mut self,
        max_thumbnail_size_bytes: usize,
        max_video_size_bytes: usize,
    ) -> Self {
        self.max_thumbnail_size_bytes = max_thumbnail_size_bytes;
        self.max_video_size_bytes = max_video_size_bytes;
        self
    }
}
