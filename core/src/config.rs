use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORTAL_URL: &str = "https://office.tripaneer.com";
pub const DEFAULT_ORGANIZER_ID: &str = "65639";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub base_url: String,
    pub organizer_id: String,
    pub timeout: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PORTAL_URL.to_string(),
            organizer_id: DEFAULT_ORGANIZER_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keep the password out of logs and panics.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub portal: PortalConfig,
    pub credentials: Option<Credentials>,
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `HOSTELBOOK_*` variables, after loading `.env` if one exists.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let portal = PortalConfig {
            base_url: env::var("HOSTELBOOK_PORTAL_URL")
                .unwrap_or_else(|_| DEFAULT_PORTAL_URL.to_string()),
            organizer_id: env::var("HOSTELBOOK_ORGANIZER_ID")
                .unwrap_or_else(|_| DEFAULT_ORGANIZER_ID.to_string()),
            timeout: Duration::from_secs(
                env::var("HOSTELBOOK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        };

        let credentials = match (env::var("HOSTELBOOK_USERNAME"), env::var("HOSTELBOOK_PASSWORD")) {
            (Ok(username), Ok(password)) if !username.is_empty() => Some(Credentials { username, password }),
            _ => None,
        };

        Self {
            portal,
            credentials,
            data_dir: env::var("HOSTELBOOK_DATA_DIR").ok().map(PathBuf::from),
        }
    }
}
