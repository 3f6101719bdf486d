use reqwest::blocking::Client;
use reqwest::header::REFERER;
use reqwest::Url;
use tracing::{debug, info};

use crate::config::{Credentials, PortalConfig};
use crate::error::ScrapeError;
use crate::scrape::{parser, BookingSource};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const LOGIN_PATH: &str = "/4/login/";

/// A logged-in session against the booking portal.
///
/// Session cookies live in the client's cookie store, so one `PortalClient`
/// is one session.
pub struct PortalClient {
    client: Client,
    base_url: Url,
    organizer_id: String,
    logged_in: bool,
}

impl PortalClient {
    pub fn new(config: &PortalConfig) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ScrapeError::Url(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            organizer_id: config.organizer_id.clone(),
            logged_in: false,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<(), ScrapeError> {
        let login_url = self.url(LOGIN_PATH)?;

        // The login form may carry an anti-forgery token that must be echoed back.
        let form_page = self.get_page(login_url.clone())?;
        let token = parser::csrf_token(&form_page)?;

        let mut form = vec![
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        if let Some(token) = token.as_deref() {
            form.push(("csrfmiddlewaretoken", token));
        }

        let response = self
            .client
            .post(login_url.clone())
            .header(REFERER, login_url.as_str())
            .form(&form)
            .send()?;

        let status = response.status();
        self.logged_in = status.is_success();
        if !self.logged_in {
            return Err(ScrapeError::LoginFailed(status.as_u16()));
        }

        info!("logged in to {} as {}", self.base_url, credentials.username);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.logged_in = false;
    }

    fn url(&self, path: &str) -> Result<Url, ScrapeError> {
        self.base_url
            .join(path)
            .map_err(|e| ScrapeError::Url(format!("{path}: {e}")))
    }

    fn get_page(&self, url: Url) -> Result<String, ScrapeError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

impl BookingSource for PortalClient {
    fn fetch_overview(&mut self) -> Result<String, ScrapeError> {
        if !self.logged_in {
            return Err(ScrapeError::NotLoggedIn);
        }
        let url = self.url(&format!("/4/organizers/{}/bookings-overview/", self.organizer_id))?;
        info!("fetching bookings overview");
        self.get_page(url)
    }

    fn fetch_detail(&mut self, link: &str) -> Result<String, ScrapeError> {
        let url = Url::parse(link).map_err(|e| ScrapeError::Url(format!("{link}: {e}")))?;
        self.get_page(url)
    }

    fn resolve_link(&self, href: &str) -> String {
        self.base_url
            .join(href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| href.to_string())
    }
}
