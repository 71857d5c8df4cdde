// Session establishment
//
// The switch has no login API as such. `GET /` redirects to a URL whose
// first path segment is an opaque per-login token; a second GET against
// the login page under that token, with the credentials in the query
// string, answers with a `sessionID` cookie. Both values are then needed
// on every later request.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::client::{DeviceClient, parse_url};
use crate::error::Error;

/// An authenticated session on one switch.
///
/// Immutable once built. Every device operation takes it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    host: String,
    token: String,
    cookie: String,
    username: String,
}

impl Session {
    /// Build a session from already-known token and cookie values.
    pub fn new(
        host: impl Into<String>,
        token: impl Into<String>,
        cookie: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
            cookie: cookie.into(),
            username: username.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// `http://{host}/{token}/hpe` -- every device URL lives under this.
    pub fn base_url(&self) -> String {
        format!("http://{}/{}/hpe", self.host, self.token)
    }

    /// Value for the `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        format!("sessionID={}; userName={}", self.cookie, self.username)
    }
}

/// Everything needed to open a session.
///
/// `token` and `cookie` are manual overrides: with both set no request is
/// made; with one set it replaces the scraped value.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub token: Option<String>,
    pub cookie: Option<String>,
}

// ── Token strategies ────────────────────────────────────────────────

/// Where a token strategy looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Haystack {
    /// Final URL after following redirects.
    FinalUrl,
    /// HTML body of the landing page.
    Body,
}

/// One way of finding the session token. Capture group 1 is the token.
struct TokenStrategy {
    name: &'static str,
    haystack: Haystack,
    pattern: fn(host: &str) -> String,
}

fn redirect_url_pattern(_host: &str) -> String {
    "(?i)://[^/]+/([a-z0-9]{8,12})/hpe/".to_owned()
}

fn html_absolute_pattern(host: &str) -> String {
    format!("http://{}/([^/]+)/hpe/", regex::escape(host))
}

fn html_relative_pattern(_host: &str) -> String {
    "(?i)/([a-z0-9]{8,12})/hpe/".to_owned()
}

/// Tried in order; the first match wins. Firmware that moves the token
/// somewhere new gets a new row here.
const TOKEN_STRATEGIES: &[TokenStrategy] = &[
    TokenStrategy {
        name: "redirect-url",
        haystack: Haystack::FinalUrl,
        pattern: redirect_url_pattern,
    },
    TokenStrategy {
        name: "html-absolute",
        haystack: Haystack::Body,
        pattern: html_absolute_pattern,
    },
    TokenStrategy {
        name: "html-relative",
        haystack: Haystack::Body,
        pattern: html_relative_pattern,
    },
];

fn first_capture(pattern: &str, haystack: &str) -> Option<String> {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            trace!(pattern, error = %e, "skipping invalid pattern");
            return None;
        }
    };
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Run the token strategies against the landing page.
pub(crate) fn extract_token(host: &str, final_url: &str, body: &str) -> Option<String> {
    TOKEN_STRATEGIES.iter().find_map(|strategy| {
        let haystack = match strategy.haystack {
            Haystack::FinalUrl => final_url,
            Haystack::Body => body,
        };
        let token = first_capture(&(strategy.pattern)(host), haystack)?;
        debug!(strategy = strategy.name, "session token found");
        Some(token)
    })
}

/// Pull the `sessionID` value out of one or more `Set-Cookie` headers.
pub(crate) fn extract_cookie<'a>(set_cookie: impl IntoIterator<Item = &'a str>) -> Option<String> {
    set_cookie
        .into_iter()
        .find_map(|header| first_capture("sessionID=([^;]+)", header))
}

/// Everything but unreserved characters; a space becomes `%20`, never `+`.
const CREDENTIAL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, CREDENTIAL).to_string()
}

impl DeviceClient {
    /// Authenticate against the switch and return a session.
    ///
    /// Two unauthenticated GETs, no retries. Any step that cannot yield
    /// both the token and the cookie fails with [`Error::Authentication`].
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, Error> {
        let host = request.host.as_str();

        if let (Some(token), Some(cookie)) = (&request.token, &request.cookie) {
            debug!(host, "using supplied session token and cookie");
            return Ok(Session::new(host, token, cookie, &request.username));
        }

        // Step 1: follow the redirect from `/` to learn the token.
        let landing = parse_url(format!("http://{host}/"))?;
        debug!("GET {landing}");
        let resp = self
            .http()
            .get(landing)
            .send()
            .await
            .map_err(Error::Transport)?;
        let final_url = resp.url().to_string();
        let body = resp.text().await.map_err(Error::Transport)?;

        let token = match &request.token {
            Some(token) => token.clone(),
            None => extract_token(host, &final_url, &body).ok_or_else(|| {
                Error::Authentication {
                    message: format!("Failed to extract session token from URL: {final_url}"),
                }
            })?,
        };

        // Step 2: log in under the token to receive the session cookie.
        // Credentials go on after parsing; an InvalidUrl must never carry them.
        let mut login_url = parse_url(format!("http://{host}/{token}/htdocs/login/system.xml"))?;
        debug!("GET {login_url} (login)");
        login_url.set_query(Some(&format!(
            "action=login&user={}&password={}&ssd=true&",
            encode(&request.username),
            encode(request.password.expose_secret()),
        )));
        let resp = self
            .http()
            .get(login_url)
            .send()
            .await
            .map_err(Error::Transport)?;

        let set_cookie: Vec<&str> = resp
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        let cookie = match &request.cookie {
            Some(cookie) => cookie.clone(),
            None => extract_cookie(set_cookie.iter().copied()).ok_or_else(|| {
                let raw = if set_cookie.is_empty() {
                    "nil".to_owned()
                } else {
                    set_cookie.join(", ")
                };
                Error::Authentication {
                    message: format!(
                        "Failed to obtain session cookie from login response. Set-Cookie: {raw}"
                    ),
                }
            })?,
        };

        debug!(host, "session established");
        Ok(Session::new(host, token, cookie, &request.username))
    }
}
