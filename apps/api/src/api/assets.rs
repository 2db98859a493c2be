use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Host},
    http::request::Parts,
};

/// Public path under which team logos are served
pub const TEAM_LOGO_PATH: &str = "/images/team/";

/// Turns stored asset file names into URLs for the requesting host
///
/// Extracted from the request; a request without a host resolves against
/// an empty host.
#[derive(Debug, Clone, Default)]
pub struct AssetUrls {
    host: String,
}

impl AssetUrls {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// `<host>/images/team/<logo>`, or `None` when the team has no logo
    ///
    /// # Example
    /// ```
    /// use league_api::api::assets::AssetUrls;
    ///
    /// let urls = AssetUrls::new("localhost:4000");
    /// assert_eq!(
    ///     urls.team_logo(Some("lions.png")).as_deref(),
    ///     Some("localhost:4000/images/team/lions.png")
    /// );
    /// assert_eq!(urls.team_logo(None), None);
    /// ```
    pub fn team_logo(&self, logo: Option<&str>) -> Option<String> {
        logo.map(|logo| format!("{}{}{}", self.host, TEAM_LOGO_PATH, logo))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AssetUrls
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let host = Host::from_request_parts(parts, state)
            .await
            .map(|Host(host)| host)
            .unwrap_or_default();

        Ok(AssetUrls { host })
    }
}
