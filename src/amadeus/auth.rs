use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl, basic::BasicClient,
    reqwest::async_http_client,
};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, instrument};

use crate::{Result, TripPlannerError};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";

/// Client-credentials token holder for the provider API.
///
/// The token is fetched on first use and replaced only when the provider
/// rejects it.
pub struct TokenProvider {
    client: BasicClient,
    token: AsyncMutex<Option<String>>,
}

impl TokenProvider {
    pub fn new(base_url: &str, client_id: String, client_secret: String) -> Result<Self> {
        let token_url = format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH);

        // The client-credentials grant never visits the authorization endpoint
        let auth_url = AuthUrl::new(token_url.clone())
            .map_err(|e| TripPlannerError::config(format!("Invalid provider URL: {e}")))?;
        let token_url = TokenUrl::new(token_url)
            .map_err(|e| TripPlannerError::config(format!("Invalid provider URL: {e}")))?;

        let client = BasicClient::new(
            ClientId::new(client_id),
            Some(ClientSecret::new(client_secret)),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        Ok(Self {
            client,
            token: AsyncMutex::new(None),
        })
    }

    /// Current token, fetching one if none is held yet
    pub async fn access_token(&self) -> Result<String> {
        let mut slot = self.token.lock().await;
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }
        let token = self.fetch().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Replace `rejected` with a fresh token.
    ///
    /// If another request already swapped the token, that one is returned
    /// without a second round trip.
    pub async fn refresh(&self, rejected: &str) -> Result<String> {
        let mut slot = self.token.lock().await;
        if let Some(current) = slot.as_ref() {
            if current != rejected {
                debug!("Token already refreshed by a concurrent request");
                return Ok(current.clone());
            }
        }
        let token = self.fetch().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    #[instrument(name = "provider_token", skip(self))]
    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .exchange_client_credentials()
            .request_async(async_http_client)
            .await
            .map_err(|e| TripPlannerError::auth(format!("Failed to get access token: {e}")))?;

        info!("Obtained provider access token");
        Ok(response.access_token().secret().clone())
    }
}
