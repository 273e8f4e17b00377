use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    api::auth::{LOGIN_PATH, REFRESH_PATH},
    config::ClientConfig,
    error::ApiError,
};

/// Tracks the single silent token refresh allowed while executing one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshPolicy {
    /// No refresh attempted yet for this request.
    Fresh,
    /// The one allowed refresh has been spent.
    Spent,
}

impl RefreshPolicy {
    /// Whether a 401 on `path` may still trigger the silent refresh.
    fn allows_refresh(self, path: &str) -> bool {
        self == RefreshPolicy::Fresh && !is_refresh_exempt(path)
    }
}

/// Endpoints whose 401s must never trigger a refresh: a failing refresh call
/// must not refresh itself, and a failed login is just a failed login.
fn is_refresh_exempt(path: &str) -> bool {
    path == REFRESH_PATH || path == LOGIN_PATH
}

/// REST client carrying the cookie jar and the refresh-once policy.
///
/// Every call is sent with credentials (cookie-based session) and a JSON
/// body, under the configured API root.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpApi {
    /// Build the client with a shared cookie store and the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// GET `path` and decode the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path));
        let response = self.execute(request, path).await?;
        decode(response).await
    }

    /// POST `body` to `path` and decode the JSON response.
    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.execute(request, path).await?;
        decode(response).await
    }

    /// POST `body` to `path`, discarding whatever the server responds with.
    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request, path).await?;
        Ok(())
    }

    /// POST to `path` with an empty body, discarding the response.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let request = self.client.post(self.url(path));
        self.execute(request, path).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.rest_base())
    }

    /// Send a request, silently refreshing the session token at most once on
    /// a 401 before retrying the original request once.
    async fn execute(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<Response, ApiError> {
        let mut policy = RefreshPolicy::Fresh;
        let mut pending = Some(request);

        loop {
            let Some(current) = pending.take() else {
                return Err(ApiError::Unauthorized);
            };
            let retry = current.try_clone();
            let response = current.send().await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return check_status(response).await;
            }
            let Some(retry) = retry else {
                return Err(ApiError::Unauthorized);
            };
            if !policy.allows_refresh(path) {
                return Err(ApiError::Unauthorized);
            }

            debug!(path, "401 received; attempting silent token refresh");
            policy = RefreshPolicy::Spent;
            self.refresh_token().await?;
            pending = Some(retry);
        }
    }

    /// Call the refresh endpoint. A 401 here means the session is gone.
    async fn refresh_token(&self) -> Result<(), ApiError> {
        let response = self.client.post(self.url(REFRESH_PATH)).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        check_status(response).await?;
        Ok(())
    }
}

/// Map non-success statuses to [`ApiError::Status`], extracting the server's
/// message from the JSON body when it carries one.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|parsed| parsed.message)
        .unwrap_or(body);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON response body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(ApiError::Decode)
}

/// Error body shape; the backend has used several field names over time.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "detail", alias = "error")]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_and_login_are_exempt() {
        assert!(is_refresh_exempt(REFRESH_PATH));
        assert!(is_refresh_exempt(LOGIN_PATH));
        assert!(!is_refresh_exempt("quizzes/submit/"));
        assert!(!is_refresh_exempt("user/profile/"));
    }

    #[test]
    fn policy_allows_exactly_one_refresh() {
        let fresh = RefreshPolicy::Fresh;
        assert!(fresh.allows_refresh("user/profile/"));
        assert!(!fresh.allows_refresh(REFRESH_PATH));

        let spent = RefreshPolicy::Spent;
        assert!(!spent.allows_refresh("user/profile/"));
        assert!(!spent.allows_refresh(REFRESH_PATH));
    }

    #[test]
    fn error_body_accepts_all_known_field_names() {
        for body in [
            r#"{"message":"nope"}"#,
            r#"{"detail":"nope"}"#,
            r#"{"error":"nope"}"#,
        ] {
            let parsed: ErrorBody = serde_json::from_str(body).unwrap();
            assert_eq!(parsed.message, "nope");
        }
    }
}
