//! Universal auth: client ID and client secret exchange.

use serde_json::json;
use tracing::debug;

use crate::auth::read_token_response;
use crate::client::Transport;
use crate::errors::Result;
use crate::secret::SecretString;

pub const LOGIN_PATH: &str = "api/v1/auth/universal-auth/login";

/// Exchange a client ID / client secret pair for an access token.
pub async fn login(
    transport: &Transport,
    client_id: &str,
    client_secret: &SecretString,
) -> Result<SecretString> {
    debug!(client_id, "Logging in with universal auth");

    let response = transport
        .post_json(
            LOGIN_PATH,
            &json!({
                "clientId": client_id,
                "clientSecret": client_secret.as_str(),
            }),
        )
        .await?;

    read_token_response(response, &[client_secret.as_str()]).await
}
