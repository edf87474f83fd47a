use gloo_net::http::{Request, Response};
use anyhow::bail;
use anyhow::Result;
use serde::de::DeserializeOwned;

/// Sends a get request, leaving the status for the caller to check.

pub async fn get(uri: &str) -> Result<Response> {
    let resp = Request::get(uri)
        .header("Accept", "application/json")
        .send()
        .await?;

    Ok(resp)
}

/// Requests json from the backend and decodes it, failing on any status other
/// than success.

pub async fn fetch_json<T>(uri: &str) -> Result<T>
    where T: DeserializeOwned
{
    let resp = get(uri).await?;

    if !resp.ok() {
        bail!("request to {} failed ({} {})", uri, resp.status(), resp.status_text());
    };

    Ok(resp.json::<T>().await?)
}
