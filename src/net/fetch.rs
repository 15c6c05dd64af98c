use crate::config::EngineConfig;
use crate::net::Response;
use url::Url;

/// Builds the HTTP client used for every page load.
pub fn build_client(config: &EngineConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder.build()
}

// Loads an URL and returns the response in a result if any
pub async fn fetch(client: &reqwest::Client, url: Url) -> Result<Response, reqwest::Error> {
    log::debug!("fetching {url}");
    let res = client.get(url).send().await?;

    let final_url = res.url().clone();
    let status = res.status().as_u16();
    let status_text = res.status().canonical_reason().unwrap_or("Unknown").to_string();
    let headers = res.headers().clone();

    // Fetch body. We don't do streaming yet
    let body = res.bytes().await?.to_vec();
    log::debug!("fetched {final_url}: {status} {status_text}, {} bytes", body.len());

    Ok(Response {
        url: final_url,
        status,
        status_text,
        headers,
        body,
    })
}
