// src/fetch.rs

use crate::error::{ExtractError, Result};
use crate::table::{self, Table};
use reqwest::Client;
use tracing::{info, instrument};
use url::Url;

/// GETs `url` and returns the body. Non-2xx responses are errors.
pub async fn fetch_html(client: &Client, url: &Url) -> Result<String> {
    let fetch_err = |source: reqwest::Error| ExtractError::Fetch {
        url: url.to_string(),
        source,
    };

    client
        .get(url.clone())
        .send()
        .await
        .map_err(fetch_err)?
        .error_for_status()
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)
}

/// Fetches `url` and parses every table on the page, in document order.
///
/// A page without any `<table>` is an error.
#[instrument(level = "info", skip_all, fields(url = %url))]
pub async fn fetch_tables(client: &Client, url: &Url) -> Result<Vec<Table>> {
    let html = fetch_html(client, url).await?;
    info!(bytes = html.len(), "fetched page");

    let tables = table::parse_tables(&html);
    if tables.is_empty() {
        return Err(ExtractError::NoTables {
            url: url.to_string(),
        });
    }
    info!(count = tables.len(), "parsed tables");
    Ok(tables)
}
