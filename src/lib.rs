// src/lib.rs

pub mod config;
pub mod error;
pub mod fetch;
pub mod leaders;
pub mod output;
pub mod table;

pub use config::Config;
pub use error::{ExtractError, Result};
pub use leaders::{LeaderTable, RecordRow};

use reqwest::Client;
use std::time::Instant;
use tracing::{info, instrument};

/// Fetch, select, clean and write, in that order.
///
/// Every fatal error happens before the output file is touched.
#[instrument(level = "info", skip_all, fields(url = %config.url, table = config.table_index))]
pub async fn run(client: &Client, config: &Config) -> Result<LeaderTable> {
    let start = Instant::now();

    let tables = fetch::fetch_tables(client, &config.url).await?;
    let selected = table::select_table(tables, config.table_index)?;
    info!(
        columns = ?selected.headers,
        rows = selected.num_rows(),
        "selected table"
    );

    let leaders = leaders::extract_leaders(&selected)?;
    output::write_csv(&config.output, &leaders)?;

    info!(
        rows = leaders.rows.len(),
        dropped = leaders.dropped,
        hr_missing = leaders.hr_missing,
        elapsed = ?start.elapsed(),
        "done"
    );
    Ok(leaders)
}
