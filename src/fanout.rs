//! Request fan-out and merge
//!
//! One search issues `2 × N` GET requests (one per symbol per strategy), all
//! in flight at once, and joins them with all-or-nothing semantics: the first
//! failure fails the whole search and nothing is merged.

use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::api::{FetchResult, StrategyClient};
use crate::types::{CandidateRow, FilterParams, ResultSet, Strategy};

/// Fetch both strategies for every symbol in `filters` and merge the results.
///
/// An empty symbol list issues no requests and yields an empty result set.
pub async fn fetch_all(client: &StrategyClient, filters: &FilterParams) -> FetchResult<ResultSet> {
    let symbols = &filters.symbols;
    if symbols.is_empty() {
        debug!("No symbols to search, skipping requests");
        return Ok(ResultSet::default());
    }

    info!(
        "Fetching {} requests for {} symbols from {}",
        symbols.len() * Strategy::ALL.len(),
        symbols.len(),
        client.base_url()
    );

    let csp = fetch_strategy(client, Strategy::Csp, filters);
    let cc = fetch_strategy(client, Strategy::Cc, filters);
    let (csp, cc) = tokio::try_join!(csp, cc)?;

    let results = ResultSet {
        csp: merge_tagged(symbols, csp),
        cc: merge_tagged(symbols, cc),
    };

    info!(
        "Merged {} CSP and {} CC candidates",
        results.csp.len(),
        results.cc.len()
    );

    Ok(results)
}

/// Fetch one strategy for every symbol concurrently, keeping symbol order
async fn fetch_strategy(
    client: &StrategyClient,
    strategy: Strategy,
    filters: &FilterParams,
) -> FetchResult<Vec<Vec<CandidateRow>>> {
    try_join_all(
        filters
            .symbols
            .iter()
            .map(|symbol| client.get_candidates(strategy, symbol, filters)),
    )
    .await
}

/// Concatenate per-symbol responses in symbol order, tagging every row with
/// the symbol it was fetched for.
///
/// `responses[i]` must be the response for `symbols[i]`.
pub fn merge_tagged(symbols: &[String], responses: Vec<Vec<CandidateRow>>) -> Vec<CandidateRow> {
    symbols
        .iter()
        .zip(responses)
        .flat_map(|(symbol, rows)| {
            rows.into_iter().map(move |mut row| {
                row.tag_ticker(symbol);
                row
            })
        })
        .collect()
}
