//! Dashboard session state
//!
//! Everything a session owns lives in [`Dashboard`]: the search inputs, the
//! merged result sets, one sort slot per table, the loading flag and the last
//! fetch error. Results and the loading flag are written only by the search
//! cycle; sort slots only by column activation.

use tracing::{error, info, warn};

use crate::api::{FetchResult, StrategyClient};
use crate::config::SearchDefaults;
use crate::fanout;
use crate::table::{present, Presentation, SortState};
use crate::types::{parse_tickers, FilterParams, ResultSet, Strategy};

/// User-editable search inputs
#[derive(Debug, Clone, PartialEq)]
pub struct SearchInputs {
    /// Raw comma-separated ticker text
    pub tickers: String,
    pub min_roi: f64,
    pub min_dte: i64,
    pub max_dte: i64,
    pub max_ideas: usize,
}

impl From<&SearchDefaults> for SearchInputs {
    fn from(defaults: &SearchDefaults) -> Self {
        SearchInputs {
            tickers: defaults.tickers.clone(),
            min_roi: defaults.min_roi,
            min_dte: defaults.min_dte,
            max_dte: defaults.max_dte,
            max_ideas: defaults.max_ideas,
        }
    }
}

impl Default for SearchInputs {
    fn default() -> Self {
        SearchInputs::from(&SearchDefaults::default())
    }
}

impl SearchInputs {
    /// Snapshot of the inputs as request filters
    pub fn filters(&self) -> FilterParams {
        FilterParams {
            symbols: parse_tickers(&self.tickers),
            min_roi: self.min_roi,
            min_dte: self.min_dte,
            max_dte: self.max_dte,
            max_ideas: self.max_ideas,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    inputs: SearchInputs,
    results: ResultSet,
    csp_sort: SortState,
    cc_sort: SortState,
    loading: bool,
    last_error: Option<String>,
}

impl Dashboard {
    pub fn new(inputs: SearchInputs) -> Self {
        Dashboard {
            inputs,
            ..Default::default()
        }
    }

    pub fn inputs(&self) -> &SearchInputs {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut SearchInputs {
        &mut self.inputs
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn sort_state(&self, strategy: Strategy) -> &SortState {
        match strategy {
            Strategy::Csp => &self.csp_sort,
            Strategy::Cc => &self.cc_sort,
        }
    }

    /// Column header activation for one table
    pub fn sort_by(&mut self, strategy: Strategy, column: &str) {
        let sort = match strategy {
            Strategy::Csp => &mut self.csp_sort,
            Strategy::Cc => &mut self.cc_sort,
        };
        sort.activate(column);
        info!(
            "Sorting {} by {} ({:?})",
            strategy,
            column,
            sort.direction()
        );
    }

    /// Mark a search as started and return the filters it should use
    pub fn begin_search(&mut self) -> FilterParams {
        let filters = self.inputs.filters();
        if filters.min_dte > filters.max_dte {
            warn!(
                "Min DTE ({}) is greater than max DTE ({})",
                filters.min_dte, filters.max_dte
            );
        }
        info!("Searching {:?}", filters.symbols);
        self.loading = true;
        filters
    }

    /// Apply the outcome of a search.
    ///
    /// Success replaces both result sets; failure leaves them untouched and
    /// records the error. The loading flag is cleared either way.
    pub fn finish_search(&mut self, outcome: FetchResult<ResultSet>) -> FetchResult<()> {
        self.loading = false;
        match outcome {
            Ok(results) => {
                self.results = results;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                error!("Error fetching data: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run one full request/merge cycle against `client`
    pub async fn search(&mut self, client: &StrategyClient) -> FetchResult<()> {
        let filters = self.begin_search();
        let outcome = fanout::fetch_all(client, &filters).await;
        self.finish_search(outcome)
    }

    /// Table for one strategy, or `None` while a search is loading
    pub fn presentation(&self, strategy: Strategy) -> Option<Presentation<'_>> {
        if self.loading {
            return None;
        }
        Some(present(
            strategy.title(),
            self.results.rows(strategy),
            self.sort_state(strategy),
            self.inputs.max_ideas,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::types::CandidateRow;

    fn results() -> ResultSet {
        ResultSet {
            csp: vec![CandidateRow::new().with("ticker", "AAPL").with("roi_%", 1.5)],
            cc: vec![],
        }
    }

    fn failure() -> FetchError {
        FetchError::Timeout {
            url: "http://localhost:8000/api/strategy/csp/polygon".into(),
        }
    }

    #[test]
    fn test_begin_search_sets_loading_and_hides_tables() {
        let mut dashboard = Dashboard::new(SearchInputs::default());
        let filters = dashboard.begin_search();
        assert_eq!(filters.symbols, vec!["AAPL", "MSFT"]);
        assert!(dashboard.is_loading());
        assert!(dashboard.presentation(Strategy::Csp).is_none());
    }

    #[test]
    fn test_successful_search_replaces_results() {
        let mut dashboard = Dashboard::default();
        dashboard.begin_search();
        assert!(dashboard.finish_search(Ok(results())).is_ok());
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.results().csp.len(), 1);
        assert!(dashboard.last_error().is_none());
    }

    #[test]
    fn test_failed_search_keeps_previous_results() {
        let mut dashboard = Dashboard::default();
        dashboard.begin_search();
        dashboard.finish_search(Ok(results())).unwrap();

        dashboard.begin_search();
        assert!(dashboard.finish_search(Err(failure())).is_err());
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.results(), &results());
        assert!(dashboard.last_error().unwrap().contains("timed out"));
    }

    #[test]
    fn test_next_success_clears_error() {
        let mut dashboard = Dashboard::default();
        dashboard.begin_search();
        let _ = dashboard.finish_search(Err(failure()));
        dashboard.begin_search();
        dashboard.finish_search(Ok(ResultSet::default())).unwrap();
        assert!(dashboard.last_error().is_none());
    }

    #[test]
    fn test_sort_slots_are_independent() {
        let mut dashboard = Dashboard::default();
        dashboard.sort_by(Strategy::Csp, "roi_%");
        dashboard.sort_by(Strategy::Csp, "roi_%");
        dashboard.sort_by(Strategy::Cc, "dte");

        assert_eq!(dashboard.sort_state(Strategy::Csp).column(), Some("roi_%"));
        assert!(!dashboard.sort_state(Strategy::Csp).is_ascending());
        assert_eq!(dashboard.sort_state(Strategy::Cc).column(), Some("dte"));
        assert!(dashboard.sort_state(Strategy::Cc).is_ascending());
    }

    #[test]
    fn test_empty_results_present_placeholder() {
        let dashboard = Dashboard::default();
        let text = dashboard
            .presentation(Strategy::Cc)
            .map(|p| p.render_text())
            .unwrap();
        assert_eq!(text, "No Covered Call Ideas data available.");
    }
}
