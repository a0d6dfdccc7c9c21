//! Core data types shared by the client, the presenter and the dashboard

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Name of the field the client adds to every candidate row
pub const TICKER_FIELD: &str = "ticker";

/// Validation errors for user-supplied search inputs
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be a whole number, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("number of ideas must be at least 1, got {0}")]
    NoIdeas(i64),
}

/// Options strategy served by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Cash-secured put candidates
    Csp,
    /// Covered call candidates
    Cc,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Csp, Strategy::Cc];

    /// URL path segment used by the backend router
    pub fn slug(&self) -> &'static str {
        match self {
            Strategy::Csp => "csp",
            Strategy::Cc => "cc",
        }
    }

    /// Heading used when presenting this strategy's table
    pub fn title(&self) -> &'static str {
        match self {
            Strategy::Csp => "Cash-Secured Put Ideas",
            Strategy::Cc => "Covered Call Ideas",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Market data provider the backend should use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Polygon-backed endpoints (`/api/strategy/{csp,cc}/polygon`)
    #[default]
    Polygon,
    /// Yahoo Finance-backed endpoints (`/api/strategy/{csp,cc}`)
    Yfinance,
}

impl DataSource {
    /// Endpoint path for a strategy on this source
    pub fn endpoint(&self, strategy: Strategy) -> String {
        match self {
            DataSource::Polygon => format!("/api/strategy/{}/polygon", strategy.slug()),
            DataSource::Yfinance => format!("/api/strategy/{}", strategy.slug()),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataSource::Polygon => write!(f, "polygon"),
            DataSource::Yfinance => write!(f, "yfinance"),
        }
    }
}

/// Split comma-separated ticker input into request symbols.
///
/// Entries are trimmed and upper-cased, blanks are dropped, order is kept and
/// duplicates are not removed.
pub fn parse_tickers(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Filters sent with every strategy request, plus the display row limit
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub symbols: Vec<String>,
    /// Minimum return on investment, in percent
    pub min_roi: f64,
    pub min_dte: i64,
    pub max_dte: i64,
    pub max_ideas: usize,
}

impl FilterParams {
    /// Query string pairs for a single symbol
    pub fn query_for(&self, symbol: &str) -> Vec<(&'static str, String)> {
        vec![
            ("ticker", symbol.to_string()),
            ("min_roi", self.min_roi.to_string()),
            ("min_dte", self.min_dte.to_string()),
            ("max_dte", self.max_dte.to_string()),
        ]
    }
}

/// A single table cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// JSON `null` or a field missing from this row
    Empty,
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String form used for text comparison
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Number(n) => match n.as_f64() {
                Some(f) => CellValue::Number(f),
                None => CellValue::Text(n.to_string()),
            },
            Value::String(s) => CellValue::Text(s),
            Value::Bool(b) => CellValue::Text(b.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// One strategy opportunity: an ordered, open-ended set of named fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRow {
    fields: Vec<(String, CellValue)>,
}

impl CandidateRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from a backend JSON object, keeping field order
    pub fn from_json(object: Map<String, Value>) -> Self {
        Self {
            fields: object
                .into_iter()
                .map(|(k, v)| (k, CellValue::from(v)))
                .collect(),
        }
    }

    /// Builder-style insert, used mostly by tests
    pub fn with(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, replacing the value in place if it already exists
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Tag the row with its source ticker as the first field.
    ///
    /// A `ticker` field already present in the backend payload is overwritten.
    pub fn tag_ticker(&mut self, symbol: &str) {
        self.fields.retain(|(k, _)| k != TICKER_FIELD);
        self.fields
            .insert(0, (TICKER_FIELD.to_string(), CellValue::Text(symbol.to_string())));
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn ticker(&self) -> Option<&str> {
        match self.get(TICKER_FIELD) {
            Some(CellValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for CandidateRow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Merged results of one search, one ordered list per strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub csp: Vec<CandidateRow>,
    pub cc: Vec<CandidateRow>,
}

impl ResultSet {
    pub fn rows(&self, strategy: Strategy) -> &[CandidateRow] {
        match strategy {
            Strategy::Csp => &self.csp,
            Strategy::Cc => &self.cc,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.csp.is_empty() && self.cc.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tickers_normalizes_and_keeps_order() {
        assert_eq!(parse_tickers("AAPL, msft"), vec!["AAPL", "MSFT"]);
        assert_eq!(parse_tickers(" qqq ,, spy ,qqq"), vec!["QQQ", "SPY", "QQQ"]);
    }

    #[test]
    fn test_parse_tickers_blank_input() {
        assert!(parse_tickers("").is_empty());
        assert!(parse_tickers(" , ,  ").is_empty());
    }

    #[test]
    fn test_endpoints_per_source() {
        assert_eq!(
            DataSource::Polygon.endpoint(Strategy::Csp),
            "/api/strategy/csp/polygon"
        );
        assert_eq!(DataSource::Polygon.endpoint(Strategy::Cc), "/api/strategy/cc/polygon");
        assert_eq!(DataSource::Yfinance.endpoint(Strategy::Csp), "/api/strategy/csp");
    }

    #[test]
    fn test_query_uses_plain_number_forms() {
        let filters = FilterParams {
            symbols: vec!["AAPL".into()],
            min_roi: 0.5,
            min_dte: 7,
            max_dte: 45,
            max_ideas: 10,
        };
        let query = filters.query_for("AAPL");
        assert_eq!(query[0], ("ticker", "AAPL".to_string()));
        assert_eq!(query[1], ("min_roi", "0.5".to_string()));
        assert_eq!(query[2], ("min_dte", "7".to_string()));
        assert_eq!(query[3], ("max_dte", "45".to_string()));
    }

    #[test]
    fn test_cell_value_from_json() {
        assert_eq!(CellValue::from(json!(12.5)), CellValue::Number(12.5));
        assert_eq!(CellValue::from(json!(14)), CellValue::Number(14.0));
        assert_eq!(CellValue::from(json!("2025-06-20")), CellValue::from("2025-06-20"));
        assert_eq!(CellValue::from(json!(null)), CellValue::Empty);
        assert_eq!(CellValue::from(json!(true)), CellValue::from("true"));
    }

    #[test]
    fn test_row_keeps_backend_field_order() {
        let object = json!({"symbol": "AAPL250620P00180000", "strike": 180.0, "dte": 14})
            .as_object()
            .cloned()
            .unwrap();
        let row = CandidateRow::from_json(object);
        let names: Vec<&str> = row.field_names().collect();
        assert_eq!(names, vec!["symbol", "strike", "dte"]);
    }

    #[test]
    fn test_tag_ticker_goes_first_and_overrides() {
        let mut row = CandidateRow::new()
            .with("strike", 180.0)
            .with("ticker", "WRONG");
        row.tag_ticker("AAPL");
        let names: Vec<&str> = row.field_names().collect();
        assert_eq!(names, vec!["ticker", "strike"]);
        assert_eq!(row.ticker(), Some("AAPL"));
    }

    #[test]
    fn test_row_serializes_as_ordered_object() {
        let row = CandidateRow::new()
            .with("ticker", "AAPL")
            .with("bid", 1.25)
            .with("delta", CellValue::Empty);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"ticker":"AAPL","bid":1.25,"delta":null}"#);
    }
}
