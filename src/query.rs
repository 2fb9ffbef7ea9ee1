//! Item API request shapes and the schema-fallback retry policy.
//!
//! The backend's field permissions and relation names drift between
//! deployments, so most reads carry two or three request variants. A
//! [`FallbackPlan`] tries them in order and takes the first that succeeds.

use std::fmt;

use serde_json::Value;
use url::Url;

use crate::error::FetchError;
use crate::transport::ItemTransport;

/// Row cap requested for every collection read
pub const DEFAULT_LIMIT: usize = 1000;

/// Equality-style filter operators understood by the item API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOp {
    Eq(String),
    In(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFilter {
    pub field: String,
    pub op: FilterOp,
}

impl ItemFilter {
    fn key(&self) -> String {
        match self.op {
            FilterOp::Eq(_) => format!("filter[{}][_eq]", self.field),
            FilterOp::In(_) => format!("filter[{}][_in]", self.field),
        }
    }

    fn value(&self) -> String {
        match &self.op {
            FilterOp::Eq(v) => v.clone(),
            FilterOp::In(vs) => vs.join(","),
        }
    }

    /// Evaluate against a raw record, comparing by string form
    pub fn matches(&self, record: &Value) -> bool {
        let Some(actual) = record.get(&self.field).and_then(scalar_string) else {
            return false;
        };
        match &self.op {
            FilterOp::Eq(v) => actual == *v,
            FilterOp::In(vs) => vs.iter().any(|v| *v == actual),
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// One read against `<base>/<path>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    path: String,
    fields: Option<String>,
    limit: Option<usize>,
    filters: Vec<ItemFilter>,
}

impl ItemRequest {
    /// Standard collection path: `items/<collection>`
    pub fn items(collection: &str) -> Self {
        Self::raw(format!("items/{}", collection))
    }

    /// Arbitrary path below the base URL (alternate schema spellings)
    pub fn raw(path: impl Into<String>) -> Self {
        Self {
            path: path.into().trim_matches('/').to_string(),
            fields: None,
            limit: None,
            filters: Vec::new(),
        }
    }

    pub fn fields(mut self, fields: &str) -> Self {
        self.fields = Some(fields.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filter_eq(mut self, field: &str, value: impl Into<String>) -> Self {
        self.filters.push(ItemFilter {
            field: field.to_string(),
            op: FilterOp::Eq(value.into()),
        });
        self
    }

    pub fn filter_in<I, S>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(ItemFilter {
            field: field.to_string(),
            op: FilterOp::In(values.into_iter().map(Into::into).collect()),
        });
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn field_selection(&self) -> Option<&str> {
        self.fields.as_deref()
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn filters(&self) -> &[ItemFilter] {
        &self.filters
    }

    /// Query parameters in wire order: limit, fields, filters
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(fields) = &self.fields {
            params.push(("fields".to_string(), fields.clone()));
        }
        for filter in &self.filters {
            params.push((filter.key(), filter.value()));
        }
        params
    }

    /// Absolute URL against a base such as `https://cms.example.org`
    pub fn url(&self, base_url: &str) -> Result<Url, FetchError> {
        let raw = format!("{}/{}", base_url.trim_end_matches('/'), self.path);
        let params = self.params();
        let url = if params.is_empty() {
            Url::parse(&raw)?
        } else {
            Url::parse_with_params(&raw, &params)?
        };
        Ok(url)
    }
}

impl fmt::Display for ItemRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        let params = self.params();
        for (i, (key, value)) in params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, value)?;
        }
        Ok(())
    }
}

/// Ordered request variants tried until one succeeds
#[derive(Debug, Clone, Default)]
pub struct FallbackPlan {
    label: String,
    variants: Vec<ItemRequest>,
}

impl FallbackPlan {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variants: Vec::new(),
        }
    }

    pub fn then(mut self, request: ItemRequest) -> Self {
        self.variants.push(request);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn variants(&self) -> &[ItemRequest] {
        &self.variants
    }

    /// Try each variant in order. Exhausting every variant yields an empty
    /// record set; the last failure is logged at error level.
    pub async fn run(&self, transport: &dyn ItemTransport) -> Vec<Value> {
        let mut last_error: Option<FetchError> = None;

        for (attempt, request) in self.variants.iter().enumerate() {
            tracing::debug!(collection = %self.label, attempt, request = %request, "Trying request variant");

            match transport.fetch(request).await {
                Ok(records) => {
                    if attempt > 0 {
                        tracing::info!(collection = %self.label, attempt, request = %request, "Fallback variant succeeded");
                    }
                    return accept_records(&self.label, records);
                }
                Err(e) => {
                    tracing::warn!(collection = %self.label, attempt, error = %e, "Request variant failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => {
                tracing::error!(collection = %self.label, error = %e, "All request variants failed, returning no records")
            }
            None => tracing::warn!(collection = %self.label, "Fallback plan has no variants"),
        }
        Vec::new()
    }
}

/// A `data` array of bare strings means the anonymous role can list the
/// collection but read none of its fields.
fn accept_records(label: &str, records: Vec<Value>) -> Vec<Value> {
    if matches!(records.first(), Some(Value::String(_))) {
        tracing::warn!(
            collection = %label,
            "Backend returned only ids; grant field-level read permission to the public role"
        );
        return Vec::new();
    }
    records
}
