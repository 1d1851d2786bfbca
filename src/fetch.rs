use crate::error::ReportError;
use crate::range::DateRange;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// The completed-items endpoint of the Todoist sync API.
pub const DEFAULT_ENDPOINT: &str = "https://todoist.com/API/v7/get_all_completed_items";

/// How many completed items we ask for. There's no pagination, so anything past this is silently
/// dropped by the service.
pub const COMPLETED_ITEMS_LIMIT: usize = 50;

/// The parameters of a single completed-items request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedQuery {
    pub token: String,
    pub limit: usize,
    pub since: String,
    pub until: String,
}
impl CompletedQuery {
    pub fn new(token: &str, range: &DateRange) -> Self {
        Self {
            token: token.to_string(),
            limit: COMPLETED_ITEMS_LIMIT,
            since: range.since_param(),
            until: range.until_param(),
        }
    }
}

/// The top level of a completed-items response. The records themselves are left as raw JSON so
/// they can be validated one at a time when tasks are assembled.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CompletedPayload {
    /// The completed items, at most `limit` of them.
    pub items: Vec<Value>,
    /// Every project referenced by the items, keyed by the project ID as a string.
    pub projects: Map<String, Value>,
}

/// Something that can answer a completed-items query. The real implementation talks to the
/// network; tests substitute canned payloads.
pub trait CompletedItemsSource {
    fn fetch_completed(&self, query: &CompletedQuery) -> Result<CompletedPayload, ReportError>;
}

/// Encodes the query as an `application/x-www-form-urlencoded` body.
pub fn encode_form(query: &CompletedQuery) -> String {
    let limit = query.limit.to_string();
    [
        ("token", query.token.as_str()),
        ("limit", limit.as_str()),
        ("since", query.since.as_str()),
        ("until", query.until.as_str()),
    ]
    .iter()
    .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
    .collect::<Vec<_>>()
    .join("&")
}

/// Decodes a raw response body. Anything that isn't JSON, or is JSON without both an `items`
/// array and a `projects` object at the top level, is a decode error.
pub fn decode_payload(body: &str) -> Result<CompletedPayload, ReportError> {
    serde_json::from_str(body).map_err(|err| {
        if err.is_data() {
            ReportError::Decode(format!("response is missing `items` or `projects`: {err}"))
        } else {
            ReportError::Decode(format!("response is not valid JSON: {err}"))
        }
    })
}

/// Fetches completed items from Todoist over HTTP.
pub struct TodoistClient {
    agent: ureq::Agent,
    endpoint: String,
}
impl TodoistClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            endpoint: endpoint.to_string(),
        }
    }
}
impl CompletedItemsSource for TodoistClient {
    fn fetch_completed(&self, query: &CompletedQuery) -> Result<CompletedPayload, ReportError> {
        if query.token.is_empty() {
            warn!("no API token given, the request will almost certainly be rejected");
        }

        debug!(
            endpoint = %self.endpoint,
            since = %query.since,
            until = %query.until,
            limit = query.limit,
            "requesting completed items"
        );
        let mut res = self
            .agent
            .post(&self.endpoint)
            .config()
            .http_status_as_error(false)
            .build()
            .header("Content-Type", "application/x-www-form-urlencoded")
            .send(encode_form(query))
            .map_err(|err| {
                ReportError::Fetch(format!("request to {} failed: {err}", self.endpoint))
            })?;
        debug!(status = res.status().as_u16(), "received response");

        if res.status() != 200 {
            return Err(ReportError::Fetch(format!(
                "{} responded with status {}",
                self.endpoint,
                res.status()
            )));
        }

        let body = res
            .body_mut()
            .read_to_string()
            .map_err(|err| ReportError::Fetch(format!("failed to read response body: {err}")))?;
        decode_payload(&body)
    }
}
