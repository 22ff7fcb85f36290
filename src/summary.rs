//! Per-URL cost summarization
//!
//! Collapses raw network requests and main-thread tasks into exactly one
//! [`UrlCostRecord`] per distinct URL, in order of first appearance.
//!
//! Repeated fetches of the same URL are merged by keeping the occurrence that
//! started earliest: its timing *and* its transfer size. Sizes across repeats
//! are never summed, since a second fetch is usually a cache hit reported with
//! the full resource size.

use crate::ordered_map::OrderedMap;
use serde::{Deserialize, Serialize};

/// Tasks shorter than this don't block the main thread
pub const BLOCKING_THRESHOLD_MS: f64 = 50.0;

/// One network request as captured during the page load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkRequest {
    pub url: String,

    /// Bytes over the wire (headers + encoded body)
    #[serde(default)]
    pub transfer_size: u64,

    /// Request start, ms
    #[serde(default)]
    pub start_time: Option<f64>,

    /// Response headers fully received, ms
    #[serde(default)]
    pub response_headers_end_time: Option<f64>,

    /// Request finished, ms
    #[serde(default)]
    pub end_time: Option<f64>,
}

/// A main-thread task attributed to the script URL that ran it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainThreadTask {
    #[serde(default)]
    pub url: Option<String>,

    /// Wall time including children, ms
    pub duration: f64,

    /// Time excluding children, ms
    pub self_time: f64,

    /// Only top-level tasks count toward blocking time
    #[serde(default = "default_top_level")]
    pub is_top_level: bool,
}

fn default_top_level() -> bool {
    true
}

fn default_cpu_multiplier() -> f64 {
    1.0
}

/// Everything captured from a single page load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCapture {
    pub main_document_url: String,

    /// CPU throttling multiplier applied to task durations
    #[serde(default = "default_cpu_multiplier")]
    pub cpu_multiplier: f64,

    pub requests: Vec<NetworkRequest>,

    #[serde(default)]
    pub tasks: Vec<MainThreadTask>,
}

impl PageCapture {
    /// Summarize this capture into per-URL cost records
    pub fn cost_records(&self) -> UrlCostMap {
        summarize(&self.requests, &self.tasks, self.cpu_multiplier)
    }
}

/// Cost of a single URL over the whole page load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlCostRecord {
    pub url: String,
    pub transfer_size: u64,

    /// Main-thread time, ms
    #[serde(default)]
    pub main_thread_time: f64,

    /// Main-thread blocking time, ms
    #[serde(default)]
    pub blocking_time: f64,

    #[serde(default)]
    pub first_start_time: Option<f64>,

    #[serde(default)]
    pub first_headers_received_time: Option<f64>,

    #[serde(default)]
    pub first_end_time: Option<f64>,
}

impl UrlCostRecord {
    /// A record with size only; no main-thread cost and no timing
    pub fn new(url: impl Into<String>, transfer_size: u64) -> Self {
        Self {
            url: url.into(),
            transfer_size,
            main_thread_time: 0.0,
            blocking_time: 0.0,
            first_start_time: None,
            first_headers_received_time: None,
            first_end_time: None,
        }
    }

    /// Set start and headers-received times (end defaults to headers-received)
    pub fn with_timing(mut self, start: f64, headers_received: f64) -> Self {
        self.first_start_time = Some(start);
        self.first_headers_received_time = Some(headers_received);
        self.first_end_time = Some(headers_received);
        self
    }

    pub fn with_end_time(mut self, end: f64) -> Self {
        self.first_end_time = Some(end);
        self
    }

    pub fn with_main_thread(mut self, main_thread_time: f64, blocking_time: f64) -> Self {
        self.main_thread_time = main_thread_time;
        self.blocking_time = blocking_time;
        self
    }

    fn from_request(request: &NetworkRequest) -> Self {
        Self {
            url: request.url.clone(),
            transfer_size: request.transfer_size,
            main_thread_time: 0.0,
            blocking_time: 0.0,
            first_start_time: request.start_time,
            first_headers_received_time: request.response_headers_end_time,
            first_end_time: request.end_time,
        }
    }
}

/// URL → cost record, in discovery order
pub type UrlCostMap = OrderedMap<String, UrlCostRecord>;

/// Build one cost record per distinct URL
///
/// # Arguments
/// * `requests` - Network requests in capture order
/// * `tasks` - Main-thread tasks with their attributable URL
/// * `cpu_multiplier` - Throttling factor applied to task times
///
/// # Example
/// ```
/// use facade_finder::summary::{summarize, NetworkRequest};
///
/// let requests = vec![
///     NetworkRequest {
///         url: "https://cdn.example.com/a.js".to_string(),
///         transfer_size: 1200,
///         start_time: Some(10.0),
///         response_headers_end_time: Some(20.0),
///         end_time: Some(30.0),
///     },
/// ];
///
/// let records = summarize(&requests, &[], 1.0);
/// assert_eq!(records.len(), 1);
/// ```
pub fn summarize(
    requests: &[NetworkRequest],
    tasks: &[MainThreadTask],
    cpu_multiplier: f64,
) -> UrlCostMap {
    let mut records = UrlCostMap::new();

    for request in requests {
        match records.get_mut(request.url.as_str()) {
            Some(existing) => {
                // Task costs are added after all requests are merged
                if starts_earlier(request.start_time, existing.first_start_time) {
                    *existing = UrlCostRecord::from_request(request);
                }
            }
            None => {
                records.insert(request.url.clone(), UrlCostRecord::from_request(request));
            }
        }
    }

    let mut unmatched_tasks = 0usize;
    for task in tasks {
        let Some(url) = task.url.as_deref() else {
            continue;
        };
        let Some(record) = records.get_mut(url) else {
            unmatched_tasks += 1;
            continue;
        };

        record.main_thread_time += task.self_time * cpu_multiplier;
        if task.is_top_level {
            record.blocking_time += (task.duration * cpu_multiplier - BLOCKING_THRESHOLD_MS).max(0.0);
        }
    }

    tracing::debug!(
        requests = requests.len(),
        tasks = tasks.len(),
        unmatched_tasks,
        urls = records.len(),
        "summarized page load"
    );

    records
}

/// A known start time beats a missing one; ties keep the earlier-seen request
fn starts_earlier(candidate: Option<f64>, current: Option<f64>) -> bool {
    match (candidate, current) {
        (Some(c), Some(cur)) => c < cur,
        (Some(c), None) => c.is_finite(),
        _ => false,
    }
}
