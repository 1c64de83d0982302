//! Minimal labelled counters and latency histograms.
//!
//! Label sets are sorted into a `Vec` key so rendering is deterministic
//! regardless of call-site order. Histogram buckets are fixed, in
//! milliseconds, sized for remote API calls.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    key.sort();
    key
}

fn render_labels(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| {
            let v = v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
            format!("{k}=\"{v}\"")
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for r in self.map.iter() {
            let _ = writeln!(out, "{name}{{{}}} {}", render_labels(r.key()), r.value().load(Ordering::Relaxed));
        }
    }
}

// 10ms .. 30s
const BUCKETS_MS: [u64; 8] = [10, 50, 100, 250, 500, 1_000, 5_000, 30_000];

#[derive(Default)]
struct Histogram {
    count: AtomicU64,
    sum_ms: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MS.len()],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, Histogram>,
}

impl HistogramVec {
    pub fn observe(&self, labels: &[(&str, &str)], elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let h = self.map.entry(label_key(labels)).or_default();
        h.count.fetch_add(1, Ordering::Relaxed);
        h.sum_ms.fetch_add(ms, Ordering::Relaxed);
        for (bucket, &le) in h.buckets.iter().zip(BUCKETS_MS.iter()) {
            if ms <= le {
                bucket.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for r in self.map.iter() {
            let labels = render_labels(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{labels},") };
            let h = r.value();
            for (bucket, le) in h.buckets.iter().zip(BUCKETS_MS) {
                let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"{le}\"}} {}", bucket.load(Ordering::Relaxed));
            }
            let count = h.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"+Inf\"}} {count}");
            let _ = writeln!(out, "{name}_sum{{{labels}}} {}", h.sum_ms.load(Ordering::Relaxed));
            let _ = writeln!(out, "{name}_count{{{labels}}} {count}");
        }
    }
}

#[derive(Default)]
pub struct ServiceMetrics {
    /// labels: report, outcome
    pub report_requests: CounterVec,
    /// labels: metric_set, outcome
    pub upstream_queries: CounterVec,
    /// labels: metric_set
    pub upstream_duration: HistogramVec,
}

impl ServiceMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.report_requests.render("crashboard_report_requests_total", &mut out);
        self.upstream_queries.render("crashboard_upstream_queries_total", &mut out);
        self.upstream_duration.render("crashboard_upstream_duration_millis", &mut out);
        out
    }
}
