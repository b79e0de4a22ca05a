#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gasbar::display::DisplaySink;
use gasbar::fetcher::PriceSource;
use gasbar::refresh::FetchResult;

/// One call made on the display, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Title(String),
    Tooltip(String),
    LastRefresh(String),
    Commit,
}

/// Display that records every call; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl RecordingDisplay {
    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Titles set after the initial placeholder.
    pub fn titles(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DisplayCall::Title(t) if !t.starts_with("- ") => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Last-refresh labels set after the initial "Never".
    pub fn last_refresh_labels(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                DisplayCall::LastRefresh(l) if l != "Last Refresh: Never" => Some(l),
                _ => None,
            })
            .collect()
    }

    pub fn current_title(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|c| match c {
            DisplayCall::Title(t) => Some(t),
            _ => None,
        })
    }

    fn push(&self, call: DisplayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DisplaySink for RecordingDisplay {
    fn set_title(&mut self, title: &str) {
        self.push(DisplayCall::Title(title.to_string()));
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.push(DisplayCall::Tooltip(tooltip.to_string()));
    }

    fn set_last_refresh_label(&mut self, label: &str) {
        self.push(DisplayCall::LastRefresh(label.to_string()));
    }

    fn commit(&mut self) {
        self.push(DisplayCall::Commit);
    }
}

/// Price source that replays a fixed script of (delay, result) pairs.
pub struct ScriptedSource {
    script: Mutex<VecDeque<(Duration, FetchResult)>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(script: Vec<(Duration, FetchResult)>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            script: Mutex::new(script.into()),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }

    /// Script where every fetch completes without delay.
    pub fn immediate(prices: &[&str]) -> (Self, Arc<AtomicUsize>) {
        Self::new(
            prices
                .iter()
                .map(|p| (Duration::ZERO, FetchResult::success(*p)))
                .collect(),
        )
    }
}

impl PriceSource for ScriptedSource {
    async fn fetch(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut script = self.script.lock().unwrap();
            script.pop_front()
        };
        let (delay, result) =
            next.unwrap_or((Duration::ZERO, FetchResult::failure("script exhausted")));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

pub fn gas_page(price: &str) -> String {
    format!(
        r#"<html><body><div class="card"><span id="spanAvgPrice">{price}</span> gwei</div></body></html>"#
    )
}

/// Yield until `calls` reaches `expected` without moving the clock.
pub async fn wait_for_calls(calls: &AtomicUsize, expected: usize) {
    for _ in 0..10_000 {
        if calls.load(Ordering::SeqCst) >= expected {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!(
        "expected {expected} fetches, saw {}",
        calls.load(Ordering::SeqCst)
    );
}

/// Sleep in `step` increments until `condition` holds or `limit` passes.
pub async fn wait_until<F>(condition: F, step: Duration, limit: Duration)
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + limit;
    while !condition() {
        if tokio::time::Instant::now() >= deadline {
            panic!("condition not met within {limit:?}");
        }
        tokio::time::sleep(step).await;
    }
}
