// File: streamwatch-core/src/test_utils/helpers.rs

use std::collections::{HashMap, VecDeque};
use std::future::pending;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use tokio::time::timeout;

use streamwatch_common::models::{RenderRequest, RenderedPage, StatusMap};
use streamwatch_common::traits::{Notifier, PageRenderer, StateStore};

use crate::browser::BrowserSession;
use crate::Error;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone)]
enum Scripted {
    Page(RenderedPage),
    NavigationError(String),
    Timeout,
}

/// Renderer that serves canned pages keyed by URL.
///
/// Each URL holds a queue: successive renders pop entries until one is left,
/// which then repeats. Unknown URLs fail like a navigation error.
#[derive(Default)]
pub struct ScriptedRenderer {
    script: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<RenderRequest>>,
}

impl ScriptedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, url: &str, entry: Scripted) {
        lock(&self.script)
            .entry(url.to_string())
            .or_default()
            .push_back(entry);
    }

    pub fn serve(&self, url: &str, page: RenderedPage) -> &Self {
        self.push(url, Scripted::Page(page));
        self
    }

    pub fn serve_html(&self, url: &str, html: &str) -> &Self {
        self.serve(url, RenderedPage::from_html(html))
    }

    pub fn serve_body_text(&self, url: &str, text: &str) -> &Self {
        self.serve(url, RenderedPage::from_body_text(text))
    }

    pub fn fail(&self, url: &str, message: &str) -> &Self {
        self.push(url, Scripted::NavigationError(message.to_string()));
        self
    }

    /// Fails the render with `Error::Timeout`.
    pub fn time_out(&self, url: &str) -> &Self {
        self.push(url, Scripted::Timeout);
        self
    }

    /// Drops everything scripted so far for `url`.
    pub fn reset(&self, url: &str) -> &Self {
        lock(&self.script).remove(url);
        self
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        lock(&self.requests).clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl PageRenderer for ScriptedRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, Error> {
        lock(&self.requests).push(request.clone());

        let next = {
            let mut script = lock(&self.script);
            match script.get_mut(&request.url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match next {
            Some(Scripted::Page(mut page)) => {
                if request.probe_selector.is_none() {
                    page.probe_matched = false;
                }
                Ok(page)
            }
            Some(Scripted::NavigationError(msg)) => Err(Error::Navigation(msg)),
            Some(Scripted::Timeout) => {
                // Same error the real renderer raises when its deadline passes.
                let elapsed = timeout(Duration::ZERO, pending::<()>()).await;
                match elapsed {
                    Err(e) => Err(Error::Timeout(e)),
                    Ok(()) => Err(Error::Navigation(format!("timed out loading {}", request.url))),
                }
            }
            None => Err(Error::Navigation(format!("net::ERR_NAME_NOT_RESOLVED at {}", request.url))),
        }
    }
}

/// Browser session over a [`ScriptedRenderer`] that counts `close` calls.
pub struct ScriptedSession {
    renderer: ScriptedRenderer,
    closes: Arc<AtomicUsize>,
}

impl ScriptedSession {
    pub fn new(renderer: ScriptedRenderer) -> Self {
        Self { renderer, closes: Arc::new(AtomicUsize::new(0)) }
    }

    /// Shared counter, readable after the session has been consumed.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        self.closes.clone()
    }
}

#[async_trait]
impl PageRenderer for ScriptedSession {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, Error> {
        self.renderer.render(request).await
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn close(self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier that records every message; optionally fails every send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    /// Messages that were accepted.
    pub fn sent(&self) -> Vec<String> {
        lock(&self.sent).clone()
    }

    /// Every call to `send`, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Notification("connection refused".into()));
        }
        lock(&self.sent).push(text.to_string());
        Ok(())
    }
}

/// In-memory state store; `failing()` rejects every save.
#[derive(Default)]
pub struct MemoryStateStore {
    statuses: Mutex<StatusMap>,
    saves: AtomicUsize,
    fail_saves: bool,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(statuses: StatusMap) -> Self {
        Self {
            statuses: Mutex::new(statuses),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self { fail_saves: true, ..Self::default() }
    }

    pub fn snapshot(&self) -> StatusMap {
        lock(&self.statuses).clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> StatusMap {
        self.snapshot()
    }

    fn save(&self, statuses: &StatusMap) -> Result<(), Error> {
        if self.fail_saves {
            return Err(Error::State("no space left on device".into()));
        }
        *lock(&self.statuses) = statuses.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
