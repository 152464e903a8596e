use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::bridge::{self, HostBridge, QueryResult};

use super::candidate::Candidate;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(10);
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Ordered candidates for one prefix, plus the apply-time flag that came with
/// them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionList {
    pub candidates: Vec<Candidate>,
    pub select_text: bool,
}

/// Monotonic query counter shared between a session and its query tasks.
#[derive(Debug, Clone, Default)]
pub struct QuerySeq(Arc<AtomicU64>);

impl QuerySeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.current() == seq
    }
}

/// An empty prefix only produces a popup when completion was asked for.
pub fn should_query(prefix: &str, explicit: bool) -> bool {
    !prefix.is_empty() || explicit
}

/// Existing notes in host order, then the create entries when enabled.
pub fn build_candidates(prefix: &str, result: &QueryResult) -> CompletionList {
    let mut candidates: Vec<Candidate> = result
        .notes
        .iter()
        .map(|hit| Candidate::existing(hit, result.show_folders))
        .collect();

    if result.allow_new_notes && !prefix.is_empty() {
        candidates.push(Candidate::new_note(prefix));
        candidates.push(Candidate::new_task(prefix));
    }

    CompletionList {
        candidates,
        select_text: result.select_text,
    }
}

pub struct CompletionSource<B> {
    bridge: Arc<B>,
    debounce: Duration,
    timeout: Duration,
}

impl<B: HostBridge> CompletionSource<B> {
    pub fn new(bridge: Arc<B>) -> Self {
        Self {
            bridge,
            debounce: DEFAULT_DEBOUNCE,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn bridge(&self) -> &Arc<B> {
        &self.bridge
    }

    /// Candidates for `prefix`. Never fails: host errors and timeouts come back
    /// as an empty list.
    pub async fn complete(&self, prefix: &str, explicit: bool) -> CompletionList {
        if !should_query(prefix, explicit) {
            return CompletionList::default();
        }

        let query = bridge::get_notes(self.bridge.as_ref(), prefix);
        match tokio::time::timeout(self.timeout, query).await {
            Ok(Ok(result)) => {
                let list = build_candidates(prefix, &result);
                tracing::debug!(prefix, count = list.candidates.len(), "completion results");
                list
            }
            Ok(Err(e)) => {
                tracing::warn!(prefix, error = %e, "getNotes failed");
                CompletionList::default()
            }
            Err(_) => {
                tracing::warn!(prefix, timeout_ms = self.timeout.as_millis() as u64, "getNotes timed out");
                CompletionList::default()
            }
        }
    }

    /// Waits out the debounce window, then queries unless `seq` has been
    /// superseded meanwhile. `None` means the query was skipped.
    pub async fn complete_debounced(
        &self,
        seq: u64,
        latest: &QuerySeq,
        prefix: &str,
        explicit: bool,
    ) -> Option<CompletionList> {
        tokio::time::sleep(self.debounce).await;
        if !latest.is_current(seq) {
            tracing::trace!(seq, "query superseded during debounce");
            return None;
        }
        Some(self.complete(prefix, explicit).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{HostRequest, NoteHit};
    use crate::completion::candidate::CandidateKind;
    use crate::test_support::FakeBridge;

    fn hit(id: &str, title: &str) -> NoteHit {
        NoteHit {
            id: id.into(),
            title: title.into(),
            folder: None,
        }
    }

    fn result(notes: Vec<NoteHit>, allow_new_notes: bool) -> QueryResult {
        QueryResult {
            notes,
            show_folders: false,
            allow_new_notes,
            select_text: false,
        }
    }

    #[test]
    fn empty_passive_prefix_is_not_queried() {
        assert!(!should_query("", false));
        assert!(should_query("", true));
        assert!(should_query("a", false));
    }

    #[test]
    fn host_order_is_preserved() {
        let list = build_candidates(
            "p",
            &result(vec![hit("z", "Zebra plan"), hit("a", "Alpha plan")], false),
        );
        let labels: Vec<&str> = list.candidates.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Zebra plan", "Alpha plan"]);
    }

    #[test]
    fn create_entries_come_last_note_then_task() {
        let list = build_candidates("draft", &result(vec![hit("d", "Draft ideas")], true));
        assert_eq!(list.candidates.len(), 3);
        let last_two = &list.candidates[1..];
        assert_eq!(last_two[0].kind, CandidateKind::NewNote);
        assert_eq!(last_two[0].label, "New Note");
        assert!(last_two[0].detail().unwrap().contains("draft"));
        assert_eq!(last_two[1].kind, CandidateKind::NewTask);
        assert_eq!(last_two[1].label, "New Task");
        assert!(last_two[1].detail().unwrap().contains("draft"));
    }

    #[test]
    fn create_entries_absent_when_disabled() {
        for prefix in ["", "draft", "x y z"] {
            let list = build_candidates(prefix, &result(vec![hit("d", "Draft")], false));
            assert!(list.candidates.iter().all(|c| !c.is_create()), "prefix {:?}", prefix);
        }
    }

    #[test]
    fn create_entries_absent_for_empty_prefix() {
        let list = build_candidates("", &result(vec![hit("r", "Recent")], true));
        assert_eq!(list.candidates.len(), 1);
        assert!(!list.candidates[0].is_create());
    }

    #[test]
    fn select_text_flag_is_carried() {
        let mut r = result(vec![], false);
        r.select_text = true;
        assert!(build_candidates("x", &r).select_text);
    }

    #[tokio::test]
    async fn complete_queries_host_with_prefix() {
        let bridge = Arc::new(FakeBridge::new().with_notes("meet", &[("m1", "Meeting")]));
        let source = CompletionSource::new(bridge.clone());

        let list = source.complete("meet", false).await;
        assert_eq!(list.candidates.len(), 1);
        assert_eq!(list.candidates[0].title, "Meeting");
        assert_eq!(
            bridge.requests(),
            vec![HostRequest::GetNotes {
                prefix: "meet".into()
            }]
        );
    }

    #[tokio::test]
    async fn complete_skips_host_for_passive_empty_prefix() {
        let bridge = Arc::new(FakeBridge::new());
        let source = CompletionSource::new(bridge.clone());

        let list = source.complete("", false).await;
        assert!(list.candidates.is_empty());
        assert!(bridge.requests().is_empty());
    }

    #[tokio::test]
    async fn complete_fails_soft_on_host_error() {
        let bridge = Arc::new(FakeBridge::new().failing_get_notes());
        let source = CompletionSource::new(bridge);

        let list = source.complete("anything", false).await;
        assert_eq!(list, CompletionList::default());
    }

    #[tokio::test]
    async fn complete_fails_soft_on_timeout() {
        let bridge = Arc::new(
            FakeBridge::new()
                .with_notes("slow", &[("s", "Slow note")])
                .with_delay("slow", Duration::from_millis(200)),
        );
        let source = CompletionSource::new(bridge).with_timeout(Duration::from_millis(20));

        let list = source.complete("slow", false).await;
        assert!(list.candidates.is_empty());
    }

    #[tokio::test]
    async fn superseded_query_never_reaches_host() {
        let bridge = Arc::new(FakeBridge::new().with_notes("a", &[("a", "A")]));
        let source = CompletionSource::new(bridge.clone()).with_debounce(Duration::from_millis(5));
        let latest = QuerySeq::new();

        let stale = latest.bump();
        latest.bump();
        let out = source.complete_debounced(stale, &latest, "a", false).await;

        assert_eq!(out, None);
        assert!(bridge.requests().is_empty());
    }

    #[tokio::test]
    async fn current_query_runs_after_debounce() {
        let bridge = Arc::new(FakeBridge::new().with_notes("a", &[("a", "A")]));
        let source = CompletionSource::new(bridge).with_debounce(Duration::from_millis(5));
        let latest = QuerySeq::new();

        let seq = latest.bump();
        let out = source.complete_debounced(seq, &latest, "a", false).await.unwrap();
        assert_eq!(out.candidates.len(), 1);
    }

    #[test]
    fn query_seq_is_monotonic() {
        let seq = QuerySeq::new();
        let a = seq.bump();
        let b = seq.bump();
        assert!(b > a);
        assert!(seq.is_current(b));
        assert!(!seq.is_current(a));
    }
}
