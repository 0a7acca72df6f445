//! Pagination and recursion scenarios against a scripted remote

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::listing::{Entity, ListRequest, Page, RemoteLister, FOLDER_MIME_TYPE};
use core_runtime::events::{ListingEvent, SkipReason};
use core_search::search_terms::{in_parents, name_contains, trashed};
use core_search::{
    Clause, EngineLimits, ListOptions, ListingEngine, ListingObserver, SearchError,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

type Key = (Option<String>, Option<String>);

/// Answers `(query, cursor)` pairs from a script and records every call
#[derive(Default)]
struct ScriptedLister {
    script: Mutex<HashMap<Key, BridgeResult<Page>>>,
    calls: Mutex<Vec<ListRequest>>,
}

impl ScriptedLister {
    fn on(self, query: Option<&str>, cursor: Option<&str>, response: BridgeResult<Page>) -> Self {
        self.script.lock().unwrap().insert(
            (query.map(String::from), cursor.map(String::from)),
            response,
        );
        self
    }

    fn calls(&self) -> Vec<ListRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteLister for ScriptedLister {
    async fn list(&self, request: ListRequest) -> BridgeResult<Page> {
        self.calls.lock().unwrap().push(request.clone());
        let key = (request.query.clone(), request.page_token.clone());
        match self.script.lock().unwrap().get(&key) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(error)) => Err(BridgeError::OperationFailed(error.to_string())),
            None => Ok(Page::last(Vec::new())),
        }
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<ListingEvent>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<ListingEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ListingObserver for RecordingObserver {
    fn on_event(&self, event: &ListingEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn file(id: &str) -> Entity {
    serde_json::from_value(json!({ "id": id, "name": id, "mimeType": "text/plain" })).unwrap()
}

fn folder(id: &str) -> Entity {
    serde_json::from_value(json!({ "id": id, "name": id, "mimeType": FOLDER_MIME_TYPE })).unwrap()
}

fn files(prefix: &str, count: usize) -> Vec<Entity> {
    (0..count).map(|i| file(&format!("{}-{}", prefix, i))).collect()
}

fn ids(entities: &[Entity]) -> Vec<&str> {
    entities.iter().filter_map(Entity::id).collect()
}

fn parent_scope(id: &str) -> String {
    in_parents(id).into_string()
}

fn recursive() -> ListOptions {
    ListOptions::new().recursive(true)
}

#[tokio::test]
async fn three_pages_are_concatenated_in_arrival_order() -> anyhow::Result<()> {
    let query = "name contains 'a'";
    let lister = Arc::new(
        ScriptedLister::default()
            .on(Some(query), None, Ok(Page::new(files("p1", 50), Some("C1".into()))))
            .on(Some(query), Some("C1"), Ok(Page::new(files("p2", 50), Some("C2".into()))))
            .on(Some(query), Some("C2"), Ok(Page::last(files("p3", 7)))),
    );
    let engine = ListingEngine::new(lister.clone());

    let results = engine
        .list(&[name_contains("a")], &ListOptions::default())
        .await?;

    assert_eq!(results.len(), 107);
    assert_eq!(results[0].id(), Some("p1-0"));
    assert_eq!(results[50].id(), Some("p2-0"));
    assert_eq!(results[106].id(), Some("p3-6"));

    let cursors: Vec<Option<String>> = lister.calls().into_iter().map(|c| c.page_token).collect();
    assert_eq!(cursors, vec![None, Some("C1".into()), Some("C2".into())]);
    Ok(())
}

#[tokio::test]
async fn repeated_cursor_stops_pagination() -> anyhow::Result<()> {
    let lister = Arc::new(
        ScriptedLister::default()
            .on(None, None, Ok(Page::new(files("p1", 2), Some("C1".into()))))
            .on(None, Some("C1"), Ok(Page::new(files("p2", 2), Some("C1".into())))),
    );
    let observer = Arc::new(RecordingObserver::default());
    let engine = ListingEngine::new(lister.clone()).with_observer(observer.clone());

    let results = engine.list(&[], &ListOptions::default()).await?;

    assert_eq!(lister.calls().len(), 2);
    assert_eq!(results.len(), 4);
    assert!(observer
        .events()
        .iter()
        .any(|e| matches!(e, ListingEvent::CursorRepeated { page: 2, .. })));
    Ok(())
}

#[tokio::test]
async fn cursor_cycle_stops_pagination() -> anyhow::Result<()> {
    let lister = Arc::new(
        ScriptedLister::default()
            .on(None, None, Ok(Page::new(files("p1", 1), Some("A".into()))))
            .on(None, Some("A"), Ok(Page::new(files("p2", 1), Some("B".into()))))
            .on(None, Some("B"), Ok(Page::new(files("p3", 1), Some("A".into())))),
    );
    let engine = ListingEngine::new(lister.clone());

    let results = engine.list(&[], &ListOptions::default()).await?;

    assert_eq!(lister.calls().len(), 3);
    assert_eq!(results.len(), 3);
    Ok(())
}

#[tokio::test]
async fn page_cap_bounds_a_session() -> anyhow::Result<()> {
    let mut lister = ScriptedLister::default();
    for page in 0..10 {
        let cursor = (page > 0).then(|| format!("C{}", page));
        lister = lister.on(
            None,
            cursor.as_deref(),
            Ok(Page::new(vec![file(&format!("f{}", page))], Some(format!("C{}", page + 1)))),
        );
    }
    let lister = Arc::new(lister);
    let observer = Arc::new(RecordingObserver::default());
    let engine = ListingEngine::new(lister.clone())
        .with_observer(observer.clone())
        .with_limits(EngineLimits {
            max_depth: 4,
            max_pages: 3,
        });

    let results = engine.list(&[], &ListOptions::default()).await?;

    assert_eq!(lister.calls().len(), 3);
    assert_eq!(results.len(), 3);
    assert!(observer
        .events()
        .contains(&ListingEvent::PageLimitReached {
            listing_id: observer.events()[0].listing_id().to_string(),
            depth: 0,
            pages: 3,
        }));
    Ok(())
}

#[tokio::test]
async fn recursive_listing_puts_nested_results_after_direct_children() -> anyhow::Result<()> {
    let f = parent_scope("F");
    let sub = parent_scope("S");
    let lister = Arc::new(
        ScriptedLister::default()
            .on(
                Some(f.as_str()),
                None,
                Ok(Page::last(vec![file("a"), folder("S"), file("b")])),
            )
            .on(Some(sub.as_str()), None, Ok(Page::last(vec![file("nested")]))),
    );
    let engine = ListingEngine::new(lister.clone());

    let results = engine.list(&[in_parents("F")], &recursive()).await?;

    assert_eq!(ids(&results), vec!["a", "S", "b", "nested"]);
    assert_eq!(lister.calls().len(), 2);
    Ok(())
}

#[tokio::test]
async fn folders_are_descended_depth_first_in_encounter_order() -> anyhow::Result<()> {
    let lister = Arc::new(
        ScriptedLister::default()
            .on(None, None, Ok(Page::last(vec![folder("A"), folder("B")])))
            .on(Some(parent_scope("A").as_str()), None, Ok(Page::last(vec![folder("A1"), file("a")])))
            .on(Some(parent_scope("A1").as_str()), None, Ok(Page::last(vec![file("a1")])))
            .on(Some(parent_scope("B").as_str()), None, Ok(Page::last(vec![file("b")]))),
    );
    let engine = ListingEngine::new(lister.clone());

    let results = engine.list(&[], &recursive()).await?;

    assert_eq!(ids(&results), vec!["A", "B", "A1", "a", "a1", "b"]);
    let queries: Vec<Option<String>> = lister.calls().into_iter().map(|c| c.query).collect();
    assert_eq!(
        queries,
        vec![
            None,
            Some(parent_scope("A")),
            Some(parent_scope("A1")),
            Some(parent_scope("B")),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn folder_sessions_ignore_the_callers_filter() -> anyhow::Result<()> {
    let top = "name contains 'x' or trashed=false";
    let lister = Arc::new(
        ScriptedLister::default().on(Some(top), None, Ok(Page::last(vec![folder("D")]))),
    );
    let engine = ListingEngine::new(lister.clone());
    let options = recursive().combinator("or".parse()?).fields("id, mimeType");

    engine
        .list(&[name_contains("x"), trashed(false)], &options)
        .await?;

    let calls = lister.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].query.as_deref(), Some("'D' in parents"));
    assert_eq!(calls[1].fields, "id, mimeType");
    Ok(())
}

#[tokio::test]
async fn parent_cycles_are_listed_once() -> anyhow::Result<()> {
    // X contains Y, Y claims X as a child
    let lister = Arc::new(
        ScriptedLister::default()
            .on(None, None, Ok(Page::last(vec![folder("X")])))
            .on(Some(parent_scope("X").as_str()), None, Ok(Page::last(vec![folder("Y")])))
            .on(Some(parent_scope("Y").as_str()), None, Ok(Page::last(vec![folder("X")]))),
    );
    let observer = Arc::new(RecordingObserver::default());
    let engine = ListingEngine::new(lister.clone()).with_observer(observer.clone());

    let results = engine.list(&[], &recursive()).await?;

    assert_eq!(ids(&results), vec!["X", "Y", "X"]);
    assert_eq!(lister.calls().len(), 3);
    assert!(observer.events().iter().any(|e| matches!(
        e,
        ListingEvent::FolderSkipped { folder_id, reason: SkipReason::AlreadyVisited, .. } if folder_id == "X"
    )));
    Ok(())
}

#[tokio::test]
async fn scoped_folder_is_not_listed_again_through_a_cycle() -> anyhow::Result<()> {
    // The listing is scoped to F; its child S claims F as a child
    let lister = Arc::new(
        ScriptedLister::default()
            .on(Some(parent_scope("F").as_str()), None, Ok(Page::last(vec![folder("S")])))
            .on(Some(parent_scope("S").as_str()), None, Ok(Page::last(vec![folder("F")]))),
    );
    let observer = Arc::new(RecordingObserver::default());
    let engine = ListingEngine::new(lister.clone()).with_observer(observer.clone());

    let results = engine.list(&[in_parents("F")], &recursive()).await?;

    assert_eq!(ids(&results), vec!["S", "F"]);
    assert_eq!(lister.calls().len(), 2);
    assert!(observer.events().iter().any(|e| matches!(
        e,
        ListingEvent::FolderSkipped { folder_id, reason: SkipReason::AlreadyVisited, .. } if folder_id == "F"
    )));
    Ok(())
}

#[tokio::test]
async fn depth_cap_skips_deeper_folders() -> anyhow::Result<()> {
    let lister = Arc::new(
        ScriptedLister::default()
            .on(None, None, Ok(Page::last(vec![folder("L1")])))
            .on(Some(parent_scope("L1").as_str()), None, Ok(Page::last(vec![folder("L2")])))
            .on(Some(parent_scope("L2").as_str()), None, Ok(Page::last(vec![file("deep")]))),
    );
    let observer = Arc::new(RecordingObserver::default());
    let engine = ListingEngine::new(lister.clone()).with_observer(observer.clone());

    let results = engine.list(&[], &recursive().max_depth(1)).await?;

    assert_eq!(ids(&results), vec!["L1", "L2"]);
    assert_eq!(lister.calls().len(), 2);
    assert!(observer.events().iter().any(|e| matches!(
        e,
        ListingEvent::FolderSkipped { folder_id, reason: SkipReason::DepthLimit, .. } if folder_id == "L2"
    )));
    Ok(())
}

#[tokio::test]
async fn non_recursive_listing_does_not_descend() -> anyhow::Result<()> {
    let lister = Arc::new(
        ScriptedLister::default().on(None, None, Ok(Page::last(vec![folder("D"), file("f")]))),
    );
    let engine = ListingEngine::new(lister.clone());

    let results = engine.list(&[], &ListOptions::default()).await?;

    assert_eq!(results.len(), 2);
    assert_eq!(lister.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn failure_on_second_page_discards_partial_results() {
    let lister = Arc::new(
        ScriptedLister::default()
            .on(None, None, Ok(Page::new(files("p1", 50), Some("C1".into()))))
            .on(
                None,
                Some("C1"),
                Err(BridgeError::Status {
                    status: 403,
                    message: "rate limit exceeded".into(),
                }),
            )
            .on(None, Some("C2"), Ok(Page::last(files("p3", 7)))),
    );
    let observer = Arc::new(RecordingObserver::default());
    let engine = ListingEngine::new(lister.clone()).with_observer(observer.clone());

    let result = engine.list(&[], &ListOptions::default()).await;

    match result {
        Err(SearchError::Transport { discarded, .. }) => assert_eq!(discarded, 50),
        other => panic!("expected transport error, got {:?}", other.map(|r| r.len())),
    }
    assert_eq!(lister.calls().len(), 2);
    assert!(matches!(
        observer.events().last(),
        Some(ListingEvent::SessionFailed { discarded: 50, .. })
    ));
}

#[tokio::test]
async fn failure_inside_a_folder_fails_the_whole_listing() {
    let lister = Arc::new(
        ScriptedLister::default()
            .on(None, None, Ok(Page::last(vec![file("top"), folder("D")])))
            .on(
                Some(parent_scope("D").as_str()),
                None,
                Err(BridgeError::OperationFailed("connection reset".into())),
            ),
    );
    let engine = ListingEngine::new(lister);

    let error = engine.list(&[], &recursive()).await.unwrap_err();

    assert_eq!(error.discarded(), 2);
    assert!(matches!(error, SearchError::Transport { .. }));
}

/// Cancels the token once the first page arrives
struct CancelAfterFirstPage {
    token: CancellationToken,
}

impl ListingObserver for CancelAfterFirstPage {
    fn on_event(&self, event: &ListingEvent) {
        if matches!(event, ListingEvent::PageFetched { page: 1, .. }) {
            self.token.cancel();
        }
    }
}

#[tokio::test]
async fn cancellation_takes_effect_before_the_next_page() {
    let lister = Arc::new(
        ScriptedLister::default()
            .on(None, None, Ok(Page::new(files("p1", 50), Some("C1".into()))))
            .on(None, Some("C1"), Ok(Page::last(files("p2", 5)))),
    );
    let token = CancellationToken::new();
    let engine = ListingEngine::new(lister.clone()).with_observer(Arc::new(CancelAfterFirstPage {
        token: token.clone(),
    }));

    let result = engine
        .list_with_cancel(&[], &ListOptions::default(), &token)
        .await;

    assert!(matches!(result, Err(SearchError::Cancelled { discarded: 50 })));
    assert_eq!(lister.calls().len(), 1);
}

#[tokio::test]
async fn cancellation_takes_effect_before_a_folder_session() {
    let lister = Arc::new(
        ScriptedLister::default().on(None, None, Ok(Page::last(vec![folder("D")]))),
    );
    let token = CancellationToken::new();
    let engine = ListingEngine::new(lister.clone()).with_observer(Arc::new(CancelAfterFirstPage {
        token: token.clone(),
    }));

    let result = engine.list_with_cancel(&[], &recursive(), &token).await;

    assert!(matches!(result, Err(SearchError::Cancelled { discarded: 1 })));
    assert_eq!(lister.calls().len(), 1);
}

#[tokio::test]
async fn empty_result_is_not_an_error() -> anyhow::Result<()> {
    let lister = Arc::new(ScriptedLister::default());
    let observer = Arc::new(RecordingObserver::default());
    let engine = ListingEngine::new(lister).with_observer(observer.clone());

    let results = engine
        .list(&[Clause::raw("name = 'nothing'")?], &recursive())
        .await?;

    assert!(results.is_empty());
    assert!(matches!(
        observer.events().last(),
        Some(ListingEvent::SessionCompleted { total: 0, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn events_share_one_listing_id_and_redact_emails() -> anyhow::Result<()> {
    let lister = Arc::new(ScriptedLister::default());
    let observer = Arc::new(RecordingObserver::default());
    let engine = ListingEngine::new(lister.clone()).with_observer(observer.clone());

    engine
        .list(
            &[core_search::search_terms::in_owners("alice@example.com")],
            &ListOptions::default(),
        )
        .await?;

    let events = observer.events();
    let id = events[0].listing_id().to_string();
    assert!(events.iter().all(|e| e.listing_id() == id));
    assert!(matches!(
        &events[0],
        ListingEvent::SessionStarted { query: Some(q), depth: 0, .. } if q == "'a***@[REDACTED]' in owners"
    ));
    // The remote still receives the real address
    assert_eq!(
        lister.calls()[0].query.as_deref(),
        Some("'alice@example.com' in owners")
    );
    Ok(())
}
