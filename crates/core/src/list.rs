use std::collections::HashMap;

use parking_lot::Mutex;

use crate::bus::{Entity, InvalidationBus};
use crate::error::ApiError;
use crate::remote::PageFetcher;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PageKey {
    page: u32,
    search: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedPage<T> {
    data: Vec<T>,
    count: u64,
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadPhase {
    Loading,
    Ready,
    Error(String),
}

/// What a list view renders: the current page's records plus the flags the
/// pagination footer and dimming logic need.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub data: Vec<T>,
    pub count: u64,
    pub page: u32,
    pub per_page: u32,
    /// First fetch still in flight, nothing to show yet.
    pub is_loading: bool,
    /// Showing data from a previous page/search while the new one loads.
    pub is_placeholder: bool,
    pub error: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

#[derive(Debug)]
struct Shown<T> {
    key: PageKey,
    data: Vec<T>,
    count: u64,
    /// False once the page/search moved away from `key`; the data keeps
    /// being displayed (dimmed) until the replacement lands.
    fresh: bool,
    epoch: u64,
}

#[derive(Debug)]
struct StoreState<T> {
    page: u32,
    search: Option<String>,
    phase: LoadPhase,
    shown: Option<Shown<T>>,
    cache: HashMap<PageKey, CachedPage<T>>,
    /// Request-intent serial: bumped on every parameter change so a response
    /// resolving late can tell it no longer matches what the view wants.
    serial: u64,
}

/// Paginated, searchable list query with a per-store page cache and eager
/// next-page prefetch.
///
/// Only the most recently requested page/search combination is ever applied
/// to the visible state: responses are matched against the intent serial
/// captured when they were issued and discarded on mismatch, so completion
/// order cannot overwrite fresher state. Abandoned requests are not aborted
/// over the wire; their result still lands in the cache where it is harmless.
///
/// Cache entries are stamped with the entity's invalidation epoch from the
/// shared [`InvalidationBus`]; any mutation bumps the epoch and every cached
/// page for the entity stops matching at once.
pub struct ListStore<T, F> {
    entity: Entity,
    per_page: u32,
    fetcher: F,
    bus: InvalidationBus,
    state: Mutex<StoreState<T>>,
}

impl<T, F> ListStore<T, F>
where
    T: Clone + Send,
    F: PageFetcher<T>,
{
    pub fn new(entity: Entity, per_page: u32, fetcher: F, bus: InvalidationBus) -> Self {
        Self {
            entity,
            per_page,
            fetcher,
            bus,
            state: Mutex::new(StoreState {
                page: 1,
                search: None,
                phase: LoadPhase::Loading,
                shown: None,
                cache: HashMap::new(),
                serial: 0,
            }),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn page(&self) -> u32 {
        self.state.lock().page
    }

    pub fn search(&self) -> Option<String> {
        self.state.lock().search.clone()
    }

    /// Move to a 1-based page. The current data stays visible as placeholder
    /// until [`ListStore::refresh`] lands the new page.
    pub fn set_page(&self, page: u32) {
        let page = page.max(1);
        let mut state = self.state.lock();
        if state.page == page {
            return;
        }
        state.page = page;
        state.serial += 1;
        if let Some(shown) = state.shown.as_mut() {
            shown.fresh = false;
        }
    }

    /// Change the committed search term. Resets to page 1: a stale
    /// out-of-range page combined with a narrower filter would silently
    /// render an empty list.
    pub fn set_search(&self, term: Option<String>) {
        let term = term.filter(|t| !t.is_empty());
        let mut state = self.state.lock();
        if state.search == term {
            return;
        }
        state.search = term;
        state.page = 1;
        state.serial += 1;
        if let Some(shown) = state.shown.as_mut() {
            shown.fresh = false;
        }
    }

    /// True when the visible data no longer reflects the requested
    /// parameters or the entity has been invalidated since it was fetched.
    pub fn is_stale(&self) -> bool {
        let state = self.state.lock();
        match &state.shown {
            None => true,
            Some(shown) => !shown.fresh || shown.epoch != self.bus.epoch(self.entity),
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.state.lock();
        let (data, count) = match &state.shown {
            Some(shown) => (shown.data.clone(), shown.count),
            None => (Vec::new(), 0),
        };
        let is_placeholder = state.shown.as_ref().map(|s| !s.fresh).unwrap_or(false);
        let has_next_page = state
            .shown
            .as_ref()
            .filter(|shown| shown.fresh)
            .map(|shown| self.more_after(&shown.key, shown.data.len(), shown.count))
            .unwrap_or(false);

        ListSnapshot {
            has_next_page,
            has_previous_page: state.page > 1,
            page: state.page,
            per_page: self.per_page,
            is_loading: state.shown.is_none() && state.phase != LoadPhase::Ready,
            is_placeholder,
            error: match &state.phase {
                LoadPhase::Error(message) => Some(message.clone()),
                _ => None,
            },
            data,
            count,
        }
    }

    /// Fetch the current page (from cache when a fresh entry exists), then
    /// eagerly prefetch the page after it while there is one.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let epoch = self.bus.epoch(self.entity);
        let (key, serial, cached) = {
            let mut state = self.state.lock();
            let key = PageKey {
                page: state.page,
                search: state.search.clone(),
            };
            let cached = state
                .cache
                .get(&key)
                .filter(|entry| entry.epoch == epoch)
                .cloned();
            if cached.is_none() && state.shown.is_none() {
                state.phase = LoadPhase::Loading;
            }
            (key, state.serial, cached)
        };

        if let Some(hit) = cached {
            let mut state = self.state.lock();
            if state.serial == serial {
                state.shown = Some(Shown {
                    key,
                    data: hit.data,
                    count: hit.count,
                    fresh: true,
                    epoch,
                });
                state.phase = LoadPhase::Ready;
            }
        } else {
            let fetched = self
                .fetcher
                .fetch_page(self.skip(key.page), self.per_page, key.search.as_deref())
                .await;

            let mut state = self.state.lock();
            match fetched {
                Ok(page) => {
                    state.cache.insert(
                        key.clone(),
                        CachedPage {
                            data: page.data.clone(),
                            count: page.count,
                            epoch,
                        },
                    );
                    if state.serial != serial {
                        tracing::debug!(
                            entity = self.entity.as_str(),
                            page = key.page,
                            "discarding response for superseded parameters"
                        );
                        return Ok(());
                    }
                    state.shown = Some(Shown {
                        key,
                        data: page.data,
                        count: page.count,
                        fresh: true,
                        epoch,
                    });
                    state.phase = LoadPhase::Ready;
                }
                Err(err) => {
                    if state.serial != serial {
                        tracing::debug!(
                            entity = self.entity.as_str(),
                            page = key.page,
                            %err,
                            "discarding failure for superseded parameters"
                        );
                        return Ok(());
                    }
                    state.phase = LoadPhase::Error(err.to_string());
                    return Err(err);
                }
            }
        }

        self.prefetch_next(epoch).await;
        Ok(())
    }

    async fn prefetch_next(&self, epoch: u64) {
        let next_key = {
            let state = self.state.lock();
            let Some(shown) = state.shown.as_ref().filter(|s| s.fresh) else {
                return;
            };
            if !self.more_after(&shown.key, shown.data.len(), shown.count) {
                return;
            }
            let key = PageKey {
                page: shown.key.page + 1,
                search: shown.key.search.clone(),
            };
            if state
                .cache
                .get(&key)
                .map(|entry| entry.epoch == epoch)
                .unwrap_or(false)
            {
                return;
            }
            key
        };

        match self
            .fetcher
            .fetch_page(
                self.skip(next_key.page),
                self.per_page,
                next_key.search.as_deref(),
            )
            .await
        {
            Ok(page) => {
                self.state.lock().cache.insert(
                    next_key,
                    CachedPage {
                        data: page.data,
                        count: page.count,
                        epoch,
                    },
                );
            }
            Err(err) => {
                tracing::debug!(entity = self.entity.as_str(), %err, "prefetch failed");
            }
        }
    }

    fn skip(&self, page: u32) -> u32 {
        (page - 1) * self.per_page
    }

    /// Whether records exist beyond the given page. Prefers the exact
    /// comparison against the server's total `count`; falls back to the
    /// short-page heuristic when the count contradicts the data it came with.
    fn more_after(&self, key: &PageKey, len: usize, count: u64) -> bool {
        let fetched = u64::from(self.skip(key.page)) + len as u64;
        if count >= fetched {
            fetched < count
        } else {
            len as u64 == u64::from(self.per_page)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    use super::*;
    use crate::model::Page;

    /// Serves `total` rows named row-001.. with server-style offset
    /// pagination and substring search, recording every request.
    struct FakeRows {
        total: usize,
        calls: Mutex<Vec<(u32, Option<String>)>>,
        fail_next: AtomicBool,
        gate_first: Option<Arc<Notify>>,
    }

    impl FakeRows {
        fn new(total: usize) -> Self {
            Self {
                total,
                calls: Mutex::new(Vec::new()),
                fail_next: AtomicBool::new(false),
                gate_first: None,
            }
        }

        fn calls(&self) -> Vec<(u32, Option<String>)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl PageFetcher<String> for FakeRows {
        async fn fetch_page(
            &self,
            skip: u32,
            limit: u32,
            search: Option<&str>,
        ) -> Result<Page<String>, ApiError> {
            let first_call = {
                let mut calls = self.calls.lock();
                calls.push((skip, search.map(String::from)));
                calls.len() == 1
            };
            if let (true, Some(gate)) = (first_call, self.gate_first.as_ref()) {
                gate.notified().await;
            }
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    detail: "boom".into(),
                });
            }

            let rows: Vec<String> = (1..=self.total)
                .map(|n| format!("row-{:03}", n))
                .filter(|row| search.map(|s| row.contains(s)).unwrap_or(true))
                .collect();
            let count = rows.len() as u64;
            let data = rows
                .into_iter()
                .skip(skip as usize)
                .take(limit as usize)
                .collect();
            Ok(Page { data, count })
        }
    }

    fn store(total: usize) -> ListStore<String, Arc<FakeRows>> {
        ListStore::new(
            Entity::Tasks,
            10,
            Arc::new(FakeRows::new(total)),
            InvalidationBus::new(),
        )
    }

    #[tokio::test]
    async fn initial_snapshot_is_loading_until_first_page_lands() {
        let store = store(3);
        let before = store.snapshot();
        assert!(before.is_loading);
        assert!(before.data.is_empty());

        store.refresh().await.unwrap();
        let after = store.snapshot();
        assert!(!after.is_loading);
        assert_eq!(after.data.len(), 3);
        assert_eq!(after.count, 3);
    }

    #[tokio::test]
    async fn next_page_flags_use_the_exact_total() {
        let fetcher = Arc::new(FakeRows::new(25));
        let bus = InvalidationBus::new();
        let store = ListStore::new(Entity::Tasks, 10, fetcher.clone(), bus);

        store.refresh().await.unwrap();
        let page1 = store.snapshot();
        assert!(page1.has_next_page);
        assert!(!page1.has_previous_page);

        store.set_page(3);
        store.refresh().await.unwrap();
        let page3 = store.snapshot();
        assert_eq!(page3.data.len(), 5);
        assert!(!page3.has_next_page);
        assert!(page3.has_previous_page);
    }

    #[tokio::test]
    async fn exactly_full_last_page_reports_no_next() {
        // 20 rows, page size 10: page 2 is full but the count says stop.
        let store = store(20);
        store.set_page(2);
        store.refresh().await.unwrap();
        assert!(!store.snapshot().has_next_page);
    }

    #[tokio::test]
    async fn refresh_prefetches_the_following_page() {
        let fetcher = Arc::new(FakeRows::new(25));
        let store = ListStore::new(Entity::Tasks, 10, fetcher.clone(), InvalidationBus::new());

        store.refresh().await.unwrap();
        assert_eq!(fetcher.calls(), vec![(0, None), (10, None)]);

        // Page 2 was prefetched: navigating forward reuses the cache and only
        // the page-3 prefetch goes out.
        store.set_page(2);
        store.refresh().await.unwrap();
        assert_eq!(fetcher.calls(), vec![(0, None), (10, None), (20, None)]);
        assert_eq!(store.snapshot().data.len(), 10);
    }

    #[tokio::test]
    async fn stale_data_stays_visible_while_refetching() {
        let store = store(25);
        store.refresh().await.unwrap();
        let ready = store.snapshot();
        assert!(!ready.is_placeholder);

        store.set_search(Some("row-02".into()));
        let dimmed = store.snapshot();
        assert!(dimmed.is_placeholder);
        assert_eq!(dimmed.data, ready.data);
        assert!(!dimmed.has_next_page);
        assert!(!dimmed.is_loading);

        store.refresh().await.unwrap();
        let after = store.snapshot();
        assert!(!after.is_placeholder);
        // row-020 through row-025 match, well under one page.
        assert_eq!(after.count, 6);
        assert_eq!(after.data.len(), 6);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_prior_data_and_surfaces_the_error() {
        let fetcher = Arc::new(FakeRows::new(25));
        let store = ListStore::new(Entity::Tasks, 10, fetcher.clone(), InvalidationBus::new());
        store.refresh().await.unwrap();

        fetcher.fail_next.store(true, Ordering::SeqCst);
        store.set_search(Some("row".into()));
        let err = store.refresh().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));

        let snap = store.snapshot();
        assert!(snap.error.is_some());
        assert_eq!(snap.data.len(), 10);

        // A later retry with the same parameters succeeds and clears the error.
        store.refresh().await.unwrap();
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn search_change_resets_to_page_one() {
        let store = store(25);
        store.set_page(3);
        store.refresh().await.unwrap();
        assert_eq!(store.page(), 3);

        store.set_search(Some("row-01".into()));
        assert_eq!(store.page(), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_a_refetch_of_cached_pages() {
        let fetcher = Arc::new(FakeRows::new(5));
        let bus = InvalidationBus::new();
        let store = ListStore::new(Entity::Tasks, 10, fetcher.clone(), bus.clone());

        store.refresh().await.unwrap();
        store.refresh().await.unwrap();
        // Second refresh was served from cache.
        assert_eq!(fetcher.calls().len(), 1);
        assert!(!store.is_stale());

        bus.invalidate(Entity::Tasks);
        assert!(store.is_stale());
        store.refresh().await.unwrap();
        assert_eq!(fetcher.calls().len(), 2);
        assert!(!store.is_stale());
    }

    #[tokio::test]
    async fn late_response_for_superseded_parameters_is_discarded() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(FakeRows {
            gate_first: Some(gate.clone()),
            ..FakeRows::new(25)
        });
        let store = Arc::new(ListStore::new(
            Entity::Tasks,
            10,
            fetcher.clone(),
            InvalidationBus::new(),
        ));

        let slow = {
            let store = store.clone();
            async move { store.refresh().await }
        };
        let fast = async {
            // Let the first request get issued and parked on the gate.
            for _ in 0..8 {
                tokio::task::yield_now().await;
            }
            store.set_page(2);
            store.refresh().await.unwrap();
            gate.notify_one();
        };
        let (slow_result, ()) = tokio::join!(slow, fast);
        slow_result.unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.page, 2);
        assert!(!snap.is_placeholder);
        assert_eq!(snap.data.first().map(String::as_str), Some("row-011"));
    }

    #[tokio::test]
    async fn late_failure_for_superseded_parameters_is_swallowed() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(FakeRows {
            gate_first: Some(gate.clone()),
            ..FakeRows::new(25)
        });
        let store = Arc::new(ListStore::new(
            Entity::Tasks,
            10,
            fetcher.clone(),
            InvalidationBus::new(),
        ));

        let slow = {
            let store = store.clone();
            async move { store.refresh().await }
        };
        let fast = async {
            for _ in 0..8 {
                tokio::task::yield_now().await;
            }
            store.set_page(2);
            store.refresh().await.unwrap();
            // The parked first request will now resolve as a failure.
            fetcher.fail_next.store(true, Ordering::SeqCst);
            gate.notify_one();
        };
        let (slow_result, ()) = tokio::join!(slow, fast);

        // The failure belonged to abandoned parameters: not an error for the
        // caller and not surfaced in the snapshot.
        assert!(slow_result.is_ok());
        let snap = store.snapshot();
        assert_eq!(snap.error, None);
        assert_eq!(snap.page, 2);
        assert_eq!(snap.data.first().map(String::as_str), Some("row-011"));
    }
}
