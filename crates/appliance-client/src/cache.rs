//! # Query Cache
//!
//! Content-addressed cache of GET responses with tag-based invalidation.
//!
//! ## Cache Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Query Cache Lifecycle                            │
//! │                                                                         │
//! │  query(key) ──► fresh entry? ──yes──► decode, return                    │
//! │                      │                                                  │
//! │                      no                                                 │
//! │                      ▼                                                  │
//! │              per-key lock (one request in flight per key)               │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │              fresh now? ──yes──► return (another caller fetched it)     │
//! │                      │                                                  │
//! │                      no                                                 │
//! │                      ▼                                                  │
//! │              fetch ──► store value + provided tags                      │
//! │                          (stale if invalidated mid-fetch,               │
//! │                           dropped if cleared mid-fetch)                 │
//! │                                                                         │
//! │  mutation ──► invalidate(tags) ──► matching entries stale               │
//! │                                    └─► generation bump ──► subscribers  │
//! │                                                            refetch      │
//! │                                                                         │
//! │  prune(now) ──► drop entries with no subscriber unused > keep_unused    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tag Matching
//! - `Tag { Order, Id(7) }` matches only entries that provided it
//! - `Tag { Order, List }` matches only entries that provided `List`
//! - `Tag { Locale, Whole }` matches every entry of the resource

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::error::ClientResult;

// =============================================================================
// Keys & Tags
// =============================================================================

/// Identity of a cached query: endpoint path plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(endpoint: impl Into<String>) -> Self {
        QueryKey {
            endpoint: endpoint.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(endpoint: impl Into<String>, mut params: Vec<(String, String)>) -> Self {
        params.sort();
        QueryKey {
            endpoint: endpoint.into(),
            params,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

/// Resource families sharing a tag namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Appliance,
    Manufacturer,
    Client,
    Employee,
    Order,
    Locale,
    Profile,
}

/// Which slice of a resource a tag names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagId {
    List,
    Search,
    Category,
    PowerType,
    ClientList,
    EmployeeList,
    StatusList,
    Id(i64),
    Name(String),
    /// The whole resource: as provided, only matched by `Whole`; as
    /// invalidated, matches every entry of the resource.
    Whole,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub resource: Resource,
    pub id: TagId,
}

impl Tag {
    pub fn new(resource: Resource, id: TagId) -> Self {
        Tag { resource, id }
    }

    pub fn id(resource: Resource, id: i64) -> Self {
        Tag::new(resource, TagId::Id(id))
    }

    pub fn whole(resource: Resource) -> Self {
        Tag::new(resource, TagId::Whole)
    }

    /// Does invalidating `self` hit an entry that provided `provided`?
    pub fn invalidates(&self, provided: &Tag) -> bool {
        self.resource == provided.resource && (self.id == TagId::Whole || self.id == provided.id)
    }

    /// Tags of a page envelope: one per record id plus the list tag.
    pub fn for_page(resource: Resource, list: TagId, page: &Value) -> Vec<Tag> {
        let mut tags: Vec<Tag> = page
            .get("content")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| row.get("id").and_then(Value::as_i64))
                    .map(|id| Tag::id(resource, id))
                    .collect()
            })
            .unwrap_or_default();
        tags.push(Tag::new(resource, list));
        tags
    }
}

// =============================================================================
// Entries
// =============================================================================

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    tags: Vec<Tag>,
    fetched_at: DateTime<Utc>,
    stale: bool,
    subscribers: usize,
    unused_since: Option<DateTime<Utc>>,
}

/// Snapshot of an entry for diagnostics and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo {
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
    pub subscribers: usize,
}

/// What happened to the cache while one fetch was outstanding.
#[derive(Debug, Default)]
struct FetchMark {
    invalidated: Vec<Tag>,
    cleared: bool,
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    in_flight: Mutex<HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>>,
    fetches: Mutex<HashMap<u64, FetchMark>>,
    next_fetch: AtomicU64,
    generation: watch::Sender<u64>,
    keep_unused: Duration,
}

impl Inner {
    // Lock order: `entries` before `fetches`.
    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fetches(&self) -> MutexGuard<'_, HashMap<u64, FetchMark>> {
        self.fetches.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries().get(key).map_or(true, |e| e.stale)
    }
}

// =============================================================================
// Query Cache
// =============================================================================

/// Shared query cache. Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl QueryCache {
    pub fn new(keep_unused: Duration) -> Self {
        let (generation, _) = watch::channel(0);
        QueryCache {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                fetches: Mutex::new(HashMap::new()),
                next_fetch: AtomicU64::new(0),
                generation,
                keep_unused,
            }),
        }
    }

    /// Returns the cached value for `key`, fetching it when missing or stale.
    ///
    /// Concurrent calls for the same key share one fetch. `provides` derives
    /// the entry's tags from the fetched document.
    pub async fn query<T, F, Fut, P>(&self, key: QueryKey, fetch: F, provides: P) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = ClientResult<Value>>,
        P: FnOnce(&Value) -> Vec<Tag>,
    {
        if let Some(value) = self.fresh(&key) {
            trace!(%key, "Cache hit");
            return Ok(serde_json::from_value(value)?);
        }

        let lock = self.key_lock(&key);
        let _guard = lock.lock().await;

        if let Some(value) = self.fresh(&key) {
            trace!(%key, "Cache filled while waiting");
            return Ok(serde_json::from_value(value)?);
        }

        debug!(%key, "Cache miss, fetching");
        let pending = PendingFetch::begin(&self.inner);
        let value = fetch().await?;
        let tags = provides(&value);
        self.settle(key, value.clone(), tags, pending);

        Ok(serde_json::from_value(value)?)
    }

    fn fresh(&self, key: &QueryKey) -> Option<Value> {
        self.inner
            .entries()
            .get(key)
            .filter(|e| !e.stale)
            .map(|e| e.value.clone())
    }

    fn key_lock(&self, key: &QueryKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut in_flight = self.inner.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.retain(|_, lock| Arc::strong_count(lock) > 1);
        in_flight.entry(key.clone()).or_default().clone()
    }

    /// Stores a value, keeping the subscriber count of an existing entry.
    pub fn store(&self, key: QueryKey, value: Value, tags: Vec<Tag>) {
        insert(&mut self.inner.entries(), key, value, tags, false);
    }

    /// Stores a fetched value unless the cache moved on while it was in flight.
    ///
    /// ## Rules
    /// - cleared mid-fetch: the value is not cached
    /// - invalidated mid-fetch by a tag the value provides: cached stale,
    ///   subscribers woken
    fn settle(&self, key: QueryKey, value: Value, tags: Vec<Tag>, pending: PendingFetch<'_>) {
        let stale = {
            let mut entries = self.inner.entries();
            let mark = pending.finish();
            if mark.cleared {
                debug!(%key, "Cache cleared during fetch, result not cached");
                return;
            }
            let stale = tags
                .iter()
                .any(|provided| mark.invalidated.iter().any(|t| t.invalidates(provided)));
            insert(&mut entries, key.clone(), value, tags, stale);
            stale
        };

        if stale {
            debug!(%key, "Invalidated during fetch, cached as stale");
            self.inner.generation.send_modify(|g| *g += 1);
        }
    }

    /// Marks every entry hit by `tags` stale and wakes subscribers.
    ///
    /// Returns the number of entries marked.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        let marked = {
            let mut entries = self.inner.entries();
            let mut marked = 0;
            for entry in entries.values_mut() {
                if entry
                    .tags
                    .iter()
                    .any(|provided| tags.iter().any(|t| t.invalidates(provided)))
                {
                    entry.stale = true;
                    marked += 1;
                }
            }
            for mark in self.inner.fetches().values_mut() {
                mark.invalidated.extend(tags.iter().cloned());
            }
            marked
        };

        if marked > 0 {
            self.inner.generation.send_modify(|g| *g += 1);
        }
        debug!(tags = ?tags, marked, "Invalidated cache tags");
        marked
    }

    /// Registers interest in a key. Entries with subscribers are never pruned.
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        let registered = match self.inner.entries().get_mut(&key) {
            Some(entry) => {
                entry.subscribers += 1;
                entry.unused_since = None;
                true
            }
            None => false,
        };
        Subscription {
            key,
            registered,
            inner: self.inner.clone(),
            generation: self.inner.generation.subscribe(),
        }
    }

    /// Drops entries nobody subscribes to and unused for longer than
    /// `keep_unused`. Returns how many were dropped.
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let keep = chrono::Duration::from_std(self.inner.keep_unused)
            .unwrap_or_else(|_| chrono::Duration::zero());
        let mut entries = self.inner.entries();
        let before = entries.len();
        entries.retain(|_, e| match e.unused_since {
            Some(since) if e.subscribers == 0 => now - since < keep,
            _ => true,
        });
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!(dropped, "Pruned unused cache entries");
        }
        dropped
    }

    /// Forgets everything, e.g. on logout.
    pub fn clear(&self) {
        {
            let mut entries = self.inner.entries();
            entries.clear();
            for mark in self.inner.fetches().values_mut() {
                mark.cleared = true;
            }
        }
        self.inner.generation.send_modify(|g| *g += 1);
    }

    /// Cached value without fetching, stale or not.
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.inner.entries().get(key).map(|e| e.value.clone())?;
        serde_json::from_value(value).ok()
    }

    pub fn info(&self, key: &QueryKey) -> Option<EntryInfo> {
        self.inner.entries().get(key).map(|e| EntryInfo {
            fetched_at: e.fetched_at,
            stale: e.stale,
            subscribers: e.subscribers,
        })
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.inner.is_stale(key)
    }

    pub fn len(&self) -> usize {
        self.inner.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert(
    entries: &mut HashMap<QueryKey, Entry>,
    key: QueryKey,
    value: Value,
    tags: Vec<Tag>,
    stale: bool,
) {
    let now = Utc::now();
    let (subscribers, unused_since) = entries
        .get(&key)
        .map(|e| (e.subscribers, e.unused_since))
        .unwrap_or((0, Some(now)));
    entries.insert(
        key,
        Entry {
            value,
            tags,
            fetched_at: now,
            stale,
            subscribers,
            unused_since,
        },
    );
}

/// Registration of one outstanding fetch. Removed on drop, so a failed
/// fetch leaves nothing behind.
struct PendingFetch<'a> {
    inner: &'a Inner,
    id: u64,
}

impl<'a> PendingFetch<'a> {
    fn begin(inner: &'a Inner) -> Self {
        let id = inner.next_fetch.fetch_add(1, Ordering::Relaxed);
        inner.fetches().insert(id, FetchMark::default());
        PendingFetch { inner, id }
    }

    fn finish(self) -> FetchMark {
        let mark = self.inner.fetches().remove(&self.id);
        mark.unwrap_or_default()
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        self.inner.fetches().remove(&self.id);
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("keep_unused", &self.inner.keep_unused)
            .finish()
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// A page's interest in one query.
///
/// Dropping it only stops caring about the result; an in-flight fetch
/// still completes and fills the cache.
pub struct Subscription {
    key: QueryKey,
    registered: bool,
    inner: Arc<Inner>,
    generation: watch::Receiver<u64>,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Waits until this subscription's entry is invalidated or removed.
    ///
    /// Returns `false` when the cache itself is gone.
    pub async fn invalidated(&mut self) -> bool {
        loop {
            if !self.changed().await {
                return false;
            }
            if self.is_stale() {
                return true;
            }
        }
    }

    /// Waits for any invalidation anywhere in the cache.
    pub async fn changed(&mut self) -> bool {
        self.generation.changed().await.is_ok()
    }

    /// Stale or missing entries need a refetch.
    pub fn is_stale(&self) -> bool {
        self.inner.is_stale(&self.key)
    }

    /// Attaches to the entry once it exists, for subscriptions taken
    /// before the first fetch completed.
    pub fn attach(&mut self) {
        if self.registered {
            return;
        }
        if let Some(entry) = self.inner.entries().get_mut(&self.key) {
            entry.subscribers += 1;
            entry.unused_since = None;
            self.registered = true;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.registered {
            return;
        }
        if let Some(entry) = self.inner.entries().get_mut(&self.key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                entry.unused_since = Some(Utc::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn page(ids: &[i64]) -> Value {
        json!({
            "content": ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>(),
            "totalElements": ids.len(),
            "totalPages": 1,
            "size": 10,
            "number": 0,
            "first": true,
            "last": true
        })
    }

    fn orders_key() -> QueryKey {
        QueryKey::with_params(
            "/orders",
            vec![("page".into(), "0".into()), ("size".into(), "10".into())],
        )
    }

    #[tokio::test]
    async fn test_identical_keys_share_one_fetch() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let fetch = |calls: Arc<AtomicUsize>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, crate::error::ClientError>(page(&[1, 2]))
            }
        };
        let provides = |v: &Value| Tag::for_page(Resource::Order, TagId::List, v);

        let (a, b) = tokio::join!(
            cache.query::<Value, _, _, _>(orders_key(), fetch(calls.clone()), provides),
            cache.query::<Value, _, _, _>(orders_key(), fetch(calls.clone()), provides),
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Cached
        let _: Value = cache
            .query(orders_key(), fetch(calls.clone()), provides)
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidation_forces_refetch() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));
        let provides = |v: &Value| Tag::for_page(Resource::Order, TagId::List, v);

        for _ in 0..2 {
            let calls = calls.clone();
            let _: Value = cache
                .query(
                    orders_key(),
                    move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, crate::error::ClientError>(page(&[7]))
                    },
                    provides,
                )
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(cache.invalidate(&[Tag::id(Resource::Order, 7)]), 1);
        assert!(cache.is_stale(&orders_key()));

        let calls2 = calls.clone();
        let _: Value = cache
            .query(
                orders_key(),
                move || async move {
                    calls2.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, crate::error::ClientError>(page(&[7]))
                },
                provides,
            )
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidation_during_refetch_keeps_entry_stale() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let provides = |v: &Value| Tag::for_page(Resource::Order, TagId::List, v);
        cache.store(orders_key(), page(&[1]), provides(&page(&[1])));
        cache.invalidate(&[Tag::new(Resource::Order, TagId::List)]);

        // A mutation commits while the refetch is on the wire
        let during = cache.clone();
        let old: Value = cache
            .query(
                orders_key(),
                move || async move {
                    assert_eq!(during.invalidate(&[Tag::new(Resource::Order, TagId::List)]), 1);
                    Ok::<_, crate::error::ClientError>(page(&[1]))
                },
                provides,
            )
            .await
            .unwrap();
        assert_eq!(old, page(&[1]));
        assert!(cache.is_stale(&orders_key()));

        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let fresh: Value = cache
            .query(
                orders_key(),
                move || async move {
                    counted.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, crate::error::ClientError>(page(&[1, 2]))
                },
                provides,
            )
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fresh, page(&[1, 2]));
        assert!(!cache.is_stale(&orders_key()));
    }

    #[tokio::test]
    async fn test_unrelated_invalidation_during_fetch_keeps_entry_fresh() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let during = cache.clone();
        let _: Value = cache
            .query(
                orders_key(),
                move || async move {
                    during.invalidate(&[Tag::new(Resource::Appliance, TagId::List)]);
                    Ok::<_, crate::error::ClientError>(page(&[1]))
                },
                |v: &Value| Tag::for_page(Resource::Order, TagId::List, v),
            )
            .await
            .unwrap();
        assert!(!cache.is_stale(&orders_key()));
    }

    #[tokio::test]
    async fn test_clear_during_fetch_does_not_repopulate() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let profile = QueryKey::new("/profile");

        // Session ends while the previous user's profile is loading
        let during = cache.clone();
        let value: Value = cache
            .query(
                profile.clone(),
                move || async move {
                    during.clear();
                    Ok::<_, crate::error::ClientError>(json!({ "id": 7 }))
                },
                |_: &Value| vec![Tag::whole(Resource::Profile)],
            )
            .await
            .unwrap();

        assert_eq!(value, json!({ "id": 7 }));
        assert!(cache.is_empty());
        assert!(cache.peek::<Value>(&profile).is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_no_pending_mark() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let result: ClientResult<Value> = cache
            .query(
                QueryKey::new("/profile"),
                || async { Err(crate::error::ClientError::Timeout(5)) },
                |_: &Value| vec![Tag::whole(Resource::Profile)],
            )
            .await;
        assert!(result.is_err());
        assert!(cache.inner.fetches().is_empty());
    }

    #[test]
    fn test_tag_matching() {
        let list = Tag::new(Resource::Order, TagId::List);
        let client_list = Tag::new(Resource::Order, TagId::ClientList);

        assert!(list.invalidates(&list));
        assert!(!list.invalidates(&client_list));
        assert!(!list.invalidates(&Tag::new(Resource::Appliance, TagId::List)));
        assert!(Tag::whole(Resource::Locale)
            .invalidates(&Tag::new(Resource::Locale, TagId::Name("menu".into()))));
        assert!(!Tag::new(Resource::Locale, TagId::Name("menu".into()))
            .invalidates(&Tag::whole(Resource::Locale)));
    }

    #[test]
    fn test_unrelated_entries_survive_invalidation() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let appliances = QueryKey::new("/appliances");
        cache.store(
            appliances.clone(),
            page(&[1]),
            Tag::for_page(Resource::Appliance, TagId::List, &page(&[1])),
        );
        cache.store(
            orders_key(),
            page(&[1]),
            Tag::for_page(Resource::Order, TagId::List, &page(&[1])),
        );

        cache.invalidate(&[
            Tag::new(Resource::Order, TagId::List),
            Tag::new(Resource::Order, TagId::ClientList),
        ]);
        assert!(cache.is_stale(&orders_key()));
        assert!(!cache.is_stale(&appliances));
    }

    #[tokio::test]
    async fn test_subscriber_is_woken_by_invalidation() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.store(
            orders_key(),
            page(&[3]),
            vec![Tag::new(Resource::Order, TagId::List)],
        );
        let mut sub = cache.subscribe(orders_key());

        let waiter = tokio::spawn(async move { sub.invalidated().await });
        tokio::task::yield_now().await;
        cache.invalidate(&[Tag::new(Resource::Order, TagId::List)]);

        assert!(waiter.await.unwrap());
    }

    #[test]
    fn test_prune_keeps_subscribed_and_recent() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let watched = QueryKey::new("/profile");
        let idle = QueryKey::new("/locale/languages");
        cache.store(watched.clone(), json!({}), vec![Tag::whole(Resource::Profile)]);
        cache.store(idle.clone(), json!({}), vec![Tag::whole(Resource::Locale)]);
        let sub = cache.subscribe(watched.clone());

        assert_eq!(cache.prune(Utc::now()), 0);

        let later = Utc::now() + chrono::Duration::seconds(61);
        assert_eq!(cache.prune(later), 1);
        assert!(cache.info(&watched).is_some());
        assert!(cache.info(&idle).is_none());

        drop(sub);
        assert_eq!(cache.info(&watched).unwrap().subscribers, 0);
        let much_later = Utc::now() + chrono::Duration::seconds(61);
        assert_eq!(cache.prune(much_later), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_key_params_are_order_independent() {
        let a = QueryKey::with_params(
            "/appliances",
            vec![("size".into(), "10".into()), ("page".into(), "0".into())],
        );
        let b = QueryKey::with_params(
            "/appliances",
            vec![("page".into(), "0".into()), ("size".into(), "10".into())],
        );
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "/appliances?page=0&size=10");
    }
}
