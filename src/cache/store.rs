//! Cache Store Module
//!
//! Two-tier cache engine: an in-memory map in front of a durable key-value
//! store, with content-hash change detection, TTL expiry, LRU eviction and
//! rule-based invalidation.
//!
//! In-memory state sits behind a single lock that is never held across a
//! durable-tier await. Every operation finishes its in-memory transition
//! first and then performs durable I/O, so concurrent writers to one key are
//! last-writer-wins in memory while durable writes stay best-effort.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::codec::{decode_entry, encode_entry};
use crate::cache::eviction::select_victims;
use crate::cache::hash::content_hash;
use crate::cache::{
    current_timestamp_ms, CacheCounters, CacheEntry, CacheExport, CacheInfo, CacheKey,
    CacheStats, DataType, EntrySummary, InvalidationRule, QualityMetadata, RuleAction, RuleSet,
    RuleSummary,
};
use crate::config::{CacheConfig, ConfigUpdate};
use crate::error::Result;
use crate::storage::DurableStore;
use crate::tasks::spawn_invalidation_task;

/// Prefix for every key this cache writes to the durable tier
pub const NAMESPACE: &str = "patient_cache_";

/// TTL of placeholders written by `warmup`
pub const WARMUP_PLACEHOLDER_TTL_MS: u64 = 60_000;

// == Payload ==
/// Capability required of cached payloads.
pub trait Payload: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Payload for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

// == Lookup Result ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    NotFound,
    Expired,
    /// A durable record existed but could not be decoded; it has been deleted
    Corrupt,
}

/// Outcome of [`PatientCache::get`]. A hit carries an owned copy of the entry.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(CacheEntry<T>),
    Miss(MissReason),
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn data(&self) -> Option<&T> {
        self.entry().map(|e| &e.payload)
    }

    pub fn entry(&self) -> Option<&CacheEntry<T>> {
        match self {
            CacheLookup::Hit(entry) => Some(entry),
            CacheLookup::Miss(_) => None,
        }
    }

    pub fn reason(&self) -> Option<MissReason> {
        match self {
            CacheLookup::Hit(_) => None,
            CacheLookup::Miss(reason) => Some(*reason),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            CacheLookup::Hit(entry) => Some(entry.payload),
            CacheLookup::Miss(_) => None,
        }
    }
}

// == Sweep Report ==
/// What one pass of the invalidation rules did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub removed: usize,
    pub refreshed: usize,
    pub marked_stale: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.removed == 0 && self.refreshed == 0 && self.marked_stale == 0
    }
}

// == Cache State ==
struct CacheState<T> {
    entries: HashMap<String, CacheEntry<T>>,
    counters: CacheCounters,
    rules: RuleSet<T>,
    config: CacheConfig,
    touch_seq: u64,
}

impl<T: Serialize> CacheState<T> {
    fn next_seq(&mut self) -> u64 {
        self.touch_seq += 1;
        self.touch_seq
    }

    /// Drops LRU entries until the configured ceilings hold again.
    fn evict_over_limits(&mut self) -> Vec<String> {
        let victims = select_victims(&self.entries, &self.config);
        for key in &victims {
            self.entries.remove(key);
        }
        if !victims.is_empty() {
            self.counters.record_evictions(victims.len());
            info!(
                "Evicted {} entries (max_size_bytes={}, max_entries={})",
                victims.len(),
                self.config.max_size_bytes,
                self.config.max_entries
            );
        }
        victims
    }

    fn stats(&self) -> CacheStats {
        CacheStats::compute(&self.entries, &self.counters)
    }
}

fn durable_key(resolved: &str) -> String {
    format!("{}{}", NAMESPACE, resolved)
}

// == Removal Tracking ==
/// Marks an explicit removal (invalidate, patient invalidation, clear or a
/// rule sweep) as in flight until dropped.
///
/// Read-through promotion is skipped when a removal overlapped the durable
/// read, so a record read just before its deletion is never put back.
struct RemovalGuard<'a> {
    epoch: &'a AtomicU64,
    in_flight: &'a AtomicUsize,
}

impl Drop for RemovalGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

// == Patient Cache ==
/// Two-tier cache of per-patient derived data.
///
/// Construct one per session and share it as `Arc<PatientCache<T>>`.
pub struct PatientCache<T> {
    state: RwLock<CacheState<T>>,
    durable: Arc<dyn DurableStore>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    /// Bumped whenever an explicit removal starts or finishes
    removal_epoch: AtomicU64,
    removals_in_flight: AtomicUsize,
}

impl<T: Payload> PatientCache<T> {
    // == Constructor ==
    /// Creates a cache with the default invalidation rules.
    pub fn new(config: CacheConfig, durable: Arc<dyn DurableStore>) -> Self {
        Self::with_rules(config, durable, RuleSet::with_defaults())
    }

    /// Creates a cache with an explicit rule set.
    pub fn with_rules(config: CacheConfig, durable: Arc<dyn DurableStore>, rules: RuleSet<T>) -> Self {
        info!(
            "Initializing patient cache (max_size_bytes: {}, max_entries: {}, default_ttl_ms: {}, persist: {}, compression: {})",
            config.max_size_bytes,
            config.max_entries,
            config.default_ttl_ms,
            config.persist_to_disk,
            config.compression_enabled
        );

        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                counters: CacheCounters::new(),
                rules,
                config,
                touch_seq: 0,
            }),
            durable,
            sweeper: Mutex::new(None),
            removal_epoch: AtomicU64::new(0),
            removals_in_flight: AtomicUsize::new(0),
        }
    }

    // == Set ==
    /// Stores a payload, replacing any entry under the same key.
    ///
    /// Fails only if the payload cannot be serialized for hashing. Durable
    /// write failures are logged and the in-memory write stands.
    pub async fn set(
        &self,
        key: &CacheKey,
        payload: T,
        quality: Option<QualityMetadata>,
        ttl_ms: Option<u64>,
    ) -> Result<()> {
        let data_hash = content_hash(&payload)?;
        let now = current_timestamp_ms();
        let resolved = key.resolve();

        let (record, victims, persist) = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;

            let ttl = ttl_ms.unwrap_or(state.config.default_ttl_ms);
            let mut entry = CacheEntry::new(key, payload, data_hash, quality.unwrap_or_default(), ttl, now);
            entry.touch_seq = state.next_seq();

            let persist = state.config.persist_to_disk;
            let record = if persist {
                match encode_entry(&entry, state.config.compression_enabled) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("Failed to encode {} for durable tier: {}", resolved, e);
                        None
                    }
                }
            } else {
                None
            };

            state.entries.insert(resolved.clone(), entry);
            let victims = state.evict_over_limits();
            (record, victims, persist)
        };

        debug!("Cached {}", resolved);

        if let Some(record) = record {
            if let Err(e) = self.durable.set(&durable_key(&resolved), record).await {
                warn!("Durable write failed for {}: {}", resolved, e);
            }
        }
        if persist {
            self.remove_durable_all(&victims).await;
        }

        Ok(())
    }

    // == Get ==
    /// Looks up a key, memory first, then the durable tier when enabled.
    ///
    /// Durable hits are promoted into memory unless an explicit removal
    /// overlapped the durable read, in which case the lookup is a miss.
    /// Expired entries are deleted from both tiers and reported as
    /// [`MissReason::Expired`].
    pub async fn get(&self, key: &CacheKey) -> CacheLookup<T> {
        let resolved = key.resolve();
        let now = current_timestamp_ms();

        let persist = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;

            match state.entries.get(&resolved).map(|e| e.is_expired_at(now)) {
                Some(true) => {
                    state.entries.remove(&resolved);
                    state.counters.record_miss();
                    let persist = state.config.persist_to_disk;
                    drop(guard);

                    debug!("Entry {} expired", resolved);
                    if persist {
                        self.remove_durable(&resolved).await;
                    }
                    return CacheLookup::Miss(MissReason::Expired);
                }
                Some(false) => {
                    let seq = state.next_seq();
                    if let Some(entry) = state.entries.get_mut(&resolved) {
                        entry.touch(now, seq);
                        state.counters.record_hit();
                        return CacheLookup::Hit(entry.clone());
                    }
                }
                None => {}
            }

            state.config.persist_to_disk
        };

        if !persist {
            self.record_miss().await;
            return CacheLookup::Miss(MissReason::NotFound);
        }

        let snapshot = self.removal_snapshot();
        self.read_through(resolved, now, snapshot).await
    }

    async fn read_through(&self, resolved: String, now: i64, snapshot: Option<u64>) -> CacheLookup<T> {
        let record = match self.durable.get(&durable_key(&resolved)).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.record_miss().await;
                return CacheLookup::Miss(MissReason::NotFound);
            }
            Err(e) => {
                warn!("Durable read failed for {}: {}", resolved, e);
                self.record_miss().await;
                return CacheLookup::Miss(MissReason::NotFound);
            }
        };

        let entry: CacheEntry<T> = match decode_entry(&record) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding corrupt durable record for {}: {}", resolved, e);
                self.remove_durable(&resolved).await;
                self.record_miss().await;
                return CacheLookup::Miss(MissReason::Corrupt);
            }
        };

        if entry.is_expired_at(now) {
            debug!("Durable record {} expired", resolved);
            self.remove_durable(&resolved).await;
            self.record_miss().await;
            return CacheLookup::Miss(MissReason::Expired);
        }

        let (hit, victims) = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;

            let seq = state.next_seq();
            let slot = if snapshot.is_some() && snapshot == self.removal_snapshot() {
                // A concurrent set may have landed while the durable read was in flight.
                state.entries.entry(resolved.clone()).or_insert(entry)
            } else {
                // A removal overlapped the durable read; the record may already be gone.
                match state.entries.get_mut(&resolved) {
                    Some(slot) => slot,
                    None => {
                        state.counters.record_miss();
                        debug!("Skipped promoting {}: removed during durable read", resolved);
                        return CacheLookup::Miss(MissReason::NotFound);
                    }
                }
            };
            slot.touch(now, seq);
            let hit = slot.clone();
            state.counters.record_hit();
            (hit, state.evict_over_limits())
        };

        debug!("Promoted {} from durable tier", resolved);
        self.remove_durable_all(&victims).await;

        CacheLookup::Hit(hit)
    }

    // == Has Changed ==
    /// Returns true when no live entry exists for `key` or the stored content
    /// hash differs from that of `candidate`.
    ///
    /// Does not touch hit/miss counters or access bookkeeping.
    pub async fn has_changed(&self, key: &CacheKey, candidate: &T) -> Result<bool> {
        let candidate_hash = content_hash(candidate)?;
        let stored = self.peek_hash(&key.resolve()).await;
        Ok(stored.map_or(true, |hash| hash != candidate_hash))
    }

    /// Content hash of the live entry for `resolved`, from either tier.
    async fn peek_hash(&self, resolved: &str) -> Option<String> {
        let now = current_timestamp_ms();
        let persist = {
            let state = self.state.read().await;
            if let Some(entry) = state.entries.get(resolved) {
                if !entry.is_expired_at(now) {
                    return Some(entry.data_hash.clone());
                }
            }
            state.config.persist_to_disk
        };

        if !persist {
            return None;
        }

        match self.durable.get(&durable_key(resolved)).await {
            Ok(Some(record)) => match decode_entry::<T>(&record) {
                Ok(entry) => Some(entry).filter(|e| !e.is_expired_at(now)).map(|e| e.data_hash),
                Err(e) => {
                    warn!("Discarding corrupt durable record for {}: {}", resolved, e);
                    self.remove_durable(resolved).await;
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Durable read failed for {}: {}", resolved, e);
                None
            }
        }
    }

    // == Invalidate ==
    /// Removes a key from both tiers.
    pub async fn invalidate(&self, key: &CacheKey) {
        let _removal = self.begin_removal();
        let resolved = key.resolve();
        let removed = self.state.write().await.entries.remove(&resolved).is_some();
        self.remove_durable(&resolved).await;
        debug!("Invalidated {} (was cached in memory: {})", resolved, removed);
    }

    // == Invalidate Patient ==
    /// Removes every entry belonging to `patient_id` from both tiers and
    /// returns how many distinct keys were removed.
    pub async fn invalidate_patient(&self, patient_id: &str) -> usize {
        let _removal = self.begin_removal();
        let (mut removed, persist) = {
            let mut state = self.state.write().await;
            let keys: HashSet<String> = state
                .entries
                .iter()
                .filter(|(_, e)| e.patient_id == patient_id)
                .map(|(k, _)| k.clone())
                .collect();
            for key in &keys {
                state.entries.remove(key);
            }
            (keys, state.config.persist_to_disk)
        };

        if persist {
            for key in &removed {
                self.remove_durable(key).await;
            }

            let prefix = durable_key(&format!("{}_", patient_id));
            match self.durable.keys_with_prefix(&prefix).await {
                Ok(keys) => {
                    for stored_key in keys {
                        let Some(resolved) = stored_key.strip_prefix(NAMESPACE) else {
                            continue;
                        };
                        if removed.contains(resolved) {
                            continue;
                        }
                        // The prefix can also match another patient whose id
                        // extends this one, so confirm against the record.
                        if self.durable_record_patient(&stored_key).await.as_deref() == Some(patient_id) {
                            self.remove_durable(resolved).await;
                            removed.insert(resolved.to_string());
                        }
                    }
                }
                Err(e) => warn!("Durable key listing failed for patient {}: {}", patient_id, e),
            }
        }

        info!("Invalidated {} entries for patient {}", removed.len(), patient_id);
        removed.len()
    }

    async fn durable_record_patient(&self, stored_key: &str) -> Option<String> {
        match self.durable.get(stored_key).await {
            Ok(Some(record)) => decode_entry::<T>(&record).ok().map(|e| e.patient_id),
            Ok(None) => None,
            Err(e) => {
                warn!("Durable read failed for {}: {}", stored_key, e);
                None
            }
        }
    }

    // == Apply Invalidation Rules ==
    /// Runs every entry through the rule set once. The first matching rule
    /// decides the entry's fate.
    pub async fn apply_invalidation_rules(&self) -> SweepReport {
        let _removal = self.begin_removal();
        let now = current_timestamp_ms();

        let (report, removed, persist) = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;

            let mut report = SweepReport::default();
            let mut removed = Vec::new();

            for (key, entry) in state.entries.iter_mut() {
                let Some(rule) = state.rules.first_match(entry, now) else {
                    continue;
                };
                debug!("Rule {} matched {} ({})", rule.name, key, rule.action.as_str());

                match rule.action {
                    RuleAction::Remove => removed.push(key.clone()),
                    RuleAction::Refresh => {
                        entry.expiry_time = entry.expiry_time.min(now);
                        report.refreshed += 1;
                    }
                    RuleAction::MarkStale => {
                        entry.stale = true;
                        report.marked_stale += 1;
                    }
                }
            }

            for key in &removed {
                state.entries.remove(key);
            }
            report.removed = removed.len();

            (report, removed, state.config.persist_to_disk)
        };

        if persist {
            self.remove_durable_all(&removed).await;
        }

        if report.is_empty() {
            debug!("Invalidation sweep: no rules matched");
        } else {
            info!(
                "Invalidation sweep: removed {}, refreshed {}, marked stale {}",
                report.removed, report.refreshed, report.marked_stale
            );
        }

        report
    }

    // == Rules ==
    /// Registers a rule after the existing ones. Names must be unique.
    pub async fn add_invalidation_rule(&self, rule: InvalidationRule<T>) -> Result<()> {
        let name = rule.name.clone();
        self.state.write().await.rules.add(rule)?;
        info!("Registered invalidation rule {}", name);
        Ok(())
    }

    /// Unregisters a rule. Returns false if no rule had that name.
    pub async fn remove_invalidation_rule(&self, name: &str) -> bool {
        let removed = self.state.write().await.rules.remove(name);
        if removed {
            info!("Removed invalidation rule {}", name);
        }
        removed
    }

    pub async fn rules(&self) -> Vec<RuleSummary> {
        self.state.read().await.rules.summaries()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn get_stats(&self) -> CacheStats {
        self.state.read().await.stats()
    }

    /// Diagnostic view: stats, config, rules and per-entry breakdowns.
    pub async fn get_cache_info(&self) -> CacheInfo {
        let now = current_timestamp_ms();
        let state = self.state.read().await;
        CacheInfo::compute(
            &state.entries,
            state.stats(),
            state.config.clone(),
            state.rules.summaries(),
            now,
        )
    }

    // == Clear ==
    /// Drops every in-memory entry and, when persistence is enabled, every
    /// durable record under this cache's namespace.
    pub async fn clear(&self) {
        let _removal = self.begin_removal();
        let (count, persist) = {
            let mut state = self.state.write().await;
            let count = state.entries.len();
            state.entries.clear();
            (count, state.config.persist_to_disk)
        };

        if persist {
            match self.durable.keys_with_prefix(NAMESPACE).await {
                Ok(keys) => {
                    for key in keys {
                        if let Err(e) = self.durable.remove(&key).await {
                            warn!("Durable remove failed for {}: {}", key, e);
                        }
                    }
                }
                Err(e) => warn!("Durable key listing failed during clear: {}", e),
            }
        }

        info!("Cleared {} cache entries", count);
    }

    // == Export ==
    /// Metadata-only export of every in-memory entry, ordered by key.
    pub async fn export_cache(&self) -> CacheExport {
        let state = self.state.read().await;
        let mut entries: Vec<EntrySummary> = state.entries.values().map(EntrySummary::from).collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        CacheExport {
            exported_at: Utc::now(),
            config: state.config.clone(),
            stats: state.stats(),
            entries,
        }
    }

    // == Warmup ==
    /// Writes a short-lived placeholder for every `(patient, data type)` pair
    /// with no live entry, so concurrent callers see a hit instead of each
    /// starting the same backfill. Returns the number of placeholders written.
    pub async fn warmup<F>(&self, patients: &[String], placeholder: F) -> Result<usize>
    where
        F: Fn(&CacheKey) -> T,
    {
        let mut written = 0;

        for patient_id in patients {
            for data_type in DataType::ALL {
                let key = CacheKey::new(patient_id.clone(), data_type);
                if self.peek_hash(&key.resolve()).await.is_some() {
                    continue;
                }

                let quality = QualityMetadata::default().with_field("placeholder", true);
                self.set(&key, placeholder(&key), Some(quality), Some(WARMUP_PLACEHOLDER_TTL_MS))
                    .await?;
                written += 1;
            }
        }

        info!(
            "Warmup wrote {} placeholders for {} patients",
            written,
            patients.len()
        );
        Ok(written)
    }

    // == Preload ==
    /// Imports entries as they are, keeping their timestamps, hashes and
    /// counters. Already-expired entries are skipped. Returns the number
    /// imported.
    pub async fn preload(&self, entries: Vec<CacheEntry<T>>) -> usize {
        let now = current_timestamp_ms();

        let (records, victims, loaded, persist) = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            let persist = state.config.persist_to_disk;
            let compress = state.config.compression_enabled;

            let mut records = Vec::new();
            let mut loaded = 0;
            for mut entry in entries {
                if entry.is_expired_at(now) {
                    continue;
                }
                entry.touch_seq = state.next_seq();
                if persist {
                    match encode_entry(&entry, compress) {
                        Ok(record) => records.push((entry.key.clone(), record)),
                        Err(e) => warn!("Failed to encode {} for durable tier: {}", entry.key, e),
                    }
                }
                state.entries.insert(entry.key.clone(), entry);
                loaded += 1;
            }

            (records, state.evict_over_limits(), loaded, persist)
        };

        for (resolved, record) in records {
            if let Err(e) = self.durable.set(&durable_key(&resolved), record).await {
                warn!("Durable write failed for {}: {}", resolved, e);
            }
        }
        if persist {
            self.remove_durable_all(&victims).await;
        }

        info!("Preloaded {} entries", loaded);
        loaded
    }

    // == Config ==
    pub async fn get_config(&self) -> CacheConfig {
        self.state.read().await.config.clone()
    }

    /// Applies a partial config update and enforces the new limits at once.
    pub async fn update_config(&self, update: ConfigUpdate) -> CacheConfig {
        let (config, victims) = {
            let mut state = self.state.write().await;
            state.config.apply(&update);
            let victims = state.evict_over_limits();
            (state.config.clone(), victims)
        };

        if config.persist_to_disk {
            self.remove_durable_all(&victims).await;
        }

        info!("Cache config updated: {:?}", config);
        config
    }

    // == Sweeper ==
    /// Starts the periodic invalidation sweep, replacing any running one.
    pub async fn start_sweeper(self: &Arc<Self>, interval: Duration) {
        let handle = spawn_invalidation_task(Arc::downgrade(self), interval);
        if let Some(previous) = self.sweeper.lock().await.replace(handle) {
            previous.abort();
        }
    }

    /// Whether a sweep task is currently running.
    pub async fn sweeper_running(&self) -> bool {
        self.sweeper
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // == Cleanup ==
    /// Stops the sweep task and discards the in-memory map. The durable tier
    /// is left as it is.
    pub async fn cleanup(&self) {
        if let Some(handle) = self.sweeper.lock().await.take() {
            handle.abort();
        }
        let count = {
            let mut state = self.state.write().await;
            let count = state.entries.len();
            state.entries.clear();
            count
        };
        info!("Cache cleanup: sweeper stopped, {} in-memory entries discarded", count);
    }

    // == Length ==
    /// Number of in-memory entries.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    // == Helpers ==
    fn begin_removal(&self) -> RemovalGuard<'_> {
        self.removals_in_flight.fetch_add(1, Ordering::SeqCst);
        self.removal_epoch.fetch_add(1, Ordering::SeqCst);
        RemovalGuard {
            epoch: &self.removal_epoch,
            in_flight: &self.removals_in_flight,
        }
    }

    /// Current removal epoch, or `None` while a removal is in flight.
    fn removal_snapshot(&self) -> Option<u64> {
        let epoch = self.removal_epoch.load(Ordering::SeqCst);
        if self.removals_in_flight.load(Ordering::SeqCst) > 0 {
            return None;
        }
        Some(epoch)
    }

    async fn record_miss(&self) {
        self.state.write().await.counters.record_miss();
    }

    async fn remove_durable(&self, resolved: &str) {
        if let Err(e) = self.durable.remove(&durable_key(resolved)).await {
            warn!("Durable remove failed for {}: {}", resolved, e);
        }
    }

    async fn remove_durable_all(&self, keys: &[String]) {
        for key in keys {
            self.remove_durable(key).await;
        }
    }
}
