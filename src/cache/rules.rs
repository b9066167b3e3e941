//! Invalidation Rules Module
//!
//! Named predicates deciding which entries a sweep removes, refreshes or
//! flags. Rules are checked in registration order and the first match wins.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Predicate evaluated against an entry at a given time (Unix ms)
pub type RuleCondition<T> = Arc<dyn Fn(&CacheEntry<T>, i64) -> bool + Send + Sync>;

// == Rule Action ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Delete the entry from both tiers
    Remove,
    /// Force the entry to expire now; the next `get` drops it
    Refresh,
    /// Flag the entry as stale, nothing else
    MarkStale,
}

impl RuleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleAction::Remove => "remove",
            RuleAction::Refresh => "refresh",
            RuleAction::MarkStale => "mark_stale",
        }
    }
}

// == Invalidation Rule ==
pub struct InvalidationRule<T> {
    pub name: String,
    pub condition: RuleCondition<T>,
    pub action: RuleAction,
}

impl<T> InvalidationRule<T> {
    pub fn new<F>(name: impl Into<String>, action: RuleAction, condition: F) -> Self
    where
        F: Fn(&CacheEntry<T>, i64) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            condition: Arc::new(condition),
            action,
        }
    }

    pub fn matches(&self, entry: &CacheEntry<T>, now: i64) -> bool {
        (self.condition)(entry, now)
    }
}

impl<T> Clone for InvalidationRule<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            condition: Arc::clone(&self.condition),
            action: self.action,
        }
    }
}

impl<T> fmt::Debug for InvalidationRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvalidationRule")
            .field("name", &self.name)
            .field("action", &self.action)
            .finish()
    }
}

/// Name and action of a registered rule, for introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub action: RuleAction,
}

// == Default Rules ==
/// The built-in rule set, in evaluation order.
pub fn default_rules<T>() -> Vec<InvalidationRule<T>> {
    vec![
        InvalidationRule::new("expired_entries", RuleAction::Remove, |entry, now| {
            now > entry.expiry_time
        }),
        InvalidationRule::new("low_quality_old_data", RuleAction::Remove, |entry, now| {
            entry.quality.is_low_confidence() && entry.age_ms(now) > 30 * MINUTE_MS
        }),
        InvalidationRule::new("unused_entries", RuleAction::Remove, |entry, now| {
            entry.access_count == 0 && entry.idle_ms(now) > HOUR_MS
        }),
        InvalidationRule::new("refresh_high_access", RuleAction::Refresh, |entry, now| {
            entry.access_count > 10 && entry.age_ms(now) > 2 * HOUR_MS
        }),
    ]
}

// == Rule Set ==
/// Ordered list of rules with unique names.
pub struct RuleSet<T> {
    rules: Vec<InvalidationRule<T>>,
}

impl<T> fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

impl<T> RuleSet<T> {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_defaults() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Appends a rule, rejecting a name that is already registered.
    pub fn add(&mut self, rule: InvalidationRule<T>) -> Result<()> {
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(CacheError::DuplicateRule(rule.name));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Removes a rule by name. Returns false if no rule had that name.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name != name);
        self.rules.len() != before
    }

    /// First rule matching the entry, if any.
    pub fn first_match(&self, entry: &CacheEntry<T>, now: i64) -> Option<&InvalidationRule<T>> {
        self.rules.iter().find(|rule| rule.matches(entry, now))
    }

    pub fn summaries(&self) -> Vec<RuleSummary> {
        self.rules
            .iter()
            .map(|r| RuleSummary {
                name: r.name.clone(),
                action: r.action,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
