//! # Live Rule Set
//!
//! Holds the table a long-running caller prices with and swaps it whole.
//!
//! ## Reload Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   RuleSetHandle                                                         │
//! │   RwLock<Arc<RuleSet>>                                                  │
//! │        │                                                                │
//! │        ├── snapshot() ──► Arc<RuleSet> ──► price_line_item(…, &rules)   │
//! │        │                   (kept until the computation ends)            │
//! │        │                                                                │
//! │        └── reload_from(path)                                            │
//! │               load + validate ── Err ──► old table stays                │
//! │                         └────── Ok  ──► pointer swapped                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers never see a half-written table: the lock only guards the pointer.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use lumen_core::RuleSet;
use tracing::{info, warn};

use crate::error::RulesResult;
use crate::loader;

/// Shared, swappable rate table.
#[derive(Debug)]
pub struct RuleSetHandle {
    current: RwLock<Arc<RuleSet>>,
}

impl RuleSetHandle {
    /// Creates a handle around an already validated table.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(rules)),
        }
    }

    /// The table to compute against.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Replaces the whole table.
    pub fn replace(&self, rules: RuleSet) {
        let next = Arc::new(rules);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = next;
    }

    /// Loads, validates and installs a new table.
    ///
    /// On failure the current table is left untouched and the error is
    /// returned.
    pub fn reload_from(&self, path: &Path) -> RulesResult<Arc<RuleSet>> {
        match loader::load(Some(path.to_path_buf())) {
            Ok(rules) => {
                self.replace(rules);
                info!(?path, "Rules reloaded");
                Ok(self.snapshot())
            }
            Err(err) => {
                warn!(?path, error = %err, "Rules reload rejected, keeping current table");
                Err(err)
            }
        }
    }
}

impl Default for RuleSetHandle {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
