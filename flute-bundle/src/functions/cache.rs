use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;
use unic_langid::LanguageIdentifier;

use super::{FluentFunction, FunctionError, FunctionFactory};
use crate::types::FunctionOptions;

/// How factory output is cached per bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Re-invoke the factory at every call site.
    Disabled,
    /// Keep at most this many instances; oldest entries are evicted first.
    Bounded(usize),
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy::Bounded(64)
    }
}

type CacheKey = (String, String, String);

#[derive(Default)]
struct CacheInner {
    entries: HashMap<CacheKey, Arc<FluentFunction>>,
    order: VecDeque<CacheKey>,
}

/// A size-bounded instance cache keyed by `(name, locale, options)`.
///
/// Internally synchronized; the cache does not affect the resolution
/// contract, only how often factories run.
pub struct FunctionCache {
    policy: CachePolicy,
    inner: Mutex<CacheInner>,
}

impl FunctionCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn get_or_create(
        &self,
        name: &str,
        factory: &Arc<dyn FunctionFactory>,
        locale: &LanguageIdentifier,
        options: &FunctionOptions,
    ) -> Result<Arc<FluentFunction>, FunctionError> {
        let capacity = match self.policy {
            CachePolicy::Bounded(capacity) if factory.cacheable() => capacity,
            _ => return factory.create(locale, options).map(Arc::new),
        };

        let key: CacheKey = (name.to_owned(), locale.to_string(), options.fingerprint());
        {
            let inner = self.lock();
            if let Some(instance) = inner.entries.get(&key) {
                return Ok(instance.clone());
            }
        }

        let instance = Arc::new(factory.create(locale, options)?);

        let mut inner = self.lock();
        if !inner.entries.contains_key(&key) {
            inner.entries.insert(key.clone(), instance.clone());
            inner.order.push_back(key);
            while inner.entries.len() > capacity.max(1) {
                if let Some(evicted) = inner.order.pop_front() {
                    inner.entries.remove(&evicted);
                    trace!(function = %evicted.0, locale = %evicted.1, "evicting cached function instance");
                } else {
                    break;
                }
            }
        }
        Ok(instance)
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            // The cache holds no invariants worth dying for.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
