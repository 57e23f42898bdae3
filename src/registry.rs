//! Bank name → statement reader factory registry.
//!
//! New banks plug in by registering a factory; nothing else in the crate
//! names a concrete reader type. Keys are lowercased bank names.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, error};

use crate::reader::StatementReader;
use crate::storage::Storage;

pub type ReaderFactory = Arc<dyn Fn() -> Option<Box<dyn StatementReader>> + Send + Sync>;

#[derive(Default)]
pub struct ReaderRegistry {
    factories: Mutex<BTreeMap<String, ReaderFactory>>,
}

/// The process-wide registry used by the CLI.
pub fn global() -> &'static ReaderRegistry {
    static GLOBAL: OnceLock<ReaderRegistry> = OnceLock::new();
    GLOBAL.get_or_init(ReaderRegistry::new)
}

fn key(bank_name: &str) -> String {
    bank_name.trim().to_lowercase()
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, ReaderFactory>> {
        self.factories.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the factory for `bank_name`. Empty names are ignored.
    pub fn register<F>(&self, bank_name: &str, factory: F)
    where
        F: Fn() -> Option<Box<dyn StatementReader>> + Send + Sync + 'static,
    {
        let key = key(bank_name);
        if key.is_empty() {
            return;
        }
        debug!(bank = %key, "registering statement reader");
        self.lock().insert(key, Arc::new(factory));
    }

    /// True if a factory was registered under `bank_name` and is now gone.
    pub fn unregister(&self, bank_name: &str) -> bool {
        let key = key(bank_name);
        let removed = self.lock().remove(&key).is_some();
        if removed {
            debug!(bank = %key, "unregistered statement reader");
        }
        removed
    }

    /// Build a reader for `bank_name`, ignoring case.
    ///
    /// The factory runs after the lock is released, so a slow factory never
    /// blocks other registry calls.
    pub fn create_by_name(&self, bank_name: &str) -> Option<Box<dyn StatementReader>> {
        let key = key(bank_name);
        let factory = self.lock().get(&key).cloned()?;
        let reader = factory();
        if reader.is_none() {
            error!(bank = %key, "statement reader factory returned no reader");
        }
        reader
    }

    /// Resolve `bank_id` to a bank name through `storage`, then build its reader.
    /// No factory is invoked when the lookup fails.
    pub fn create_by_id<S: Storage + ?Sized>(
        &self,
        storage: &S,
        bank_id: i64,
    ) -> Option<Box<dyn StatementReader>> {
        match storage.bank_name_by_id(bank_id) {
            Ok(name) => self.create_by_name(&name),
            Err(e) => {
                debug!(bank_id, error = %e, "cannot resolve bank for reader lookup");
                None
            }
        }
    }

    /// Registered keys, lowercase. Callers must not rely on the order.
    pub fn list_registered(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn is_registered(&self, bank_name: &str) -> bool {
        self.lock().contains_key(&key(bank_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::db::{get_connection, init_db};
    use crate::reader::CanaraReader;

    fn canara() -> Option<Box<dyn StatementReader>> {
        Some(Box::new(CanaraReader::default()))
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = ReaderRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.register("Canara", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            canara()
        });
        assert!(registry.create_by_name("canara").is_some());
        assert!(registry.create_by_name("CANARA").is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unregister_removes_reader() {
        let registry = ReaderRegistry::new();
        registry.register("Canara", canara);
        assert!(registry.unregister("canara"));
        assert!(registry.create_by_name("Canara").is_none());
        assert!(!registry.unregister("canara"));
    }

    #[test]
    fn test_empty_name_is_ignored() {
        let registry = ReaderRegistry::new();
        registry.register("", canara);
        registry.register("   ", canara);
        assert!(registry.list_registered().is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = ReaderRegistry::new();
        registry.register("Canara", || None);
        registry.register("CANARA", canara);
        assert_eq!(registry.list_registered(), vec!["canara"]);
        assert!(registry.create_by_name("canara").is_some());
    }

    #[test]
    fn test_factory_returning_nothing_yields_none() {
        let registry = ReaderRegistry::new();
        registry.register("Broken", || None);
        assert!(registry.is_registered("broken"));
        assert!(registry.create_by_name("broken").is_none());
    }

    #[test]
    fn test_unknown_bank_yields_none() {
        let registry = ReaderRegistry::new();
        assert!(registry.create_by_name("nobank").is_none());
    }

    #[test]
    fn test_create_by_id_resolves_through_storage() {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        let registry = ReaderRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        registry.register("canara", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            canara()
        });

        let canara_id = conn.bank_id_by_name("Canara").unwrap();
        let reader = registry.create_by_id(&conn, canara_id).unwrap();
        assert_eq!(reader.bank_id(), "canara");

        assert!(registry.create_by_id(&conn, 9999).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let hdfc_id = conn.bank_id_by_name("HDFC").unwrap();
        assert!(registry.create_by_id(&conn, hdfc_id).is_none());
    }

    #[test]
    fn test_concurrent_register_and_lookup() {
        let registry = Arc::new(ReaderRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        let name = format!("Bank{i}-{j}");
                        registry.register(&name, canara);
                        assert!(registry.create_by_name(&name).is_some());
                        registry.list_registered();
                        if j % 2 == 0 {
                            assert!(registry.unregister(&name));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.list_registered().len(), 8 * 25);
    }

    #[test]
    fn test_global_registry_is_shared() {
        global().register("Global Test Bank", canara);
        assert!(global().is_registered("global test bank"));
        assert!(global().unregister("GLOBAL TEST BANK"));
    }
}
