use super::{SessionStore, StoreError};

pub const SESSION_KEY: &str = "session_id";

/// Return the stored session id, minting one from `now_millis` if the store
/// has none yet. The id is written back on every call.
pub fn resolve_session_id(
    store: &mut dyn SessionStore,
    now_millis: impl FnOnce() -> i64,
) -> Result<String, StoreError> {
    let session_id = match store.get(SESSION_KEY)? {
        Some(existing) if !existing.is_empty() => existing,
        _ => {
            let minted = now_millis().to_string();
            log::info!("Minted new session id {minted}");
            minted
        }
    };
    store.set(SESSION_KEY, &session_id)?;
    Ok(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn mints_from_clock_when_absent() {
        let mut store = MemoryStore::default();
        let id = resolve_session_id(&mut store, || 1_700_000_000_123).unwrap();

        assert_eq!(id, "1700000000123");
        assert_eq!(store.get(SESSION_KEY).unwrap().as_deref(), Some("1700000000123"));
    }

    #[test]
    fn reuses_stored_id_without_reading_clock() {
        let mut store = MemoryStore::default();
        store.set(SESSION_KEY, "1600000000000").unwrap();

        let id = resolve_session_id(&mut store, || panic!("clock must not be read")).unwrap();
        assert_eq!(id, "1600000000000");
    }

    #[test]
    fn repeated_resolution_is_stable() {
        let mut store = MemoryStore::default();
        let mut ticks = 1_700_000_000_000;
        let ids: Vec<String> = (0..5)
            .map(|_| {
                resolve_session_id(&mut store, || {
                    ticks += 1;
                    ticks
                })
                .unwrap()
            })
            .collect();

        assert!(ids.iter().all(|id| id == "1700000000001"));
    }
}
