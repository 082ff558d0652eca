use super::storage::KeyValueStore;
use shared::Result;
use std::fmt;
use tracing::warn;

/// Storage key of the access token
pub const ACCESS_KEY: &str = "access";
/// Storage key of the refresh token
pub const REFRESH_KEY: &str = "refresh";

/// Access and refresh credentials. Always written and cleared together.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Read the persisted pair. A half-written pair is treated as no session.
    pub fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        let access = store.get(ACCESS_KEY)?;
        let refresh = store.get(REFRESH_KEY)?;

        match (access, refresh) {
            (Some(access), Some(refresh)) => Ok(Some(Self { access, refresh })),
            (None, None) => Ok(None),
            _ => {
                warn!("Discarding incomplete stored token pair");
                erase(store)?;
                Ok(None)
            }
        }
    }

    pub fn persist(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(ACCESS_KEY, &self.access)?;
        store.set(REFRESH_KEY, &self.refresh)
    }

    /// Write this pair over `previous`. If the write fails partway the
    /// previous pair is put back, or both keys are erased when that fails
    /// too, so the store never holds tokens from two different pairs.
    pub fn replace(&self, store: &dyn KeyValueStore, previous: Option<&TokenPair>) -> Result<()> {
        let Err(e) = self.persist(store) else {
            return Ok(());
        };

        let restored = match previous {
            Some(pair) => pair.persist(store),
            None => erase(store),
        };
        if let Err(rollback) = restored {
            warn!("Failed to restore previous token pair, erasing: {}", rollback);
            if let Err(erase_err) = erase(store) {
                warn!("Failed to erase stored tokens: {}", erase_err);
            }
        }
        Err(e)
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Remove both tokens from `store`
pub fn erase(store: &dyn KeyValueStore) -> Result<()> {
    // Attempt both even if the first fails
    let access = store.clear(ACCESS_KEY);
    let refresh = store.clear(REFRESH_KEY);
    access.and(refresh)
}
