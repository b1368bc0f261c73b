use serde::Serialize;
use serde::de::DeserializeOwned;

pub use backend::*;
pub use best::*;
pub use error::*;
pub use leaderboard::*;
pub use records::*;

mod backend;
mod best;
mod error;
mod leaderboard;
mod records;

/// Fixed storage key a persisted value lives under.
pub trait StorageKey {
    const KEY: &'static str;
}

/// Load/save for keyed values. Anything unreadable loads as the default.
pub trait LocalOrDefault: StorageKey + Serialize + DeserializeOwned + Default {
    fn load_or_default<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.read(Self::KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::warn!("Discarding malformed {}: {}", Self::KEY, err);
                Self::default()
            }),
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("Could not read {}: {}", Self::KEY, err);
                Self::default()
            }
        }
    }

    fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        store.write(Self::KEY, &raw)
    }
}

impl<T: StorageKey + Serialize + DeserializeOwned + Default> LocalOrDefault for T {}
