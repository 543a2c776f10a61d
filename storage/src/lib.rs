//! Persistence layer for signals and ads
//!
//! Exposes a uniform CRUD contract (`Store` + `Collection`) over two
//! interchangeable backends selected once at startup:
//! - `LocalStore`: JSON arrays in device-scoped files, seeded with a demo
//!   dataset on first run, fully offline.
//! - `RemoteStore`: an HTTP document store with one document per entity,
//!   shared across devices.
//!
//! Callers never branch on the backend except to display its kind. The
//! in-memory session owns the data after the initial load; the store is a
//! write-through delegate, not a read-through cache.

pub mod local;
pub mod memory;
pub mod prefs;
pub mod remote;
pub mod seed;
pub mod select;
pub mod store;

pub use local::{default_data_dir, LocalStore};
pub use memory::MemoryStore;
pub use prefs::PreferencesStore;
pub use remote::{RemoteConfig, RemoteStore};
pub use select::{is_remote_configured, select_store};
pub use store::{BackendKind, Collection, Entity, Store};
