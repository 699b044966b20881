pub mod memory;

pub use self::memory::{Snapshot, SnapshotStore};
