//! Rifa Store - record persistence
//!
//! Thin key-value layer the raffle engine persists its records through:
//!
//! - [`Storage`]: the backend trait (`get`, batched `commit`, `clear`)
//! - [`MemoryStorage`]: volatile, for tests and embedding
//! - [`FileStorage`]: one JSON file per key in a data directory
//! - [`Record`]: typed accessor binding a serde type to a key
//! - [`Batch`]: writes that must land together
//!
//! # Example
//!
//! ```rust
//! use rifa_store::{Batch, MemoryStorage, Record, Storage};
//!
//! const COUNTER: Record<u64> = Record::new("counter");
//!
//! let store = MemoryStorage::new();
//! let mut batch = Batch::new();
//! COUNTER.stage(&mut batch, &41).unwrap();
//! store.commit(batch).unwrap();
//!
//! assert_eq!(COUNTER.load(&store).unwrap(), Some(41));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod memory;
pub mod record;
pub mod storage;

pub use error::StoreError;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use record::Record;
pub use storage::{Batch, Storage, Write};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
