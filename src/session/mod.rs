pub mod store;
pub mod sync;

pub use self::store::{Pagination, ViewMode, ViewState};
pub use self::sync::{History, MemoryHistory, UrlState, UrlSync};
