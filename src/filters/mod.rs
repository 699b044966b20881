pub mod compose;
pub mod highlight;
pub mod quick;
pub mod search;

pub use compose::{FilterComposer, FilterState, GlobalFilter};
pub use quick::{QuickFilter, QuickFilterRegistry};
pub use search::SearchQuery;
