//! Tag classification and filtered ordering for a personal image gallery.

pub mod factory;
pub mod filter;
pub mod meta;
pub mod migrate;
pub mod ordering;
pub mod selector;
pub mod session;
pub mod state;
pub mod store;
pub mod types;
pub mod usage;
pub mod view;

pub use filter::ItemFilter;
pub use filter::SortMode;
pub use filter::filter_and_sort;
pub use meta::TagMeta;
pub use meta::TagMetaIndex;
pub use ordering::alphabetical_order;
pub use ordering::recency_order;
pub use selector::SelectorDomain;
pub use selector::SelectorSort;
pub use selector::build_selector_list;
pub use session::Gallery;
pub use state::Action;
pub use state::AppState;
pub use store::GalleryStore;
pub use usage::tag_last_used;
