pub mod format;
pub mod query;

pub use format::format_inr;
pub use query::{
    compute, filter_by_tab, filter_by_text, paginate, sort_bookings, BookingPage, SortKey, Tab,
    UnknownOption, ViewQuery, DEFAULT_PAGE_SIZE,
};
