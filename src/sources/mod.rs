pub mod api;
pub mod catalog;
pub mod mock;
pub mod scope;
pub mod sync;
pub mod traits;
pub mod types;

pub use api::ApiClient;
pub use catalog::ListingCatalog;
pub use mock::MockListings;
pub use scope::ViewScope;
pub use sync::{BookingSync, Handled};
pub use traits::ListingSource;
pub use types::{ApiSettings, AuthSession, Credentials, TOKEN_KEY};
