pub mod auth;
pub mod gallery;
pub mod ledger;
pub mod photo;

pub use auth::AuthService;
pub use gallery::GalleryCache;
pub use ledger::ConsistencyLedger;
pub use photo::PhotoService;
