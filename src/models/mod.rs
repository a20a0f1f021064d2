pub mod auth;
pub mod inconsistency;
pub mod photo;

pub use auth::*;
pub use inconsistency::*;
pub use photo::*;
