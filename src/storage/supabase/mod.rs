//! Supabase backend
//!
//! Blobs live in a Storage bucket (`/storage/v1/object/...`) and metadata
//! records in a PostgREST table (`/rest/v1/<table>`). Both halves share one
//! authenticated [`Client`].

pub mod client;
pub mod objects;
pub mod records;

pub use client::Client;
pub use objects::SupabaseStorage;
pub use records::SupabaseRecords;
