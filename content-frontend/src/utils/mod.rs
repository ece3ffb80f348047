pub mod content_hash;
pub mod identity;
