pub mod draft;
pub mod identity;
pub mod options;
pub mod session;

pub use draft::{Draft, GenerateForm, GeneratedContent};
pub use identity::Identity;
pub use session::SessionContext;
