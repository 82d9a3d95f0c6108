//! Auth-domain identifiers, secrets, credentials, and the canonical user record.

pub mod app_token;
pub mod credential;
pub mod id;
pub mod secret;
pub mod user;

pub use app_token::*;
pub use credential::*;
pub use id::*;
pub use secret::*;
pub use user::*;
