//! souq-core - Core marketplace client types and traits.

pub mod credentials;
pub mod error;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;
pub mod user;

pub use credentials::Credentials;
pub use error::{AuthError, Error, InvalidInputError};
pub use session::SessionSnapshot;
pub use tokens::AccessToken;
pub use traits::LoginRedirect;
pub use types::ApiUrl;
pub use user::{ProfileUpdate, UserProfile};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
