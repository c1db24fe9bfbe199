//! prepwise-profile: who is logged in, and what they have done.
//!
//! Holds the explicit session context that replaces a global auth provider,
//! the profile and attempt-history stores behind it, and the configuration
//! loader used by the CLI.

pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod user;

pub use config::{load_config, load_config_from, PrepwiseConfig};
pub use error::{AuthError, StoreError};
pub use session::SessionContext;
pub use store::{
    AttemptStore, FileAttemptStore, FileProfileStore, MemoryAttemptStore, MemoryProfileStore,
    ProfileStore,
};
pub use user::{Role, User};
