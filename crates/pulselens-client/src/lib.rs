//! HTTP clients for the hosted row source and the identity provider.
//!
//! [`RowClient`] performs unconditional select-all fetches against the named
//! mention tables and normalizes rows into canonical posts. [`AuthClient`]
//! handles email/password sign-in against the identity provider, and
//! [`SessionManager`] owns the resulting session explicitly — there is no
//! ambient auth state.

pub mod auth;
pub mod error;
pub mod rows;
pub mod session;

pub use auth::{AuthClient, Session};
pub use error::ClientError;
pub use rows::RowClient;
pub use session::{SessionEvent, SessionManager};
