//! Service crate for the reelwatch movie library.
//!
//! `MovieService` gates every user operation behind a `RouteGuard` and
//! runs it against a shared `MovieStore`.

pub mod error;
pub mod guard;
pub mod service;

pub use error::{Result, ServiceError};
pub use guard::{Access, RouteGuard, Session};
pub use service::{
    DEFAULT_RECENT_LIMIT, HistoryQuery, MovieService, UserData, UserSummary, WatchlistChange,
};
