//! Core library for calgrid.
//!
//! This crate is shared by calgrid-server and the calgrid CLI:
//! - `event` for the event model and color palette
//! - `layout` for the month/week/day layout engine and the live time indicator
//! - `store` and `ics` for persistence as .ics files
//! - `config` for ~/.config/calgrid/config.toml

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod layout;
pub mod store;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CalgridConfig;
pub use error::{CalGridError, CalGridResult};
pub use event::{Event, EventDraft, EventPatch};
pub use store::{DirStore, EventStore, MemoryStore};
