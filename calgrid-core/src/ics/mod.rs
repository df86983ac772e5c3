//! ICS file generation and parsing.
//!
//! Each stored event is a single-VEVENT calendar with floating (local
//! wall-clock) DTSTART/DTEND.

mod generate;
mod parse;

pub use generate::generate_ics;
pub use parse::parse_event;
