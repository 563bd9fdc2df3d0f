//! Terminal front end: rendering and per-command flows

pub mod convert;
pub mod rates;
pub mod setup;
pub mod ui;
