//! Library side of the `crm-import` command: settings, mapping edit flags
//! and logging setup.

pub mod config;
pub mod edits;
pub mod logging;
