//! API request handlers

mod auth;
mod billing;
mod gate;
mod health;
mod settings;
mod shell;

pub use auth::*;
pub use billing::*;
pub use gate::*;
pub use health::*;
pub use settings::*;
pub use shell::*;
