//! REST API and server-routed admin shell

pub mod handlers;
pub mod router;
pub mod state;
