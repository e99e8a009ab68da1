mod config;
mod error;
mod history;
mod listener;
mod location;
mod route;
mod router;
mod state;
mod types;

pub use config::*;
pub use error::*;
pub use history::*;
pub use listener::*;
pub use location::*;
pub use route::*;
pub use router::*;
pub use state::*;
pub use types::*;
