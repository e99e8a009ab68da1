mod meta;
mod pattern;
mod resolved;
mod store;

pub use meta::*;
pub use pattern::*;
pub use resolved::*;
pub use store::*;
