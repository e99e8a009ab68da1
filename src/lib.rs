mod router_core;

pub use router_core::*;
