// The core module contains all business logic.
// Nothing in here knows about Discord or HTTP.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "exchange/mod.rs"]
pub mod exchange;

#[path = "bridge/mod.rs"]
pub mod bridge;
