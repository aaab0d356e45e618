// The infra module contains implementations of core traits.
// Each external service gets its own submodule.

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "exchange/mod.rs"]
pub mod exchange;

#[path = "attachments/code_file.rs"]
pub mod attachments;
