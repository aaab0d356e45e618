// Discord commands module.
// Each command gets its own file.

pub mod convert;

pub mod deepthink;

mod replies;

use crate::discord::{Data, Error};

/// Every slash command the bot registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![deepthink::deepthink(), convert::convertir()]
}
