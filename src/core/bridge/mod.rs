pub mod bridge_service;
pub mod channel_policy;

pub use bridge_service::{
    BridgeService, CommandReply, InboundMessage, MessageOutcome, CODE_FILE_FAILURE_REPLY,
    CODE_FILE_NOTICE, COMMAND_FAILURE_REPLY, MESSAGE_FAILURE_REPLY, UNKNOWN_COMMAND_REPLY,
    WRONG_CHANNEL_REPLY,
};
pub use channel_policy::ChannelPolicy;
