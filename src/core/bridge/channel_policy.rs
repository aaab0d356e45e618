/// Restricts the bot to a single channel.
///
/// With no channel configured nothing is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPolicy {
    allowed: Option<u64>,
}

impl ChannelPolicy {
    pub fn new(allowed: Option<u64>) -> Self {
        Self { allowed }
    }

    pub fn allows(&self, channel_id: u64) -> bool {
        self.allowed == Some(channel_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configured_channel_is_allowed() {
        let policy = ChannelPolicy::new(Some(1234));
        assert!(policy.allows(1234));
        assert!(!policy.allows(4321));
    }

    #[test]
    fn test_unconfigured_policy_allows_nothing() {
        let policy = ChannelPolicy::new(None);
        assert!(!policy.allows(0));
        assert!(!policy.allows(1234));
    }
}
