//! Slow mode configuration.

use bailiff_core::ChannelId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The `[slow_mode]` table.
///
/// ```toml
/// [slow_mode]
/// prune_interval_secs = 300
///
/// [slow_mode.channels]
/// "123456789012345678" = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlowModeConfig {
    /// How often stale entries are dropped, in seconds
    #[serde(default = "default_prune_interval")]
    pub prune_interval_secs: u64,

    /// Channels slowed at startup, channel ID to threshold in seconds
    #[serde(default)]
    pub channels: HashMap<ChannelId, u64>,
}

fn default_prune_interval() -> u64 {
    300
}

impl Default for SlowModeConfig {
    fn default() -> Self {
        Self {
            prune_interval_secs: default_prune_interval(),
            channels: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channels_table() {
        let config: SlowModeConfig = toml::from_str(
            r#"
            [channels]
            "42" = 10
            "7" = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.prune_interval_secs, 300);
        assert_eq!(config.channels[&ChannelId::new(42)], 10);
        assert_eq!(config.channels.len(), 2);
    }
}
