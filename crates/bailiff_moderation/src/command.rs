//! Chat command parsing.

use bailiff_core::{ChannelId, UserId};
use bailiff_error::{ModerationError, ModerationErrorKind};
use bailiff_interface::Permission;

/// A moderation command typed in chat.
#[derive(Debug, Clone, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    /// `tempban <user> <duration> <reason...>`
    TempBan {
        /// User to ban
        target: UserId,
        /// Duration text, validated when the command runs
        duration: String,
        /// Reason words, may be empty
        reason: Vec<String>,
    },
    /// `unban <username>`
    Unban {
        /// Display name captured when the ban was issued
        name: String,
    },
    /// `banfetch <username>`
    BanFetch {
        /// Display name captured when the ban was issued
        name: String,
    },
    /// `slowmode <delay_seconds>`
    SlowMode {
        /// Delay text, validated when the command runs
        delay: String,
    },
    /// `slowoff`
    SlowOff,
    /// `modchan <channel>`
    ModChan {
        /// Channel that receives moderation reports
        channel: ChannelId,
    },
}

impl Command {
    /// Parse a chat message.
    ///
    /// Returns `None` when the message does not start with `prefix` followed
    /// by a word, so ordinary chat is never treated as an error.
    ///
    /// # Example
    ///
    /// ```
    /// use bailiff_core::UserId;
    /// use bailiff_moderation::Command;
    ///
    /// let command = Command::parse("!tempban <@!42> 3d spamming links", "!")
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(
    ///     command,
    ///     Command::TempBan {
    ///         target: UserId::new(42),
    ///         duration: "3d".to_string(),
    ///         reason: vec!["spamming".to_string(), "links".to_string()],
    ///     }
    /// );
    /// assert!(Command::parse("hello there", "!").is_none());
    /// ```
    pub fn parse(content: &str, prefix: &str) -> Option<Result<Self, ModerationError>> {
        let rest = content.trim_start().strip_prefix(prefix)?;
        if rest.starts_with(char::is_whitespace) {
            return None;
        }

        let mut words = rest.split_whitespace();
        let name = words.next()?;
        Some(Self::from_parts(name, words))
    }

    fn from_parts<'a>(
        name: &str,
        mut args: impl Iterator<Item = &'a str>,
    ) -> Result<Self, ModerationError> {
        match name {
            "tempban" => {
                let target = required(name, "user", args.next())?;
                let target = parse_user_mention(target).ok_or_else(|| {
                    ModerationError::new(ModerationErrorKind::InvalidTarget(target.to_string()))
                })?;
                let duration = required(name, "duration", args.next())?.to_string();
                let reason = args.map(str::to_string).collect();
                Ok(Command::TempBan {
                    target,
                    duration,
                    reason,
                })
            }
            "unban" => Ok(Command::Unban {
                name: rest_of(name, "username", args)?,
            }),
            "banfetch" => Ok(Command::BanFetch {
                name: rest_of(name, "username", args)?,
            }),
            "slowmode" => Ok(Command::SlowMode {
                delay: required(name, "delay", args.next())?.to_string(),
            }),
            "slowoff" => Ok(Command::SlowOff),
            "modchan" => {
                let channel = required(name, "channel", args.next())?;
                let channel = parse_channel_mention(channel).ok_or_else(|| {
                    ModerationError::new(ModerationErrorKind::InvalidTarget(channel.to_string()))
                })?;
                Ok(Command::ModChan { channel })
            }
            other => Err(ModerationError::new(ModerationErrorKind::UnknownCommand(
                other.to_string(),
            ))),
        }
    }

    /// Command name as typed after the prefix.
    pub fn name(&self) -> &str {
        self.as_ref()
    }

    /// Permission the issuer must hold.
    pub fn required_permission(&self) -> Permission {
        match self {
            Command::SlowMode { .. } | Command::SlowOff => Permission::ManageMessages,
            _ => Permission::BanMembers,
        }
    }

    /// Whether the invoking message is deleted before the command runs.
    pub fn deletes_invocation(&self) -> bool {
        matches!(
            self,
            Command::TempBan { .. } | Command::Unban { .. } | Command::BanFetch { .. }
        )
    }
}

fn required<'a>(
    command: &str,
    arg_name: &str,
    arg: Option<&'a str>,
) -> Result<&'a str, ModerationError> {
    arg.ok_or_else(|| {
        ModerationError::new(ModerationErrorKind::MissingArgument {
            command: command.to_string(),
            arg_name: arg_name.to_string(),
        })
    })
}

/// Join the remaining words, so display names with spaces survive.
fn rest_of<'a>(
    command: &str,
    arg_name: &str,
    args: impl Iterator<Item = &'a str>,
) -> Result<String, ModerationError> {
    let joined = args.collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        return Err(ModerationError::new(ModerationErrorKind::MissingArgument {
            command: command.to_string(),
            arg_name: arg_name.to_string(),
        }));
    }
    Ok(joined)
}

/// Parse `<@123>`, `<@!123>` or a bare `123`.
pub fn parse_user_mention(text: &str) -> Option<UserId> {
    let inner = match text.strip_prefix("<@").and_then(|t| t.strip_suffix('>')) {
        Some(inner) => inner.strip_prefix('!').unwrap_or(inner),
        None => text,
    };
    parse_snowflake(inner).map(UserId::new)
}

/// Parse `<#123>` or a bare `123`.
pub fn parse_channel_mention(text: &str) -> Option<ChannelId> {
    let inner = text
        .strip_prefix("<#")
        .and_then(|t| t.strip_suffix('>'))
        .unwrap_or(text);
    parse_snowflake(inner).map(ChannelId::new)
}

fn parse_snowflake(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
