//! Shared fixtures for moderation tests.

#![allow(dead_code)]

use bailiff_core::{ChannelId, ManualClock, MessageId, ServerId, UserId};
use bailiff_interface::{IncomingMessage, PlatformUser, RecordingPlatform};
use bailiff_moderation::{MessageOutcome, ModerationService};
use bailiff_storage::{BanStore, MemoryPersistence};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const SERVER: ServerId = ServerId::new(1);
pub const CHANNEL: ChannelId = ChannelId::new(10);
pub const MOD_CHANNEL: ChannelId = ChannelId::new(11);
pub const MODERATOR: UserId = UserId::new(100);
pub const TROLL: UserId = UserId::new(200);
pub const MEMBER: UserId = UserId::new(300);

static NEXT_MESSAGE: AtomicU64 = AtomicU64::new(1);

pub struct Harness {
    pub service: Arc<ModerationService<RecordingPlatform>>,
    pub platform: Arc<RecordingPlatform>,
    pub clock: ManualClock,
    pub backend: MemoryPersistence,
}

pub fn platform() -> RecordingPlatform {
    RecordingPlatform::new()
        .with_server(SERVER, "Lounge")
        .with_user(MODERATOR, "alice")
        .with_user(TROLL, "troll")
        .with_user(MEMBER, "bob")
        .with_channel(CHANNEL, Some(SERVER), "general")
        .with_channel(MOD_CHANNEL, Some(SERVER), "mods")
        .with_moderator(MODERATOR)
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_backend(MemoryPersistence::new()).await
    }

    pub async fn with_backend(backend: MemoryPersistence) -> Self {
        Self::with_parts(platform(), backend).await
    }

    pub async fn with_platform(platform: RecordingPlatform) -> Self {
        Self::with_parts(platform, MemoryPersistence::new()).await
    }

    async fn with_parts(platform: RecordingPlatform, backend: MemoryPersistence) -> Self {
        let platform = Arc::new(platform);
        let clock = ManualClock::new(1_000);
        let store = BanStore::open(backend.clone()).await.unwrap();
        let service = Arc::new(ModerationService::new(
            platform.clone(),
            store,
            Arc::new(clock.clone()),
        ));
        Self {
            service,
            platform,
            clock,
            backend,
        }
    }

    pub async fn say(&self, author: UserId, content: &str) -> MessageOutcome {
        self.service
            .handle_message(&message(author, content))
            .await
            .unwrap()
    }
}

pub fn message(author: UserId, content: &str) -> IncomingMessage {
    let name = match author {
        MODERATOR => "alice",
        TROLL => "troll",
        _ => "bob",
    };
    IncomingMessage::new(
        MessageId::new(NEXT_MESSAGE.fetch_add(1, Ordering::SeqCst)),
        CHANNEL,
        Some(SERVER),
        PlatformUser::new(author, name),
        content,
    )
}
