//! The moderation service: command execution and the unban tick.

use crate::{BanReport, Command};
use bailiff_core::{BanDuration, BanKey, ChannelId, Clock, ServerId, UserId};
use bailiff_error::{
    BailiffError, BailiffResult, ModerationError, ModerationErrorKind, StorageError,
    StorageErrorKind,
};
use bailiff_interface::{IncomingMessage, ModerationPlatform};
use bailiff_rate_limit::{SlowMode, SlowModeVerdict};
use bailiff_scheduler::{UnbanEvent, UnbanQueue};
use bailiff_storage::{BanRecord, BanRecordBuilder, BanStore};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Reply posted after a successful tempban.
pub const BAN_CONFIRMATION: &str = "The Ban :hammer: has spoken!";

/// Everything that must change together: records, their pending unbans and
/// where reports go.
#[derive(Debug)]
pub struct ModerationState {
    store: BanStore,
    queue: UnbanQueue,
    mod_channels: HashMap<ServerId, ChannelId>,
}

impl ModerationState {
    fn new(store: BanStore) -> Self {
        Self {
            store,
            queue: UnbanQueue::new(),
            mod_channels: HashMap::new(),
        }
    }

    /// Rebuild the queue from the store, one event per record.
    fn reschedule(&mut self) -> usize {
        self.queue.clear();
        for record in self.store.all() {
            self.queue.schedule(event_for(record));
        }
        self.queue.len()
    }
}

fn event_for(record: &BanRecord) -> UnbanEvent {
    UnbanEvent::new(
        record.due_timestamp(),
        *record.server_id(),
        *record.user_id(),
        record.user_name().clone(),
    )
}

/// What happened to an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Not a command, or sent outside a server
    Ignored,
    /// Deleted by slow mode and not a command
    Suppressed,
    /// The named command ran
    Completed(String),
    /// The command was refused; the issuer was told why
    Rejected(ModerationErrorKind),
}

/// Tempban and slow mode logic, independent of any chat platform.
///
/// Shared as `Arc<ModerationService<P>>` between the message handler and the
/// [`UnbanDispatcher`](crate::UnbanDispatcher). Ban state sits behind one
/// async mutex so cancelling a ban and dispatching its unban can never
/// interleave; platform calls are made only after that lock is released.
pub struct ModerationService<P: ModerationPlatform> {
    platform: Arc<P>,
    clock: Arc<dyn Clock>,
    prefix: String,
    state: Mutex<ModerationState>,
    slow_mode: Mutex<SlowMode>,
}

impl<P: ModerationPlatform> std::fmt::Debug for ModerationService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationService")
            .field("prefix", &self.prefix)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl<P: ModerationPlatform> ModerationService<P> {
    /// Create a service over an opened store and schedule every stored ban.
    pub fn new(platform: Arc<P>, store: BanStore, clock: Arc<dyn Clock>) -> Self {
        let mut state = ModerationState::new(store);
        let scheduled = state.reschedule();
        info!(scheduled, "Moderation service ready");

        Self {
            platform,
            clock,
            prefix: "!".to_string(),
            state: Mutex::new(state),
            slow_mode: Mutex::new(SlowMode::new()),
        }
    }

    /// Use `prefix` in front of command names instead of `!`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Start from an existing slow mode configuration.
    pub fn with_slow_mode(mut self, slow_mode: SlowMode) -> Self {
        self.slow_mode = Mutex::new(slow_mode);
        self
    }

    /// The platform this service talks to.
    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    /// Command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Current time from the service clock.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Handle one incoming chat message: apply slow mode, then run it as a
    /// command if it is one.
    ///
    /// A command deleted by slow mode still runs. Words after the prefix
    /// that are not Bailiff commands are ignored, since other bots may share
    /// the prefix. Rejected commands are answered in chat and reported as
    /// [`MessageOutcome::Rejected`].
    ///
    /// # Errors
    ///
    /// - storage errors, after logging and notifying the server's mod channel
    /// - platform errors, after telling the issuer the request failed
    #[instrument(
        skip(self, message),
        fields(
            message_id = %message.id(),
            channel_id = %message.channel_id(),
            author_id = %message.author().id
        )
    )]
    pub async fn handle_message(
        &self,
        message: &IncomingMessage,
    ) -> BailiffResult<MessageOutcome> {
        let Some(server_id) = *message.server_id() else {
            return Ok(MessageOutcome::Ignored);
        };

        let suppressed = self.apply_slow_mode(message).await == SlowModeVerdict::Suppress;
        let not_a_command = if suppressed {
            MessageOutcome::Suppressed
        } else {
            MessageOutcome::Ignored
        };

        let command = match Command::parse(message.content(), &self.prefix) {
            None => return Ok(not_a_command),
            Some(Ok(command)) => command,
            Some(Err(e)) if matches!(e.kind(), ModerationErrorKind::UnknownCommand(_)) => {
                debug!(error = %e, "Not one of ours");
                return Ok(not_a_command);
            }
            Some(Err(e)) => {
                warn!(error = %e, "Could not parse command");
                self.send_quietly(*message.channel_id(), &e.kind().user_message())
                    .await;
                return Ok(MessageOutcome::Rejected(e.kind().clone()));
            }
        };

        let permission = command.required_permission();
        if !self.platform.has_permission(message, permission).await? {
            warn!(command = command.name(), %permission, "Permission denied");
            let kind = ModerationErrorKind::PermissionDenied(command.name().to_string());
            self.send_quietly(*message.channel_id(), &kind.user_message())
                .await;
            return Ok(MessageOutcome::Rejected(kind));
        }

        if command.deletes_invocation() && !suppressed {
            self.delete_quietly(message).await;
        }

        let feedback = self.feedback_channel(server_id, message).await;
        let name = command.name().to_string();

        match self.execute(server_id, message, command).await {
            Ok(()) => Ok(MessageOutcome::Completed(name)),
            Err(e) => {
                if let Some(kind) = e.moderation_kind().cloned() {
                    warn!(command = %name, error = %e, "Command rejected");
                    self.send_quietly(feedback, &kind.user_message()).await;
                    return Ok(MessageOutcome::Rejected(kind));
                }
                if e.is_storage() {
                    self.escalate(server_id, &e).await;
                } else {
                    self.send_quietly(feedback, &e.user_message()).await;
                }
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        server_id: ServerId,
        message: &IncomingMessage,
        command: Command,
    ) -> BailiffResult<()> {
        match command {
            Command::TempBan {
                target,
                duration,
                reason,
            } => self.tempban(server_id, message, target, &duration, &reason).await,
            Command::Unban { name } => self.unban(server_id, message, &name).await,
            Command::BanFetch { name } => self.banfetch(server_id, message, &name).await,
            Command::SlowMode { delay } => self.slowmode(message, &delay).await,
            Command::SlowOff => self.slowoff(message).await,
            Command::ModChan { channel } => self.modchan(server_id, message, channel).await,
        }
    }

    #[instrument(skip(self, message, reason), fields(%server_id, user_id = %target))]
    async fn tempban(
        &self,
        server_id: ServerId,
        message: &IncomingMessage,
        target: UserId,
        duration: &str,
        reason: &[String],
    ) -> BailiffResult<()> {
        let user = self.platform.resolve_user(target).await?;
        let moderator = message.author();
        let reason = reason.join(" ");

        let duration = {
            let mut state = self.state.lock().await;

            if state.store.contains(server_id, user.id) {
                return Err(ModerationError::new(ModerationErrorKind::AlreadyBanned(
                    user.name.clone(),
                ))
                .into());
            }

            let duration = BanDuration::parse(duration)
                .map_err(|e| ModerationError::from(e.kind().clone()))?;
            if duration.seconds() <= 0 {
                return Err(ModerationError::new(ModerationErrorKind::NonPositiveDuration).into());
            }
            if reason.is_empty() {
                return Err(ModerationError::new(ModerationErrorKind::EmptyReason).into());
            }

            let record = BanRecordBuilder::default()
                .server_id(server_id)
                .user_id(user.id)
                .user_name(user.name.clone())
                .moderator_id(moderator.id)
                .moderator_name(moderator.name.clone())
                .ban_timestamp(self.clock.now())
                .duration_seconds(duration.seconds())
                .reason(reason.clone())
                .build()
                .map_err(|e| StorageError::new(StorageErrorKind::InvalidRecord(e.to_string())))?;

            let event = event_for(&record);
            state.store.put(record).await?;
            state.queue.schedule(event);
            duration
        };

        info!(
            user = %user.name,
            moderator = %moderator.name,
            duration = %duration,
            "Tempban recorded"
        );

        let server_name = match self.platform.get_server(server_id).await {
            Ok(server) => server.name,
            Err(e) => {
                warn!(error = %e, "Could not resolve server name");
                server_id.to_string()
            }
        };
        let notice = format!(
            "You have been banned on {} for {}. Reason : {}",
            server_name,
            duration.describe(),
            reason
        );
        if let Err(e) = self.platform.send_direct_message(user.id, &notice).await {
            warn!(error = %e, "Could not notify banned user");
        }

        if let Err(e) = self.platform.ban(server_id, user.id, &reason).await {
            error!(error = %e, "Platform refused the ban, dropping the record");
            let mut state = self.state.lock().await;
            // The event must outlive a record that could not be removed.
            state.store.remove(server_id, user.id).await?;
            state.queue.cancel(server_id, user.id);
            return Err(e.into());
        }

        // An unban that landed between recording and banning has already
        // been sent to the platform, ahead of this ban. Repeat it.
        if !self.state.lock().await.store.contains(server_id, user.id) {
            warn!("Ban was lifted while it was being applied, unbanning again");
            self.platform.unban(server_id, user.id).await?;
            return Ok(());
        }

        self.platform
            .send_message(*message.channel_id(), BAN_CONFIRMATION)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, message), fields(%server_id))]
    async fn unban(
        &self,
        server_id: ServerId,
        message: &IncomingMessage,
        name: &str,
    ) -> BailiffResult<()> {
        let user_id = {
            let mut state = self.state.lock().await;
            let user_id = find_banned(&state.store, server_id, name)?;
            state.store.remove(server_id, user_id).await?;
            state.queue.cancel(server_id, user_id);
            user_id
        };

        info!(%user_id, user = name, moderator = %message.author().name, "Tempban lifted manually");
        self.platform.unban(server_id, user_id).await?;

        let feedback = self.feedback_channel(server_id, message).await;
        self.send_quietly(feedback, &format!("{} has been unbanned.", name))
            .await;
        Ok(())
    }

    #[instrument(skip(self, message), fields(%server_id))]
    async fn banfetch(
        &self,
        server_id: ServerId,
        message: &IncomingMessage,
        name: &str,
    ) -> BailiffResult<()> {
        let report = {
            let state = self.state.lock().await;
            let user_id = find_banned(&state.store, server_id, name)?;
            state
                .store
                .get(server_id, user_id)
                .map(|record| BanReport::new(record, message.author().name.clone()))
                .ok_or_else(|| {
                    ModerationError::new(ModerationErrorKind::NotTempBanned(name.to_string()))
                })?
        };

        let feedback = self.feedback_channel(server_id, message).await;
        self.platform.send_message(feedback, &report.render()).await?;
        Ok(())
    }

    #[instrument(skip(self, message), fields(channel_id = %message.channel_id()))]
    async fn slowmode(&self, message: &IncomingMessage, delay: &str) -> BailiffResult<()> {
        let invalid = || ModerationError::new(ModerationErrorKind::InvalidDelay(delay.to_string()));
        if delay.is_empty() || !delay.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid().into());
        }
        let seconds: u64 = delay.parse().map_err(|_| invalid())?;

        self.slow_mode
            .lock()
            .await
            .set_slow(*message.channel_id(), seconds);
        info!(seconds, "Slow mode set");

        self.platform
            .send_message(
                *message.channel_id(),
                &format!("This channel is now in :snail: mode. ({} seconds).", delay),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self, message), fields(channel_id = %message.channel_id()))]
    async fn slowoff(&self, message: &IncomingMessage) -> BailiffResult<()> {
        self.slow_mode
            .lock()
            .await
            .set_slow(*message.channel_id(), 0);
        info!("Slow mode lifted");

        self.platform
            .send_message(
                *message.channel_id(),
                "This channel is no longer in :snail: mode.",
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self, message), fields(%server_id, %channel))]
    async fn modchan(
        &self,
        server_id: ServerId,
        message: &IncomingMessage,
        channel: ChannelId,
    ) -> BailiffResult<()> {
        let resolved = self.platform.get_channel(channel).await?;
        if resolved.server_id != Some(server_id) {
            return Err(ModerationError::new(ModerationErrorKind::InvalidTarget(
                channel.to_string(),
            ))
            .into());
        }

        self.state
            .lock()
            .await
            .mod_channels
            .insert(server_id, channel);
        info!(channel_name = %resolved.name, "Mod channel set");

        self.platform
            .send_message(
                channel,
                &format!(
                    "Okay {}, I'll send logs in here now.",
                    message.author().mention()
                ),
            )
            .await?;
        Ok(())
    }

    /// Lift every ban due at or before `now`.
    ///
    /// Due events are popped and their records removed in one locked step
    /// with a single save. Platform unbans follow, earliest first, with the
    /// lock released; a failed unban is logged and not retried.
    ///
    /// Returns the number of bans that came due.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the removal cannot be saved. The events are
    /// put back so the next tick tries again.
    #[instrument(skip(self))]
    pub async fn run_due(&self, now: i64) -> BailiffResult<usize> {
        let (events, mod_channels) = {
            let mut state = self.state.lock().await;
            let events = state.queue.pop_due(now);
            if events.is_empty() {
                return Ok(0);
            }

            let keys: Vec<BanKey> = events.iter().map(UnbanEvent::key).collect();
            if let Err(e) = state.store.remove_many(&keys).await {
                let servers: BTreeSet<ServerId> = keys.iter().map(|k| k.server_id).collect();
                for event in events {
                    state.queue.schedule(event);
                }
                drop(state);
                for server_id in servers {
                    self.escalate(server_id, &e).await;
                }
                return Err(e);
            }

            (events, state.mod_channels.clone())
        };

        debug!(count = events.len(), "Dispatching due unbans");
        for event in &events {
            self.dispatch_unban(event, mod_channels.get(event.server_id()).copied())
                .await;
        }
        Ok(events.len())
    }

    #[instrument(
        skip(self, event, mod_channel),
        fields(server_id = %event.server_id(), user_id = %event.user_id(), due = event.due_timestamp())
    )]
    async fn dispatch_unban(&self, event: &UnbanEvent, mod_channel: Option<ChannelId>) {
        let user = match self.platform.resolve_user(*event.user_id()).await {
            Ok(user) => user,
            Err(e) => {
                error!(error = %e, user = %event.user_name(), "Could not resolve user, unban abandoned");
                return;
            }
        };

        let server = match self.platform.get_server(*event.server_id()).await {
            Ok(server) => server,
            Err(e) => {
                error!(error = %e, "Could not resolve server, unban abandoned");
                return;
            }
        };

        if let Err(e) = self
            .platform
            .unban(*event.server_id(), *event.user_id())
            .await
        {
            error!(error = %e, "Unban failed, abandoned");
            return;
        }
        info!(user = %user.name, server = %server.name, "Tempban expired, user unbanned");

        if let Some(channel) = mod_channel {
            self.send_quietly(
                channel,
                &format!("{}'s tempban has expired, they are unbanned.", event.user_name()),
            )
            .await;
        }
    }

    /// Rebuild the unban queue from the store.
    ///
    /// Returns the number of scheduled events. Bans already past due are
    /// lifted on the next tick.
    #[instrument(skip(self))]
    pub async fn reload_schedule(&self) -> usize {
        let scheduled = self.state.lock().await.reschedule();
        info!(scheduled, "Unban schedule reloaded");
        scheduled
    }

    /// Drop every pending event without unbanning anyone. Records stay.
    pub async fn drain_schedule(&self) -> usize {
        self.state.lock().await.queue.clear()
    }

    /// Drop slow mode entries that can no longer suppress anything.
    pub async fn prune_slow_mode(&self, now: i64) -> usize {
        self.slow_mode.lock().await.prune(now)
    }

    /// Number of pending unbans.
    pub async fn pending_unbans(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Due time of the next pending unban.
    pub async fn next_due(&self) -> Option<i64> {
        self.state.lock().await.queue.next_due()
    }

    /// Copy of the record for `(server_id, user_id)`.
    pub async fn ban_record(&self, server_id: ServerId, user_id: UserId) -> Option<BanRecord> {
        self.state.lock().await.store.get(server_id, user_id).cloned()
    }

    /// The mod channel configured for `server_id`.
    pub async fn mod_channel(&self, server_id: ServerId) -> Option<ChannelId> {
        self.state.lock().await.mod_channels.get(&server_id).copied()
    }

    /// Current slow mode threshold for `channel`.
    pub async fn slow_for(&self, channel: ChannelId) -> u64 {
        self.slow_mode.lock().await.slow_for(channel)
    }

    async fn apply_slow_mode(&self, message: &IncomingMessage) -> SlowModeVerdict {
        let channel = *message.channel_id();
        if self.slow_mode.lock().await.slow_for(channel) == 0 {
            return SlowModeVerdict::Allow;
        }

        let exempt = match self.platform.is_exempt(message).await {
            Ok(exempt) => exempt,
            Err(e) => {
                warn!(error = %e, "Could not check slow mode exemption, letting message through");
                return SlowModeVerdict::Allow;
            }
        };

        let verdict = self.slow_mode.lock().await.on_message(
            channel,
            message.author().id,
            self.clock.now(),
            exempt,
        );
        if verdict == SlowModeVerdict::Suppress {
            debug!("Message suppressed by slow mode");
            self.delete_quietly(message).await;
        }
        verdict
    }

    async fn feedback_channel(&self, server_id: ServerId, message: &IncomingMessage) -> ChannelId {
        self.mod_channel(server_id)
            .await
            .unwrap_or(*message.channel_id())
    }

    /// Log a storage failure and tell the server's moderators, if they have a
    /// channel.
    async fn escalate(&self, server_id: ServerId, err: &BailiffError) {
        error!(%server_id, error = %err, "Ban data could not be persisted");
        if let Some(channel) = self.mod_channel(server_id).await {
            self.send_quietly(channel, &err.user_message()).await;
        }
    }

    async fn send_quietly(&self, channel: ChannelId, content: &str) {
        if let Err(e) = self.platform.send_message(channel, content).await {
            warn!(%channel, error = %e, "Could not send message");
        }
    }

    async fn delete_quietly(&self, message: &IncomingMessage) {
        if let Err(e) = self
            .platform
            .delete_message(*message.channel_id(), *message.id())
            .await
        {
            warn!(error = %e, "Could not delete message");
        }
    }
}

fn find_banned(store: &BanStore, server_id: ServerId, name: &str) -> BailiffResult<UserId> {
    if !store.has_server(server_id) {
        return Err(ModerationError::new(ModerationErrorKind::ServerNotRegistered).into());
    }
    store.find_by_name(server_id, name).ok_or_else(|| {
        ModerationError::new(ModerationErrorKind::NotTempBanned(name.to_string())).into()
    })
}
