use chrono::Duration;
use futures::future::try_join_all;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MessagingSettings;
use crate::core::clock::Clock;
use crate::core::ledger::CoinLedger;
use crate::error::CoreError;
use crate::models::{
    CoinTransactionKind, FetchedMessage, Match, MatchId, MatchSummary, Message, MessageKind,
    ProfileId, SendMessageRequest,
};
use crate::services::{MatchStore, MessageNotification, Notifier};

const DEFAULT_PREVIEW: &str = "You received a message";

/// Media kinds that expire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Voice,
    Video,
}

impl From<MediaKind> for MessageKind {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => MessageKind::Image,
            MediaKind::Voice => MessageKind::Voice,
            MediaKind::Video => MessageKind::Video,
        }
    }
}

/// What a sender puts into a match
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePayload {
    Text {
        content: String,
    },
    Media {
        kind: MediaKind,
        media_url: String,
        caption: Option<String>,
    },
    Gift {
        gift_id: String,
        cost: i64,
        note: Option<String>,
    },
}

impl MessagePayload {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessagePayload::Text { .. } => MessageKind::Text,
            MessagePayload::Media { kind, .. } => (*kind).into(),
            MessagePayload::Gift { .. } => MessageKind::Gift,
        }
    }

    fn content(&self) -> Option<&str> {
        match self {
            MessagePayload::Text { content } => Some(content),
            MessagePayload::Media { caption, .. } => caption.as_deref(),
            MessagePayload::Gift { note, .. } => note.as_deref(),
        }
    }
}

impl TryFrom<SendMessageRequest> for MessagePayload {
    type Error = CoreError;

    fn try_from(req: SendMessageRequest) -> Result<Self, Self::Error> {
        let content = req.content.filter(|c| !c.trim().is_empty());

        let media = |kind: MediaKind, url: Option<String>, caption: Option<String>| {
            url.map(|media_url| MessagePayload::Media {
                kind,
                media_url,
                caption,
            })
            .ok_or_else(|| CoreError::Validation("Media messages require mediaUrl".into()))
        };

        match req.kind {
            MessageKind::Text => content
                .map(|content| MessagePayload::Text { content })
                .ok_or_else(|| CoreError::Validation("Text messages require content".into())),
            MessageKind::Image => media(MediaKind::Image, req.media_url, content),
            MessageKind::Voice => media(MediaKind::Voice, req.media_url, content),
            MessageKind::Video => media(MediaKind::Video, req.media_url, content),
            MessageKind::Gift => {
                let gift_id = req
                    .gift_id
                    .ok_or_else(|| CoreError::Validation("Gift messages require giftId".into()))?;
                let cost = req
                    .gift_cost
                    .ok_or_else(|| CoreError::Validation("Gift messages require giftCost".into()))?;
                if cost <= 0 {
                    return Err(CoreError::Validation("giftCost must be positive".into()));
                }
                Ok(MessagePayload::Gift {
                    gift_id,
                    cost,
                    note: content,
                })
            }
        }
    }
}

/// Messaging gateway
///
/// Only the two participants of a match may read or write it. Gifts are
/// paid for in the same unit of work that stores them; media expires after
/// the configured TTL but is never deleted here.
#[derive(Clone)]
pub struct MessagingGateway {
    store: Arc<dyn MatchStore>,
    ledger: CoinLedger,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    media_ttl: Duration,
    preview_chars: usize,
    max_fetch_limit: usize,
}

impl MessagingGateway {
    pub fn new(
        store: Arc<dyn MatchStore>,
        ledger: CoinLedger,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: &MessagingSettings,
    ) -> Self {
        Self {
            store,
            ledger,
            notifier,
            clock,
            media_ttl: Duration::days(settings.media_ttl_days),
            preview_chars: settings.preview_chars,
            max_fetch_limit: settings.max_fetch_limit,
        }
    }

    pub async fn send_message(
        &self,
        sender: ProfileId,
        match_id: MatchId,
        payload: MessagePayload,
    ) -> Result<Message, CoreError> {
        let m = self.authorize(sender, match_id).await?;

        if m.is_blocked {
            tracing::warn!("Send into blocked match {} by {} rejected", match_id, sender);
            return Err(CoreError::Forbidden(format!("Match {} is blocked", match_id)));
        }

        let now = self.clock.now();
        let kind = payload.kind();
        let content = payload.content().map(str::to_string);

        let charge = match &payload {
            MessagePayload::Gift { gift_id, cost, .. } => Some(self.ledger.prepare_debit(
                sender,
                *cost,
                CoinTransactionKind::GiftSent,
                format!("Sent gift: {}", gift_id),
            )?),
            _ => None,
        };

        let (media_url, gift_id, gift_cost) = match payload {
            MessagePayload::Text { .. } => (None, None, None),
            MessagePayload::Media { media_url, .. } => (Some(media_url), None, None),
            MessagePayload::Gift { gift_id, cost, .. } => (None, Some(gift_id), Some(cost)),
        };

        let message = Message {
            id: Uuid::new_v4(),
            match_id,
            sender_id: sender,
            kind,
            content,
            media_url,
            gift_id,
            gift_cost,
            is_read: false,
            read_at: None,
            sent_at: now,
            expires_at: kind.is_media().then(|| now + self.media_ttl),
        };

        let balance = self.store.insert_message(&message, charge.as_ref()).await?;

        if let (Some(cost), Some(balance)) = (message.gift_cost, balance) {
            tracing::info!(
                "Gift sent in match {} by {}: {} coins, balance {}",
                match_id,
                sender,
                cost,
                balance
            );
        }

        if let Some(recipient) = m.pair.other(sender) {
            self.notifier
                .notify(MessageNotification {
                    recipient_id: recipient,
                    sender_id: sender,
                    match_id,
                    preview: self.preview(message.content.as_deref()),
                })
                .await;
        }

        Ok(message)
    }

    /// Messages oldest first, up to `limit`
    ///
    /// Marks every message the requester did not send as read. The returned
    /// messages show the read state from before this call.
    pub async fn fetch_messages(
        &self,
        requester: ProfileId,
        match_id: MatchId,
        limit: usize,
    ) -> Result<Vec<FetchedMessage>, CoreError> {
        if limit == 0 || limit > self.max_fetch_limit {
            return Err(CoreError::Validation(format!(
                "limit must be between 1 and {}, got {}",
                self.max_fetch_limit, limit
            )));
        }

        self.authorize(requester, match_id).await?;

        let now = self.clock.now();
        let messages = self
            .store
            .fetch_and_mark_read(match_id, requester, limit, now)
            .await?;

        tracing::debug!("Fetched {} messages in {}", messages.len(), match_id);

        Ok(messages
            .into_iter()
            .map(|message| FetchedMessage {
                is_expired: !message.is_current(now),
                message,
            })
            .collect())
    }

    /// Non-blocked matches of `requester`, most recent activity first
    pub async fn list_matches(&self, requester: ProfileId) -> Result<Vec<MatchSummary>, CoreError> {
        let matches = self.store.active_matches_for(requester).await?;

        let mut summaries = try_join_all(matches.into_iter().map(|m| self.summarize(requester, m))).await?;
        summaries.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));

        Ok(summaries)
    }

    /// Block a match; irreversible, history stays readable
    pub async fn block_match(&self, requester: ProfileId, match_id: MatchId) -> Result<Match, CoreError> {
        let m = self.authorize(requester, match_id).await?;
        if m.is_blocked {
            return Ok(m);
        }

        let blocked = self
            .store
            .block_match(match_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Match {}", match_id)))?;

        tracing::info!("Match {} blocked by {}", match_id, requester);
        Ok(blocked)
    }

    async fn summarize(&self, requester: ProfileId, m: Match) -> Result<MatchSummary, CoreError> {
        let other = m
            .pair
            .other(requester)
            .ok_or_else(|| CoreError::Forbidden(format!("Not a participant of match {}", m.id)))?;

        Ok(MatchSummary {
            match_id: m.id,
            other_profile_id: other,
            created_at: m.created_at,
            last_message: self.store.last_message(m.id).await?,
            unread_count: self.store.count_unread(m.id, requester).await?,
        })
    }

    async fn authorize(&self, actor: ProfileId, match_id: MatchId) -> Result<Match, CoreError> {
        let m = self
            .store
            .get_match(match_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Match {}", match_id)))?;

        if !m.is_participant(actor) {
            tracing::warn!("Profile {} attempted to access match {} without being a participant", actor, match_id);
            return Err(CoreError::Forbidden(format!("Not a participant of match {}", match_id)));
        }

        Ok(m)
    }

    fn preview(&self, content: Option<&str>) -> String {
        match content.filter(|c| !c.is_empty()) {
            Some(text) => text.chars().take(self.preview_chars).collect(),
            None => DEFAULT_PREVIEW.to_string(),
        }
    }
}
