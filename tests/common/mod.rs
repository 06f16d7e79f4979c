// Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use sphere_match::config::{
    AuthSettings, DatabaseSettings, EconomySettings, FeedSettings, LoggingSettings,
    MessagingSettings, OracleSettings, ServerSettings, Settings,
};
use sphere_match::core::{Clock, CompatibilityScorer, ManualClock};
use sphere_match::models::{DiscoveryPreferences, GeoPoint, Profile, ProfileId};
use sphere_match::routes::AppState;
use sphere_match::services::{MatchStore, MemoryStore, MessageNotification, Notifier};

pub const JWT_SECRET: &str = "test-secret";

/// 2026-03-14 12:00:00 UTC
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings::default(),
        database: DatabaseSettings {
            url: "postgres://localhost/sphere_test".to_string(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 60,
        },
        auth: AuthSettings {
            jwt_secret: JWT_SECRET.to_string(),
        },
        oracle: OracleSettings::default(),
        economy: EconomySettings::default(),
        feed: FeedSettings::default(),
        messaging: MessagingSettings::default(),
        logging: LoggingSettings::default(),
    }
}

pub fn profile(name: &str, age: u8, gender: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        display_name: name.to_string(),
        age,
        gender: gender.to_string(),
        interests: vec![],
        bio: None,
        is_premium: false,
        coins: 0,
        is_approved: true,
        is_banned: false,
        preferences: DiscoveryPreferences::default(),
        location: None,
        total_likes_given: 0,
        total_super_likes_given: 0,
        total_matches: 0,
        created_at: t0(),
    }
}

pub fn with_interests(mut profile: Profile, interests: &[&str]) -> Profile {
    profile.interests = interests.iter().map(|s| s.to_string()).collect();
    profile
}

pub fn premium(mut profile: Profile) -> Profile {
    profile.is_premium = true;
    profile
}

pub fn located(mut profile: Profile, latitude: f64, longitude: f64) -> Profile {
    profile.location = Some(GeoPoint { latitude, longitude });
    profile
}

/// Notifier that keeps every event for inspection
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<MessageNotification>>,
}

impl RecordingNotifier {
    pub async fn sent(&self) -> Vec<MessageNotification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: MessageNotification) {
        self.sent.lock().await.push(notification);
    }
}

/// Fully wired core over an in-memory store and a manual clock
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotifier>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(CompatibilityScorer::interests_only(), test_settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::build(CompatibilityScorer::interests_only(), settings)
    }

    pub fn with_scorer(scorer: CompatibilityScorer) -> Self {
        Self::build(scorer, test_settings())
    }

    fn build(scorer: CompatibilityScorer, settings: Settings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(t0()));
        let notifier = Arc::new(RecordingNotifier::default());

        let state = AppState::new(
            store.clone() as Arc<dyn MatchStore>,
            scorer,
            notifier.clone() as Arc<dyn Notifier>,
            clock.clone() as Arc<dyn Clock>,
            &settings,
        );

        Self {
            store,
            clock,
            notifier,
            state,
        }
    }

    pub async fn add(&self, profile: Profile) -> ProfileId {
        let id = profile.id;
        self.store.insert_profile(&profile).await.unwrap();
        id
    }

    /// Add a profile holding `coins`, credited through the ledger
    pub async fn add_with_coins(&self, profile: Profile, coins: i64) -> ProfileId {
        let id = self.add(profile).await;
        if coins > 0 {
            self.state
                .ledger
                .refund(id, coins, "test funding")
                .await
                .unwrap();
        }
        id
    }

    pub async fn profile(&self, id: ProfileId) -> Profile {
        self.store.get_profile(id).await.unwrap().unwrap()
    }
}
