// Integration tests for the Sphere matching core

mod common;

use chrono::Duration;
use common::*;
use uuid::Uuid;

use sphere_match::core::{MediaKind, MessagePayload};
use sphere_match::models::{CanonicalPair, CoinPackage, CoinTransactionKind, MessageKind, SwipeAction};
use sphere_match::services::MatchStore;
use sphere_match::CoreError;

fn text(content: &str) -> MessagePayload {
    MessagePayload::Text {
        content: content.to_string(),
    }
}

fn gift(cost: i64) -> MessagePayload {
    MessagePayload::Gift {
        gift_id: "rose".to_string(),
        cost,
        note: None,
    }
}

/// Two profiles that like each other, returning their ids and the match id
async fn matched_pair(h: &Harness) -> (Uuid, Uuid, Uuid) {
    let a = h.add(profile("Ana", 27, "female")).await;
    let b = h.add(profile("Ben", 29, "male")).await;
    h.state.engine.record_swipe(a, b, SwipeAction::Like).await.unwrap();
    let outcome = h.state.engine.record_swipe(b, a, SwipeAction::Like).await.unwrap();
    (a, b, outcome.match_id.unwrap())
}

// ---------------------------------------------------------------------------
// Swipe & match engine
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_mutual_like_creates_exactly_one_match() {
    let h = Harness::new();
    let a = h.add(profile("Ana", 27, "female")).await;
    let b = h.add(profile("Ben", 29, "male")).await;

    let first = h.state.engine.record_swipe(a, b, SwipeAction::Like).await.unwrap();
    assert!(!first.is_match);
    assert!(!first.match_created);

    let second = h.state.engine.record_swipe(b, a, SwipeAction::SuperLike).await.unwrap();
    assert!(second.is_match);
    assert!(second.match_created);

    let pair = CanonicalPair::new(a, b);
    assert_eq!(h.store.match_count(pair).await, 1);
    assert_eq!(h.profile(a).await.total_matches, 1);
    assert_eq!(h.profile(b).await.total_matches, 1);

    // Replaying both likes changes nothing
    let replay_a = h.state.engine.record_swipe(a, b, SwipeAction::Like).await.unwrap();
    let replay_b = h.state.engine.record_swipe(b, a, SwipeAction::Like).await.unwrap();
    assert!(replay_a.duplicate && replay_b.duplicate);
    assert!(!replay_a.match_created && !replay_b.match_created);
    assert_eq!(replay_a.match_id, second.match_id);

    assert_eq!(h.store.match_count(pair).await, 1);
    assert_eq!(h.profile(a).await.total_likes_given, 1);
    assert_eq!(h.profile(a).await.total_matches, 1);
}

#[tokio::test]
async fn test_pass_never_matches() {
    let h = Harness::new();
    let a = h.add(profile("Ana", 27, "female")).await;
    let b = h.add(profile("Ben", 29, "male")).await;

    h.state.engine.record_swipe(a, b, SwipeAction::Pass).await.unwrap();
    let outcome = h.state.engine.record_swipe(b, a, SwipeAction::Like).await.unwrap();

    assert!(!outcome.is_match);
    assert_eq!(h.store.match_count(CanonicalPair::new(a, b)).await, 0);
    assert_eq!(h.profile(a).await.total_likes_given, 0);
}

#[tokio::test]
async fn test_reconcile_match_is_idempotent() {
    let h = Harness::new();
    let (a, b, match_id) = matched_pair(&h).await;

    let again = h.state.engine.reconcile_match(b, a).await.unwrap().unwrap();
    assert!(!again.is_created());
    assert_eq!(again.into_match().id, match_id);

    let c = h.add(profile("Cleo", 31, "female")).await;
    assert!(h.state.engine.reconcile_match(a, c).await.unwrap().is_none());
}

#[tokio::test]
async fn test_invalid_swipes() {
    let h = Harness::new();
    let a = h.add(profile("Ana", 27, "female")).await;

    let own = h.state.engine.record_swipe(a, a, SwipeAction::Like).await;
    assert!(matches!(own, Err(CoreError::Validation(_))));

    let unknown = h.state.engine.record_swipe(a, Uuid::new_v4(), SwipeAction::Like).await;
    assert!(matches!(unknown, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_super_like_daily_quota() {
    let h = Harness::new();
    let a = h.add(profile("Ana", 27, "female")).await;
    let b = h.add(profile("Ben", 29, "male")).await;
    let c = h.add(profile("Carl", 30, "male")).await;
    let d = h.add(profile("Dan", 33, "male")).await;

    h.state.engine.record_swipe(a, b, SwipeAction::SuperLike).await.unwrap();

    let second = h.state.engine.record_swipe(a, c, SwipeAction::SuperLike).await;
    assert!(matches!(second, Err(CoreError::QuotaExceeded { limit: 1 })));
    assert!(h.store.get_swipe(a, c).await.unwrap().is_none());

    // A plain like is not limited
    h.state.engine.record_swipe(a, c, SwipeAction::Like).await.unwrap();

    // Next calendar day resets the quota
    h.clock.advance(Duration::hours(12));
    h.state.engine.record_swipe(a, d, SwipeAction::SuperLike).await.unwrap();
    assert_eq!(h.profile(a).await.total_super_likes_given, 2);
}

#[tokio::test]
async fn test_premium_super_likes_are_unlimited() {
    let h = Harness::new();
    let a = h.add(premium(profile("Ana", 27, "female"))).await;

    for i in 0..5 {
        let target = h.add(profile(&format!("P{}", i), 30, "male")).await;
        h.state.engine.record_swipe(a, target, SwipeAction::SuperLike).await.unwrap();
    }
    assert_eq!(h.profile(a).await.total_super_likes_given, 5);
}

#[tokio::test]
async fn test_undo_charges_non_premium_once() {
    let h = Harness::new();
    let a = h.add_with_coins(profile("Ana", 27, "female"), 120).await;
    let b = h.add(profile("Ben", 29, "male")).await;
    let c = h.add(profile("Carl", 30, "male")).await;

    h.state.engine.record_swipe(a, b, SwipeAction::Pass).await.unwrap();
    h.state.engine.record_swipe(a, c, SwipeAction::Like).await.unwrap();

    let undone = h.state.engine.undo_last_swipe(a).await.unwrap();
    assert_eq!(undone.undone.target_id, c);
    assert_eq!(undone.coins_charged, 50);
    assert_eq!(undone.balance, Some(70));

    assert!(h.store.get_swipe(a, c).await.unwrap().is_none());
    assert!(!h.store.has_like(a, c).await.unwrap());
    assert!(h.store.get_swipe(a, b).await.unwrap().is_some());

    // Undo history is one swipe deep
    let again = h.state.engine.undo_last_swipe(a).await;
    assert!(matches!(again, Err(CoreError::NotFound(_))));
    assert_eq!(h.state.ledger.balance(a).await.unwrap(), 70);

    let history = h.state.ledger.history(a, 10).await.unwrap();
    assert_eq!(history[0].kind, CoinTransactionKind::UndoFee);
    assert_eq!(history[0].amount, -50);
}

#[tokio::test]
async fn test_undo_without_history_is_not_found() {
    let h = Harness::new();
    let a = h.add(premium(profile("Ana", 27, "female"))).await;

    let result = h.state.engine.undo_last_swipe(a).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_undo_without_coins_has_no_side_effects() {
    let h = Harness::new();
    let a = h.add_with_coins(profile("Ana", 27, "female"), 30).await;
    let b = h.add(profile("Ben", 29, "male")).await;

    h.state.engine.record_swipe(a, b, SwipeAction::Like).await.unwrap();

    let result = h.state.engine.undo_last_swipe(a).await;
    assert!(matches!(
        result,
        Err(CoreError::InsufficientFunds { balance: 30, required: 50 })
    ));

    assert!(h.store.get_swipe(a, b).await.unwrap().is_some());
    assert!(h.store.has_like(a, b).await.unwrap());
    assert_eq!(h.state.ledger.balance(a).await.unwrap(), 30);
    assert_eq!(h.state.ledger.history(a, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_overflowing_credit_leaves_no_trace() {
    let h = Harness::new();
    let a = h.add_with_coins(profile("Ana", 27, "female"), 10).await;

    let result = h
        .state
        .ledger
        .credit(a, i64::MAX, CoinTransactionKind::Purchase, "big")
        .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));

    assert_eq!(h.state.ledger.balance(a).await.unwrap(), 10);
    assert_eq!(h.state.ledger.history(a, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_premium_undo_is_free_and_keeps_match() {
    let h = Harness::new();
    let a = h.add(premium(profile("Ana", 27, "female"))).await;
    let b = h.add(profile("Ben", 29, "male")).await;

    h.state.engine.record_swipe(b, a, SwipeAction::Like).await.unwrap();
    let outcome = h.state.engine.record_swipe(a, b, SwipeAction::Like).await.unwrap();
    assert!(outcome.match_created);

    let undone = h.state.engine.undo_last_swipe(a).await.unwrap();
    assert_eq!(undone.coins_charged, 0);
    assert_eq!(undone.balance, None);

    // The match stands
    let m = h.store.find_match(CanonicalPair::new(a, b)).await.unwrap();
    assert!(m.is_some());
    assert!(h.state.ledger.history(a, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_undo_prevents_future_match() {
    let h = Harness::new();
    let a = h.add(premium(profile("Ana", 27, "female"))).await;
    let b = h.add(profile("Ben", 29, "male")).await;

    h.state.engine.record_swipe(a, b, SwipeAction::Like).await.unwrap();
    h.state.engine.undo_last_swipe(a).await.unwrap();

    let outcome = h.state.engine.record_swipe(b, a, SwipeAction::Like).await.unwrap();
    assert!(!outcome.is_match);
}

#[tokio::test]
async fn test_received_likes_premium_gate() {
    let h = Harness::new();
    let viewer = h.add(profile("Vera", 28, "female")).await;
    let fan_a = h.add(profile("Al", 30, "male")).await;
    let fan_b = h.add(profile("Bo", 31, "male")).await;

    h.state.engine.record_swipe(fan_a, viewer, SwipeAction::Like).await.unwrap();
    h.clock.advance(Duration::minutes(1));
    h.state.engine.record_swipe(fan_b, viewer, SwipeAction::SuperLike).await.unwrap();

    let gated = h.state.engine.received_likes(viewer).await.unwrap();
    assert_eq!(gated.count, 2);
    assert!(gated.premium_required);
    assert!(gated.likes.is_empty());

    let premium_viewer = h.add(premium(profile("Pia", 28, "female"))).await;
    h.state.engine.record_swipe(fan_a, premium_viewer, SwipeAction::Like).await.unwrap();
    h.clock.advance(Duration::minutes(1));
    h.state.engine.record_swipe(fan_b, premium_viewer, SwipeAction::SuperLike).await.unwrap();

    let full = h.state.engine.received_likes(premium_viewer).await.unwrap();
    assert_eq!(full.count, 2);
    assert!(!full.premium_required);
    assert_eq!(full.likes[0].liker_id, fan_b);
    assert!(full.likes[0].is_super);
    assert_eq!(full.likes[1].liker_id, fan_a);
}

// ---------------------------------------------------------------------------
// Coin ledger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ledger_credits_and_history() {
    let h = Harness::new();
    let a = h.add(profile("Ana", 27, "female")).await;

    assert_eq!(h.state.ledger.grant_welcome_bonus(a).await.unwrap(), 100);
    h.clock.advance(Duration::seconds(1));
    assert_eq!(h.state.ledger.credit_purchase(a, CoinPackage::Medium).await.unwrap(), 600);
    h.clock.advance(Duration::seconds(1));
    assert_eq!(
        h.state.ledger.debit(a, 250, CoinTransactionKind::GiftSent, "gift").await.unwrap(),
        350
    );

    let history = h.state.ledger.history(a, 10).await.unwrap();
    let kinds: Vec<_> = history.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CoinTransactionKind::GiftSent,
            CoinTransactionKind::Purchase,
            CoinTransactionKind::WelcomeBonus
        ]
    );

    // Balance equals the sum of the ledger
    let sum: i64 = history.iter().map(|t| t.amount).sum();
    assert_eq!(sum, h.state.ledger.balance(a).await.unwrap());

    assert_eq!(h.state.ledger.history(a, 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_debit_leaves_no_trace() {
    let h = Harness::new();
    let a = h.add_with_coins(profile("Ana", 27, "female"), 40).await;

    let result = h
        .state
        .ledger
        .debit(a, 41, CoinTransactionKind::UndoFee, "undo")
        .await;
    assert!(matches!(result, Err(CoreError::InsufficientFunds { balance: 40, required: 41 })));

    assert_eq!(h.state.ledger.balance(a).await.unwrap(), 40);
    assert_eq!(h.state.ledger.history(a, 10).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Discovery feed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_feed_excludes_ineligible_profiles() {
    let h = Harness::new();

    let mut viewer = profile("Vera", 28, "female");
    viewer.preferences.min_age = 25;
    viewer.preferences.max_age = 35;
    viewer.preferences.show_gender = Some("male".to_string());
    let viewer = h.add(viewer).await;

    let eligible = h.add(profile("Eli", 30, "male")).await;
    let edge = h.add(profile("Edge", 35, "male")).await;

    let mut banned = profile("Banned", 30, "male");
    banned.is_banned = true;
    h.add(banned).await;

    let mut unapproved = profile("Pending", 30, "male");
    unapproved.is_approved = false;
    h.add(unapproved).await;

    h.add(profile("Young", 24, "male")).await;
    h.add(profile("Old", 36, "male")).await;
    h.add(profile("Fay", 30, "female")).await;

    let passed = h.add(profile("Passed", 30, "male")).await;
    let liked = h.add(profile("Liked", 30, "male")).await;
    h.state.engine.record_swipe(viewer, passed, SwipeAction::Pass).await.unwrap();
    h.state.engine.record_swipe(viewer, liked, SwipeAction::Like).await.unwrap();

    let feed = h.state.feed.build_feed(viewer, 50).await.unwrap();
    let mut ids: Vec<_> = feed.candidates.iter().map(|c| c.profile_id).collect();
    ids.sort();
    let mut expected = vec![eligible, edge];
    expected.sort();

    assert_eq!(ids, expected);
    assert!(!ids.contains(&viewer));
}

#[tokio::test]
async fn test_feed_ranks_premium_then_score() {
    let h = Harness::new();
    let viewer = h.add(with_interests(profile("Vera", 28, "female"), &["a", "b"])).await;

    let close = h.add(with_interests(profile("Close", 30, "male"), &["a", "b"])).await;
    let partial = h.add(with_interests(profile("Partial", 30, "male"), &["b", "c"])).await;
    let paid = h
        .add(premium(with_interests(profile("Paid", 30, "male"), &["z"])))
        .await;

    let feed = h.state.feed.build_feed(viewer, 10).await.unwrap();
    let order: Vec<_> = feed.candidates.iter().map(|c| c.profile_id).collect();
    assert_eq!(order, vec![paid, close, partial]);

    let scores: Vec<_> = feed.candidates.iter().map(|c| c.compatibility_score).collect();
    assert_eq!(scores, vec![0, 100, 33]);
    assert_eq!(feed.total_candidates, 3);
}

#[tokio::test]
async fn test_feed_limit_bounds() {
    let h = Harness::new();
    let viewer = h.add(profile("Vera", 28, "female")).await;
    for i in 0..5 {
        h.add(profile(&format!("P{}", i), 30, "male")).await;
    }

    assert!(matches!(
        h.state.feed.build_feed(viewer, 0).await,
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        h.state.feed.build_feed(viewer, 51).await,
        Err(CoreError::Validation(_))
    ));

    let feed = h.state.feed.build_feed(viewer, 3).await.unwrap();
    assert_eq!(feed.candidates.len(), 3);

    assert!(matches!(
        h.state.feed.build_feed(Uuid::new_v4(), 10).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_feed_attaches_distance() {
    let h = Harness::new();
    let viewer = h.add(located(profile("Vera", 28, "female"), 51.5074, -0.1278)).await;
    h.add(located(profile("Paris", 30, "male"), 48.8566, 2.3522)).await;
    h.add(profile("Nowhere", 30, "male")).await;

    let feed = h.state.feed.build_feed(viewer, 10).await.unwrap();
    let paris = feed.candidates.iter().find(|c| c.display_name == "Paris").unwrap();
    let nowhere = feed.candidates.iter().find(|c| c.display_name == "Nowhere").unwrap();

    let km = paris.distance_km.unwrap();
    assert!((km - 344.0).abs() < 10.0, "got {}", km);
    assert_eq!(nowhere.distance_km, None);
}

// ---------------------------------------------------------------------------
// Messaging gateway
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_gift_without_funds_leaves_no_trace() {
    let h = Harness::new();
    let (a, _, match_id) = matched_pair(&h).await;
    h.state.ledger.refund(a, 50, "seed").await.unwrap();

    let result = h.state.messaging.send_message(a, match_id, gift(100)).await;
    assert!(matches!(
        result,
        Err(CoreError::InsufficientFunds { balance: 50, required: 100 })
    ));

    assert_eq!(h.store.message_count().await, 0);
    let history = h.state.ledger.history(a, 10).await.unwrap();
    assert!(history.iter().all(|t| t.kind != CoinTransactionKind::GiftSent));
    assert_eq!(h.state.ledger.balance(a).await.unwrap(), 50);
    assert!(h.notifier.sent().await.is_empty());
}

#[tokio::test]
async fn test_gift_debits_sender() {
    let h = Harness::new();
    let (a, b, match_id) = matched_pair(&h).await;
    h.state.ledger.refund(a, 150, "seed").await.unwrap();

    let message = h.state.messaging.send_message(a, match_id, gift(100)).await.unwrap();
    assert_eq!(message.kind, MessageKind::Gift);
    assert_eq!(message.gift_cost, Some(100));
    assert_eq!(message.expires_at, None);

    assert_eq!(h.state.ledger.balance(a).await.unwrap(), 50);
    assert_eq!(h.state.ledger.balance(b).await.unwrap(), 0);

    let latest = &h.state.ledger.history(a, 1).await.unwrap()[0];
    assert_eq!(latest.kind, CoinTransactionKind::GiftSent);
    assert_eq!(latest.amount, -100);
    assert_eq!(latest.description, "Sent gift: rose");
}

#[tokio::test]
async fn test_media_expires_after_seven_days() {
    let h = Harness::new();
    let (a, b, match_id) = matched_pair(&h).await;

    let sent = h
        .state
        .messaging
        .send_message(
            a,
            match_id,
            MessagePayload::Media {
                kind: MediaKind::Image,
                media_url: "https://cdn.example/photo.jpg".to_string(),
                caption: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(sent.expires_at, Some(t0() + Duration::days(7)));

    h.clock.advance(Duration::days(6));
    let fresh = h.state.messaging.fetch_messages(b, match_id, 50).await.unwrap();
    assert!(!fresh[0].is_expired);

    h.clock.advance(Duration::days(1));
    let stale = h.state.messaging.fetch_messages(b, match_id, 50).await.unwrap();
    assert!(stale[0].is_expired);

    let text_msg = h.state.messaging.send_message(a, match_id, text("hi")).await.unwrap();
    assert_eq!(text_msg.expires_at, None);
}

#[tokio::test]
async fn test_outsiders_are_forbidden() {
    let h = Harness::new();
    let (_, _, match_id) = matched_pair(&h).await;
    let outsider = h.add(profile("Eve", 30, "female")).await;

    let send = h.state.messaging.send_message(outsider, match_id, text("hey")).await;
    assert!(matches!(send, Err(CoreError::Forbidden(_))));

    let fetch = h.state.messaging.fetch_messages(outsider, match_id, 10).await;
    assert!(matches!(fetch, Err(CoreError::Forbidden(_))));

    let missing = h.state.messaging.send_message(outsider, Uuid::new_v4(), text("hey")).await;
    assert!(matches!(missing, Err(CoreError::NotFound(_))));

    assert_eq!(h.store.message_count().await, 0);
}

#[tokio::test]
async fn test_fetch_orders_and_marks_read() {
    let h = Harness::new();
    let (a, b, match_id) = matched_pair(&h).await;

    for content in ["one", "two", "three"] {
        h.state.messaging.send_message(a, match_id, text(content)).await.unwrap();
        h.clock.advance(Duration::seconds(1));
    }
    h.state.messaging.send_message(b, match_id, text("reply")).await.unwrap();

    assert_eq!(h.store.count_unread(match_id, b).await.unwrap(), 3);
    assert_eq!(h.store.count_unread(match_id, a).await.unwrap(), 1);

    let first_two = h.state.messaging.fetch_messages(b, match_id, 2).await.unwrap();
    let contents: Vec<_> = first_two
        .iter()
        .map(|m| m.message.content.clone().unwrap())
        .collect();
    assert_eq!(contents, vec!["one", "two"]);

    // Reading marks everything the reader did not send
    assert_eq!(h.store.count_unread(match_id, b).await.unwrap(), 0);
    assert_eq!(h.store.count_unread(match_id, a).await.unwrap(), 1);

    assert!(matches!(
        h.state.messaging.fetch_messages(b, match_id, 0).await,
        Err(CoreError::Validation(_))
    ));
}

#[tokio::test]
async fn test_notification_preview() {
    let h = Harness::new();
    let (a, b, match_id) = matched_pair(&h).await;

    let long = "x".repeat(80);
    h.state.messaging.send_message(a, match_id, text(&long)).await.unwrap();
    h.state
        .messaging
        .send_message(
            b,
            match_id,
            MessagePayload::Media {
                kind: MediaKind::Voice,
                media_url: "https://cdn.example/v.ogg".to_string(),
                caption: None,
            },
        )
        .await
        .unwrap();

    let sent = h.notifier.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].recipient_id, b);
    assert_eq!(sent[0].match_id, match_id);
    assert_eq!(sent[0].preview.chars().count(), 50);
    assert_eq!(sent[1].recipient_id, a);
    assert_eq!(sent[1].preview, "You received a message");
}

#[tokio::test]
async fn test_match_list_and_blocking() {
    let h = Harness::new();
    let (a, b, first_match) = matched_pair(&h).await;

    let c = h.add(profile("Cleo", 31, "male")).await;
    h.clock.advance(Duration::minutes(5));
    h.state.engine.record_swipe(a, c, SwipeAction::Like).await.unwrap();
    let second_match = h
        .state
        .engine
        .record_swipe(c, a, SwipeAction::Like)
        .await
        .unwrap()
        .match_id
        .unwrap();

    // Newer match first until the older one gets a message
    let list = h.state.messaging.list_matches(a).await.unwrap();
    assert_eq!(list.iter().map(|m| m.match_id).collect::<Vec<_>>(), vec![second_match, first_match]);

    h.clock.advance(Duration::minutes(5));
    h.state.messaging.send_message(b, first_match, text("hello")).await.unwrap();

    let list = h.state.messaging.list_matches(a).await.unwrap();
    assert_eq!(list[0].match_id, first_match);
    assert_eq!(list[0].other_profile_id, b);
    assert_eq!(list[0].unread_count, 1);

    // Outsiders cannot block
    assert!(matches!(
        h.state.messaging.block_match(c, first_match).await,
        Err(CoreError::Forbidden(_))
    ));

    let blocked = h.state.messaging.block_match(a, first_match).await.unwrap();
    assert!(blocked.is_blocked);

    let list = h.state.messaging.list_matches(b).await.unwrap();
    assert!(list.is_empty());

    let send = h.state.messaging.send_message(b, first_match, text("still there?")).await;
    assert!(matches!(send, Err(CoreError::Forbidden(_))));

    // History stays readable
    let history = h.state.messaging.fetch_messages(a, first_match, 10).await.unwrap();
    assert_eq!(history.len(), 1);
}
