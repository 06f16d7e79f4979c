// Concurrency properties of match creation and coin debits

mod common;

use common::*;
use futures::future::join_all;
use std::collections::HashSet;

use sphere_match::core::MessagePayload;
use sphere_match::models::{CanonicalPair, CoinTransactionKind, SwipeAction};
use sphere_match::CoreError;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_mutual_likes_create_one_match() {
    let h = Harness::new();

    for round in 0..50 {
        let a = h.add(profile(&format!("A{}", round), 27, "female")).await;
        let b = h.add(profile(&format!("B{}", round), 29, "male")).await;

        let engine_a = h.state.engine.clone();
        let engine_b = h.state.engine.clone();
        let left = tokio::spawn(async move { engine_a.record_swipe(a, b, SwipeAction::Like).await });
        let right = tokio::spawn(async move { engine_b.record_swipe(b, a, SwipeAction::Like).await });

        let left = left.await.unwrap().unwrap();
        let right = right.await.unwrap().unwrap();

        let created = [left.match_created, right.match_created]
            .iter()
            .filter(|c| **c)
            .count();
        assert_eq!(created, 1, "round {}", round);
        assert!(left.is_match || right.is_match);
        assert_eq!(h.store.match_count(CanonicalPair::new(a, b)).await, 1);
        assert_eq!(h.profile(a).await.total_matches, 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_replayed_swipes_are_counted_once() {
    let h = Harness::new();
    let a = h.add(profile("Ana", 27, "female")).await;
    let b = h.add(profile("Ben", 29, "male")).await;

    let tasks = (0..10).map(|_| {
        let engine = h.state.engine.clone();
        tokio::spawn(async move { engine.record_swipe(a, b, SwipeAction::Like).await })
    });

    let outcomes: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|o| !o.duplicate).count(), 1);
    assert_eq!(h.profile(a).await.total_likes_given, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_debits_never_overdraw() {
    let h = Harness::new();
    let a = h.add_with_coins(profile("Ana", 27, "female"), 100).await;

    let tasks = (0..10).map(|_| {
        let ledger = h.state.ledger.clone();
        tokio::spawn(async move {
            ledger
                .debit(a, 30, CoinTransactionKind::GiftSent, "burst")
                .await
        })
    });

    let results: Vec<_> = join_all(tasks).await.into_iter().map(|r| r.unwrap()).collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(CoreError::InsufficientFunds { .. })))
        .count();

    assert_eq!(succeeded, 3);
    assert_eq!(rejected, 7);
    assert_eq!(h.state.ledger.balance(a).await.unwrap(), 10);

    let history = h.state.ledger.history(a, 50).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history.iter().map(|t| t.amount).sum::<i64>(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_gifts_and_credits() {
    let h = Harness::new();
    let a = h.add_with_coins(profile("Ana", 27, "female"), 100).await;
    let b = h.add(profile("Ben", 29, "male")).await;
    h.state.engine.record_swipe(a, b, SwipeAction::Like).await.unwrap();
    let match_id = h
        .state
        .engine
        .record_swipe(b, a, SwipeAction::Like)
        .await
        .unwrap()
        .match_id
        .unwrap();

    let gifts = (0..8).map(|_| {
        let messaging = h.state.messaging.clone();
        tokio::spawn(async move {
            messaging
                .send_message(
                    a,
                    match_id,
                    MessagePayload::Gift {
                        gift_id: "rose".to_string(),
                        cost: 40,
                        note: None,
                    },
                )
                .await
                .is_ok()
        })
    });
    let credits = (0..2).map(|_| {
        let ledger = h.state.ledger.clone();
        tokio::spawn(async move { ledger.refund(a, 20, "promo").await.is_ok() })
    });

    let gifts_sent = join_all(gifts).await.into_iter().filter(|r| *r.as_ref().unwrap()).count() as i64;
    let credited = join_all(credits).await.into_iter().filter(|r| *r.as_ref().unwrap()).count() as i64;

    assert_eq!(credited, 2);
    assert!(gifts_sent * 40 <= 100 + credited * 20);

    let balance = h.state.ledger.balance(a).await.unwrap();
    assert!(balance >= 0);
    assert_eq!(balance, 100 + credited * 20 - gifts_sent * 40);
    assert_eq!(h.store.message_count().await as i64, gifts_sent);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fetch_marks_only_listed_messages_read() {
    let h = Harness::new();
    let a = h.add(profile("Ana", 27, "female")).await;
    let b = h.add(profile("Ben", 29, "male")).await;
    h.state.engine.record_swipe(a, b, SwipeAction::Like).await.unwrap();
    let match_id = h
        .state
        .engine
        .record_swipe(b, a, SwipeAction::Like)
        .await
        .unwrap()
        .match_id
        .unwrap();

    let sends = (0..30).map(|i| {
        let messaging = h.state.messaging.clone();
        tokio::spawn(async move {
            messaging
                .send_message(a, match_id, MessagePayload::Text { content: format!("hi {}", i) })
                .await
                .unwrap();
        })
    });
    let fetches = (0..10).map(|_| {
        let messaging = h.state.messaging.clone();
        tokio::spawn(async move {
            messaging
                .fetch_messages(b, match_id, 100)
                .await
                .unwrap()
                .into_iter()
                .map(|f| f.message.id)
                .collect::<Vec<_>>()
        })
    });

    let (_, seen) = futures::join!(join_all(sends), join_all(fetches));
    let seen: HashSet<_> = seen.into_iter().flat_map(|r| r.unwrap()).collect();

    // Ana's own fetch marks nothing of hers
    let all = h.state.messaging.fetch_messages(a, match_id, 100).await.unwrap();
    assert_eq!(all.len(), 30);
    for fetched in all.iter().filter(|f| f.message.is_read) {
        assert!(seen.contains(&fetched.message.id));
    }
}
