//! Integration tests for the swipe discovery loop: feed paging, decisions,
//! saved items and persistence across restarts.

use mockito::Matcher;
use swipey_client::discover::SwipeSession;
use swipey_client::error::{Action, ClientError, capture_client_error};
use swipey_client::stores::LoadOutcome;
use swipey_core::SwipeDecision;
use swipey_integration_tests::{TestContext, feed_body};

// =============================================================================
// Swiping
// =============================================================================

#[tokio::test]
async fn test_swipes_preload_and_survive_restart() {
    let mut ctx = TestContext::new().await;
    ctx.accept_telemetry().await;
    let _first = ctx
        .server
        .mock("GET", "/api/feed")
        .match_query(Matcher::Regex("^limit=4$".into()))
        .with_body(feed_body(&[1, 2, 3, 4], Some("c2")))
        .create_async()
        .await;
    let second = ctx
        .server
        .mock("GET", "/api/feed")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("cursor".into(), "c2".into()),
            Matcher::UrlEncoded("limit".into(), "4".into()),
        ]))
        .with_body(feed_body(&[4, 5], None))
        .create_async()
        .await;

    {
        let mut session = SwipeSession::new(ctx.state(4));
        assert_eq!(session.start().await.unwrap(), Some(LoadOutcome::Loaded(4)));

        let liked = session.drag_end(150.0).await.unwrap().unwrap();
        assert_eq!(liked.decision, SwipeDecision::Like);
        assert!(liked.preload.is_none());
        session.finish_exit();

        let passed = session.drag_end(-150.0).await.unwrap().unwrap();
        assert_eq!(passed.decision, SwipeDecision::Pass);
        assert!(passed.preload.is_none());
        session.finish_exit();

        // Two cards left including this one
        let passed = session.swipe(SwipeDecision::Pass).await.unwrap().unwrap();
        assert_eq!(passed.product.id.as_str(), "3");
        assert_eq!(passed.preload, Some(LoadOutcome::Loaded(1)));
        session.finish_exit();
        session.finish().await;
    }
    second.assert_async().await;

    // A fresh state over the same directory is a restart
    let state = ctx.state(4);
    let feed = state.feed().lock().await;
    assert_eq!(feed.index(), 3);
    assert_eq!(feed.current().unwrap().id.as_str(), "4");
    assert_eq!(feed.products().len(), 5);
    assert!(feed.is_exhausted());
    assert!(!feed.is_loading());
    assert_eq!(feed.likes().len(), 1);
    assert_eq!(feed.passes().len(), 2);

    let profile = state.profile().lock().await;
    assert_eq!(profile.saved_items().len(), 1);
    assert_eq!(profile.saved_items()[0].id.as_str(), "1");
}

#[tokio::test]
async fn test_threshold_offsets_spring_back() {
    let mut ctx = TestContext::new().await;
    let _first = ctx
        .server
        .mock("GET", "/api/feed")
        .match_query(Matcher::Any)
        .with_body(feed_body(&[1, 2, 3], None))
        .create_async()
        .await;

    let mut session = SwipeSession::new(ctx.state(3));
    session.start().await.unwrap();
    for offset in [80.0, -80.0, 10.0] {
        assert!(session.drag_end(offset).await.unwrap().is_none());
    }
    assert_eq!(session.current().await.unwrap().id.as_str(), "1");

    let restarted = ctx.state(3);
    assert_eq!(restarted.feed().lock().await.index(), 0);
}

#[tokio::test]
async fn test_exhausted_feed_ends_in_empty_state() {
    let mut ctx = TestContext::new().await;
    ctx.accept_telemetry().await;
    let first = ctx
        .server
        .mock("GET", "/api/feed")
        .match_query(Matcher::Any)
        .with_body(feed_body(&[1, 2], None))
        .expect(1)
        .create_async()
        .await;

    let mut session = SwipeSession::new(ctx.state(5));
    session.start().await.unwrap();

    for _ in 0..2 {
        assert!(session.swipe(SwipeDecision::Pass).await.unwrap().is_some());
        session.finish_exit();
    }
    assert!(session.current().await.is_none());
    assert!(session.swipe(SwipeDecision::Like).await.unwrap().is_none());
    session.finish_exit();
    assert_eq!(session.load_more().await.unwrap(), LoadOutcome::Exhausted);
    session.finish().await;

    first.assert_async().await;
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_failed_first_page_shows_generic_message() {
    let mut ctx = TestContext::new().await;
    let _feed = ctx
        .server
        .mock("GET", "/api/feed")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error": "recommender offline"}"#)
        .create_async()
        .await;

    let state = ctx.state(5);
    let mut session = SwipeSession::new(state.clone());
    let err = session.start().await.unwrap_err();
    assert!(matches!(err, ClientError::Api(_)));
    assert!(err.to_string().contains("recommender offline"));
    assert_eq!(capture_client_error(&err, Action::LoadFeed), "failed to load feed");

    let feed = state.feed().lock().await;
    assert!(!feed.is_loading());
    assert!(feed.products().is_empty());
}
