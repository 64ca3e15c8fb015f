//! Push registration round trips against the sandbox service.

use std::collections::BTreeSet;

use pubnub_client::{
    Channels, Config, Operation, PubNub, PushEnvironment, PushOptions, PushToken, PushType,
    StatusCategory,
};
use push_sandbox::{SandboxState, push_router};

async fn start_sandbox(state: SandboxState) -> Config {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, push_router(state)).await.unwrap();
    });

    let mut config = Config::demo();
    config.origin = addr.to_string();
    config.tls = false;
    config
}

async fn client() -> PubNub {
    let config = start_sandbox(SandboxState::new()).await;
    PubNub::new(config).unwrap()
}

fn token() -> PushToken {
    PushToken::from_hex("5f6e7d8c9bab").unwrap()
}

fn set(channels: &[String]) -> BTreeSet<&str> {
    channels.iter().map(String::as_str).collect()
}

#[tokio::test]
async fn test_add_then_list() {
    let client = client().await;

    let status = client
        .add_push_notifications_on_channels(vec!["wwdc", "google.io"], token())
        .await;
    assert!(!status.is_error(), "{status}");
    assert_eq!(status.category(), StatusCategory::Acknowledgment);

    let result = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert_eq!(set(&result.channels), BTreeSet::from(["wwdc", "google.io"]));
}

#[tokio::test]
async fn test_add_is_idempotent() {
    let client = client().await;

    for _ in 0..2 {
        let status = client
            .add_push_notifications_on_channels(vec!["wwdc", "google.io"], token())
            .await;
        assert!(!status.is_error());
    }

    let result = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert_eq!(result.channels.len(), 2);
}

#[tokio::test]
async fn test_remove_channels() {
    let client = client().await;
    client
        .add_push_notifications_on_channels(vec!["a", "b", "c"], token())
        .await;

    let status = client
        .remove_push_notifications_from_channels(vec!["a", "c"], token())
        .await;
    assert!(!status.is_error());
    assert_eq!(status.operation(), Operation::RemovePushNotificationsFromChannels);

    let result = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert_eq!(result.channels, vec!["b".to_string()]);
}

#[tokio::test]
async fn test_remove_all_clears_registrations() {
    let client = client().await;
    client
        .add_push_notifications_on_channels(vec!["wwdc", "google.io"], token())
        .await;

    let status = client.remove_all_push_notifications_from_device(token()).await;
    assert!(!status.is_error());

    let result = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert!(result.channels.is_empty());
}

#[tokio::test]
async fn test_remove_empty_list_matches_remove_all() {
    let client = client().await;
    client
        .add_push_notifications_on_channels(vec!["wwdc"], token())
        .await;

    let status = client
        .remove_push_notifications_from_channels(Vec::<String>::new(), token())
        .await;
    assert!(!status.is_error());
    assert_eq!(status.operation(), Operation::RemoveAllPushNotifications);

    let result = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert!(result.channels.is_empty());

    client
        .add_push_notifications_on_channels(vec!["wwdc"], token())
        .await;
    let status = client
        .remove_push_notifications_from_channels(Channels::All, token())
        .await;
    assert!(!status.is_error());
    let result = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert!(result.channels.is_empty());
}

#[tokio::test]
async fn test_remove_named_empty_channels_clears_registrations() {
    let client = client().await;
    client
        .add_push_notifications_on_channels(vec!["wwdc", "google.io"], token())
        .await;

    let status = client
        .remove_push_notifications_from_channels(Channels::Named(Vec::new()), token())
        .await;
    assert!(!status.is_error(), "{status}");
    assert_eq!(status.operation(), Operation::RemoveAllPushNotifications);

    let result = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert!(result.channels.is_empty());
}

#[tokio::test]
async fn test_concurrent_add_and_remove() {
    let client = client().await;

    let (added, removed) = tokio::join!(
        client.add_push_notifications_on_channels(vec!["a"], token()),
        client.remove_push_notifications_from_channels(vec!["a"], token()),
    );
    assert!(!added.is_error(), "{added}");
    assert!(!removed.is_error(), "{removed}");

    let result = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert!(
        result.channels.is_empty() || result.channels == vec!["a".to_string()],
        "unexpected channels: {:?}",
        result.channels
    );
}

#[tokio::test]
async fn test_apns2_registration() {
    let client = client().await;
    let production = PushOptions {
        push_type: PushType::Apns2,
        environment: PushEnvironment::Production,
        topic: Some("com.example.app".to_string()),
    };

    let status = client
        .add_push_notifications_on_channels_with(vec!["wwdc"], token(), &production)
        .await;
    assert!(!status.is_error(), "{status}");

    let result = client
        .push_notification_enabled_channels_with(token(), &production)
        .await
        .unwrap();
    assert_eq!(result.channels, vec!["wwdc".to_string()]);

    // The legacy registration for the same token is untouched.
    let legacy = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap();
    assert!(legacy.channels.is_empty());
}

#[tokio::test]
async fn test_access_denied_then_retry_with_auth() {
    let config = start_sandbox(SandboxState::new().with_auth_key("secret")).await;
    let client = PubNub::new(config.clone()).unwrap();

    let status = client
        .add_push_notifications_on_channels(vec!["wwdc"], token())
        .await;
    assert!(status.is_error());
    assert_eq!(status.category(), StatusCategory::AccessDenied);
    assert_eq!(status.status_code(), 403);
    assert_eq!(status.error_data().unwrap().channels, vec!["wwdc".to_string()]);

    let mut authorized = config;
    authorized.auth_key = Some("secret".to_string());
    let client = PubNub::new(authorized).unwrap();
    let retried = client.execute(status.into_request()).await;
    assert!(!retried.is_error(), "{retried}");

    let outcome = client.push_notification_enabled_channels(token()).await;
    assert_eq!(outcome.unwrap().channels, vec!["wwdc".to_string()]);
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = Config::demo();
    config.origin = addr.to_string();
    config.tls = false;
    let client = PubNub::new(config).unwrap();

    let status = client.remove_all_push_notifications_from_device(token()).await;
    assert_eq!(status.category(), StatusCategory::NetworkIssues);

    let status = client
        .push_notification_enabled_channels(token())
        .await
        .unwrap_err();
    assert_eq!(status.category(), StatusCategory::NetworkIssues);
}

#[tokio::test]
async fn test_completion_callbacks() {
    let client = client().await;
    let (tx, rx) = tokio::sync::oneshot::channel();

    client.add_push_notifications_on_channels_with_completion(
        vec!["wwdc"],
        token(),
        move |status| {
            let _ = tx.send(status);
        },
    );
    assert!(!rx.await.unwrap().is_error());

    let (tx, rx) = tokio::sync::oneshot::channel();
    client.push_notification_enabled_channels_with_completion(token(), move |outcome| {
        let _ = tx.send(outcome);
    });
    assert_eq!(rx.await.unwrap().unwrap().channels, vec!["wwdc".to_string()]);

    let (tx, rx) = tokio::sync::oneshot::channel();
    client.remove_push_notifications_from_channels_with_completion(
        vec!["wwdc"],
        token(),
        move |status| {
            let _ = tx.send(status);
        },
    );
    assert!(!rx.await.unwrap().is_error());

    let (tx, rx) = tokio::sync::oneshot::channel();
    client.remove_all_push_notifications_from_device_with_completion(token(), move |status| {
        let _ = tx.send(status);
    });
    assert!(!rx.await.unwrap().is_error());
}
