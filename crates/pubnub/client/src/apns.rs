//! APNS API group: manage push notification registrations of a device token.
//!
//! Every operation completes exactly once, either by resolving the returned
//! future or, for the `*_with_completion` forms, by calling the completion
//! closure from a task on the current Tokio runtime. Outside a runtime the
//! completion is called immediately with an `Unknown` error status and no
//! request is sent. Failures are reported as
//! error statuses, never as panics or `Err` values crossing this boundary
//! (the audit operation returns its error status on the `Err` side of
//! [`AuditOutcome`]).

use pubnub_core::{
    AckStatus, AuditOutcome, Channels, ErrorData, PushOptions, PushRequest, PushToken, Status,
    StatusCategory,
};
use pubnub_transport::Transport;
use tokio::runtime::Handle;

use crate::PubNub;

impl<T: Transport + 'static> PubNub<T> {
    /// Enable push notifications on `channels` for `token`.
    ///
    /// ```no_run
    /// # async fn example(token: pubnub_client::PushToken) -> color_eyre::eyre::Result<()> {
    /// let client = pubnub_client::PubNub::new(pubnub_client::Config::demo())?;
    /// let status = client
    ///     .add_push_notifications_on_channels(vec!["wwdc", "google.io"], token)
    ///     .await;
    /// if status.is_error() {
    ///     // Re-issue the same request later with `client.execute(status.into_request())`.
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn add_push_notifications_on_channels<S: Into<String>>(
        &self,
        channels: Vec<S>,
        token: impl Into<PushToken>,
    ) -> AckStatus {
        let options = self.config().push.clone();
        self.add_push_notifications_on_channels_with(channels, token, &options)
            .await
    }

    /// Enable push notifications with explicit push type, environment and topic.
    pub async fn add_push_notifications_on_channels_with<S: Into<String>>(
        &self,
        channels: Vec<S>,
        token: impl Into<PushToken>,
        options: &PushOptions,
    ) -> AckStatus {
        self.execute(PushRequest::add(channels, token).with_options(options))
            .await
    }

    /// Disable push notifications on `channels` for `token`.
    ///
    /// Passing [`Channels::All`] (or an empty list) removes the token from
    /// every channel, same as [`PubNub::remove_all_push_notifications_from_device`].
    pub async fn remove_push_notifications_from_channels(
        &self,
        channels: impl Into<Channels>,
        token: impl Into<PushToken>,
    ) -> AckStatus {
        let options = self.config().push.clone();
        self.remove_push_notifications_from_channels_with(channels, token, &options)
            .await
    }

    /// Disable push notifications with explicit push type, environment and topic.
    pub async fn remove_push_notifications_from_channels_with(
        &self,
        channels: impl Into<Channels>,
        token: impl Into<PushToken>,
        options: &PushOptions,
    ) -> AckStatus {
        self.execute(PushRequest::remove(channels, token).with_options(options))
            .await
    }

    /// Disable push notifications on every channel registered for `token`.
    pub async fn remove_all_push_notifications_from_device(
        &self,
        token: impl Into<PushToken>,
    ) -> AckStatus {
        let options = self.config().push.clone();
        self.remove_all_push_notifications_from_device_with(token, &options)
            .await
    }

    pub async fn remove_all_push_notifications_from_device_with(
        &self,
        token: impl Into<PushToken>,
        options: &PushOptions,
    ) -> AckStatus {
        self.execute(PushRequest::remove_all(token).with_options(options))
            .await
    }

    /// List channels with push notifications enabled for `token`.
    ///
    /// Channel data is only available on the `Ok` side; the `Err` side
    /// carries the error status.
    pub async fn push_notification_enabled_channels(
        &self,
        token: impl Into<PushToken>,
    ) -> AuditOutcome {
        let options = self.config().push.clone();
        self.push_notification_enabled_channels_with(token, &options)
            .await
    }

    pub async fn push_notification_enabled_channels_with(
        &self,
        token: impl Into<PushToken>,
        options: &PushOptions,
    ) -> AuditOutcome {
        self.audit(PushRequest::enabled_channels(token).with_options(options))
            .await
    }

    /// Callback form of [`PubNub::add_push_notifications_on_channels`].
    ///
    /// The request runs on the current Tokio runtime; without one the
    /// completion receives an error status right away.
    pub fn add_push_notifications_on_channels_with_completion<S, F>(
        &self,
        channels: Vec<S>,
        token: impl Into<PushToken>,
        completion: F,
    ) where
        S: Into<String>,
        F: FnOnce(AckStatus) + Send + 'static,
    {
        let request = PushRequest::add(channels, token).with_options(&self.config().push);
        self.spawn_execute(request, completion);
    }

    /// Callback form of [`PubNub::remove_push_notifications_from_channels`].
    ///
    /// The request runs on the current Tokio runtime; without one the
    /// completion receives an error status right away.
    pub fn remove_push_notifications_from_channels_with_completion<F>(
        &self,
        channels: impl Into<Channels>,
        token: impl Into<PushToken>,
        completion: F,
    ) where
        F: FnOnce(AckStatus) + Send + 'static,
    {
        let request = PushRequest::remove(channels, token).with_options(&self.config().push);
        self.spawn_execute(request, completion);
    }

    /// Callback form of [`PubNub::remove_all_push_notifications_from_device`].
    ///
    /// The request runs on the current Tokio runtime; without one the
    /// completion receives an error status right away.
    pub fn remove_all_push_notifications_from_device_with_completion<F>(
        &self,
        token: impl Into<PushToken>,
        completion: F,
    ) where
        F: FnOnce(AckStatus) + Send + 'static,
    {
        let request = PushRequest::remove_all(token).with_options(&self.config().push);
        self.spawn_execute(request, completion);
    }

    /// Callback form of [`PubNub::push_notification_enabled_channels`].
    ///
    /// The request runs on the current Tokio runtime; without one the
    /// completion receives an error status right away.
    pub fn push_notification_enabled_channels_with_completion<F>(
        &self,
        token: impl Into<PushToken>,
        completion: F,
    ) where
        F: FnOnce(AuditOutcome) + Send + 'static,
    {
        let request = PushRequest::enabled_channels(token).with_options(&self.config().push);
        let Ok(handle) = Handle::try_current() else {
            completion(Err(no_runtime(request)));
            return;
        };
        let client = self.clone();
        handle.spawn(async move {
            completion(client.audit(request).await);
        });
    }

    fn spawn_execute<F>(&self, request: PushRequest, completion: F)
    where
        F: FnOnce(AckStatus) + Send + 'static,
    {
        let Ok(handle) = Handle::try_current() else {
            completion(no_runtime(request));
            return;
        };
        let client = self.clone();
        handle.spawn(async move {
            completion(client.execute(request).await);
        });
    }
}

fn no_runtime(request: PushRequest) -> Status {
    tracing::warn!(
        operation = %request.operation(),
        "push request dropped: no Tokio runtime"
    );
    Status::failure(
        request,
        StatusCategory::Unknown,
        0,
        None,
        ErrorData {
            information: "no Tokio runtime available".into(),
            ..Default::default()
        },
    )
}
