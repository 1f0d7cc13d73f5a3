//! # Command Dispatcher
//!
//! Turns one inbound `CommandEvent` into exactly one `Reply`.
//! Authorization runs first; only then is the (group, subcommand) pair routed to
//! the instance client or the website probe. Client errors stop here and become
//! a failure reply, so a handler can never produce zero or two replies.

use std::sync::Arc;

use crate::application::auth::AuthGate;
use crate::domain::config::AppConfig;
use crate::domain::error::ControlError;
use crate::domain::schema::{
    GROUP_BOT, GROUP_SERVER, SUB_CHECK_WEBSITE, SUB_REBOOT, SUB_START, SUB_STATUS, SUB_STOP,
};
use crate::domain::traits::{InstanceControl, ReplySink, WebsiteProbe};
use crate::domain::types::{CommandEvent, InstanceRef, Principal, ProbeOutcome, Reply};
use crate::strings::messages;

/// Handler selected for a (group, subcommand) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ServerStart,
    ServerStop,
    ServerReboot,
    ServerStatus,
    CheckWebsite,
    BotStatus,
    Unknown,
}

impl Route {
    pub fn resolve(group: Option<&str>, subcommand: Option<&str>) -> Self {
        match (group, subcommand) {
            (Some(GROUP_SERVER), Some(SUB_START)) => Route::ServerStart,
            (Some(GROUP_SERVER), Some(SUB_STOP)) => Route::ServerStop,
            (Some(GROUP_SERVER), Some(SUB_REBOOT)) => Route::ServerReboot,
            (Some(GROUP_SERVER), Some(SUB_STATUS)) => Route::ServerStatus,
            (Some(GROUP_SERVER), Some(SUB_CHECK_WEBSITE)) => Route::CheckWebsite,
            (Some(GROUP_BOT), Some(SUB_STATUS)) => Route::BotStatus,
            _ => Route::Unknown,
        }
    }
}

pub struct CommandDispatcher {
    gate: AuthGate,
    instance: InstanceRef,
    website_url: String,
    control: Arc<dyn InstanceControl>,
    probe: Arc<dyn WebsiteProbe>,
}

impl CommandDispatcher {
    pub fn new(
        config: &AppConfig,
        control: Arc<dyn InstanceControl>,
        probe: Arc<dyn WebsiteProbe>,
    ) -> Self {
        Self {
            gate: AuthGate::new(config.discord.admin_role.clone()),
            instance: config.lightsail.instance.clone(),
            website_url: config.website.url.clone(),
            control,
            probe,
        }
    }

    /// Handles one event end to end: compute the reply, then send it once.
    pub async fn on_command(&self, event: &CommandEvent, sink: &impl ReplySink) {
        let reply = self.dispatch(event).await;
        if let Err(e) = sink.send_reply(&reply).await {
            tracing::error!(
                "Failed to send reply to {}: {}",
                event.principal.user_id(),
                e
            );
        }
    }

    /// Computes the single reply for `event`. Never fails.
    pub async fn dispatch(&self, event: &CommandEvent) -> Reply {
        let roles = match &event.principal {
            Principal::Member { roles, .. } => roles,
            Principal::Unresolved { user_id } => {
                tracing::info!("Rejecting command from unresolved principal {}", user_id);
                return Reply::ephemeral(messages::UNABLE_TO_VERIFY);
            }
        };

        if !self.gate.is_authorized(roles) {
            tracing::info!(
                "Rejecting command from {}: missing required role",
                event.principal.user_id()
            );
            return Reply::ephemeral(messages::ROLE_REQUIRED);
        }

        let group = event.group.as_deref();
        let subcommand = event.subcommand.as_deref();
        let route = Route::resolve(group, subcommand);
        tracing::info!(
            "Command received group='{}' subcommand='{}' sender='{}' route={:?}",
            group.unwrap_or("-"),
            subcommand.unwrap_or("-"),
            event.principal.user_id(),
            route
        );

        match self.execute(route).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(
                    operation = e.operation(),
                    "Command error: {}",
                    e
                );
                Reply::public(messages::command_failed(&e.to_string()))
            }
        }
    }

    async fn execute(&self, route: Route) -> Result<Reply, ControlError> {
        let reply = match route {
            Route::ServerStart => {
                self.control.start_instance(&self.instance).await?;
                Reply::public(messages::SERVER_START_SENT)
            }
            Route::ServerStop => {
                self.control.stop_instance(&self.instance).await?;
                Reply::public(messages::SERVER_STOP_SENT)
            }
            Route::ServerReboot => {
                self.control.reboot_instance(&self.instance).await?;
                Reply::public(messages::SERVER_REBOOT_SENT)
            }
            Route::ServerStatus => {
                let state = self.control.get_instance_state(&self.instance).await?;
                Reply::public(messages::instance_state(state.as_str()))
            }
            Route::CheckWebsite => self.check_website().await,
            Route::BotStatus => Reply::public(messages::BOT_OPERATIONAL),
            Route::Unknown => Reply::public(messages::UNKNOWN_COMMAND),
        };
        Ok(reply)
    }

    async fn check_website(&self) -> Reply {
        match self.probe.check(&self.website_url).await {
            ProbeOutcome::Up => Reply::public(messages::WEBSITE_UP),
            ProbeOutcome::UnexpectedStatus(status) => {
                tracing::warn!("Website {} returned {}", self.website_url, status);
                Reply::public(messages::website_unexpected_status(status))
            }
            ProbeOutcome::Unreachable(err) => {
                tracing::warn!("Website {} unreachable: {}", self.website_url, err);
                Reply::public(messages::website_unreachable(&err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::FileConfig;
    use crate::domain::traits::{MockInstanceControl, MockWebsiteProbe};
    use crate::domain::types::InstanceState;
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use std::collections::HashSet;
    use std::sync::Mutex;

    const ADMIN_ROLE: &str = "900";
    const INSTANCE: &str = "TestBox";
    const URL: &str = "http://site.test";

    fn config() -> AppConfig {
        let env = |key: &str| match key {
            "DISCORD_BOT_TOKEN" => Some("token".to_string()),
            "DISCORD_ADMIN_ROLE" => Some(ADMIN_ROLE.to_string()),
            "DISCORD_GUILD_ID" => Some("1".to_string()),
            "LIGHTSAIL_INSTANCE_NAME" => Some(INSTANCE.to_string()),
            "WEBSITE_URL" => Some(URL.to_string()),
            _ => None,
        };
        AppConfig::resolve(FileConfig::default(), env).unwrap()
    }

    fn dispatcher(control: MockInstanceControl, probe: MockWebsiteProbe) -> CommandDispatcher {
        CommandDispatcher::new(&config(), Arc::new(control), Arc::new(probe))
    }

    fn admin_event(group: &str, subcommand: &str) -> CommandEvent {
        CommandEvent {
            group: Some(group.to_string()),
            subcommand: Some(subcommand.to_string()),
            principal: Principal::Member {
                user_id: "u1".to_string(),
                roles: HashSet::from(["12".to_string(), ADMIN_ROLE.to_string()]),
            },
        }
    }

    fn instance() -> InstanceRef {
        InstanceRef::new(INSTANCE)
    }

    #[derive(Default)]
    struct RecordingSink {
        replies: Mutex<Vec<Reply>>,
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn send_reply(&self, reply: &Reply) -> Result<(), String> {
            self.replies.lock().unwrap().push(reply.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_start_calls_client_once() {
        let mut control = MockInstanceControl::new();
        control
            .expect_start_instance()
            .with(eq(instance()))
            .times(1)
            .returning(|_| Ok(()));
        let dispatcher = dispatcher(control, MockWebsiteProbe::new());
        let sink = RecordingSink::default();

        dispatcher
            .on_command(&admin_event("server", "start"), &sink)
            .await;

        let replies = sink.replies.lock().unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content, "✅ Server start command successfully sent!");
        assert!(!replies[0].ephemeral);
    }

    #[tokio::test]
    async fn test_missing_role_denied_without_calls() {
        // Mocks without expectations panic if touched.
        let dispatcher = dispatcher(MockInstanceControl::new(), MockWebsiteProbe::new());
        let sink = RecordingSink::default();
        let event = CommandEvent {
            principal: Principal::Member {
                user_id: "u2".to_string(),
                roles: HashSet::from(["12".to_string()]),
            },
            ..admin_event("server", "stop")
        };

        dispatcher.on_command(&event, &sink).await;

        let replies = sink.replies.lock().unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(
            replies[0].content,
            "🚫 You need the required role to use this bot!"
        );
        assert!(replies[0].ephemeral);
    }

    #[tokio::test]
    async fn test_unresolved_principal_denied_without_calls() {
        let dispatcher = dispatcher(MockInstanceControl::new(), MockWebsiteProbe::new());
        let sink = RecordingSink::default();
        let event = CommandEvent {
            principal: Principal::Unresolved {
                user_id: "u3".to_string(),
            },
            ..admin_event("server", "start")
        };

        dispatcher.on_command(&event, &sink).await;

        let replies = sink.replies.lock().unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content, "🚫 Unable to verify your permissions!");
        assert!(replies[0].ephemeral);
    }

    #[tokio::test]
    async fn test_stop_and_reboot_routes() {
        let mut control = MockInstanceControl::new();
        control
            .expect_stop_instance()
            .with(eq(instance()))
            .times(1)
            .returning(|_| Ok(()));
        control
            .expect_reboot_instance()
            .with(eq(instance()))
            .times(1)
            .returning(|_| Ok(()));
        let dispatcher = dispatcher(control, MockWebsiteProbe::new());

        let stop = dispatcher.dispatch(&admin_event("server", "stop")).await;
        assert_eq!(stop.content, messages::SERVER_STOP_SENT);

        let reboot = dispatcher.dispatch(&admin_event("server", "reboot")).await;
        assert_eq!(reboot.content, messages::SERVER_REBOOT_SENT);
    }

    #[tokio::test]
    async fn test_status_embeds_state() {
        let mut control = MockInstanceControl::new();
        control
            .expect_get_instance_state()
            .with(eq(instance()))
            .times(1)
            .returning(|_| Ok(InstanceState::new("running")));
        let dispatcher = dispatcher(control, MockWebsiteProbe::new());

        let reply = dispatcher.dispatch(&admin_event("server", "status")).await;

        assert!(reply.content.contains("running"));
        assert_eq!(reply.content, "Current Instance state: running");
    }

    #[tokio::test]
    async fn test_check_website_outcomes() {
        let mut probe = MockWebsiteProbe::new();
        let mut outcomes = vec![
            ProbeOutcome::Unreachable("dns error: no such host".to_string()),
            ProbeOutcome::UnexpectedStatus(404),
            ProbeOutcome::Up,
        ];
        probe
            .expect_check()
            .with(eq(URL))
            .times(3)
            .returning(move |_| outcomes.pop().unwrap());
        let dispatcher = dispatcher(MockInstanceControl::new(), probe);
        let event = admin_event("server", "check-website");

        let up = dispatcher.dispatch(&event).await;
        assert_eq!(up.content, "✅ Website is up returned a 200 success code!");

        let not_found = dispatcher.dispatch(&event).await;
        assert!(not_found.content.starts_with("⚠️"));
        assert!(not_found.content.contains("404"));

        let down = dispatcher.dispatch(&event).await;
        assert!(down.content.starts_with("❌ Failed to reach the website"));
        assert!(down.content.contains("dns error: no such host"));
    }

    #[tokio::test]
    async fn test_bot_status_makes_no_calls() {
        let dispatcher = dispatcher(MockInstanceControl::new(), MockWebsiteProbe::new());
        let reply = dispatcher.dispatch(&admin_event("bot", "status")).await;
        assert_eq!(reply.content, "🟢 Bot is running normally!");
    }

    #[tokio::test]
    async fn test_unknown_pair_gets_fixed_reply() {
        let dispatcher = dispatcher(MockInstanceControl::new(), MockWebsiteProbe::new());
        let sink = RecordingSink::default();

        dispatcher
            .on_command(&admin_event("bot", "reboot"), &sink)
            .await;
        let event = CommandEvent {
            group: None,
            ..admin_event("server", "start")
        };
        dispatcher.on_command(&event, &sink).await;

        let replies = sink.replies.lock().unwrap();
        assert_eq!(replies.len(), 2);
        assert!(replies.iter().all(|r| r.content == messages::UNKNOWN_COMMAND));
    }

    #[tokio::test]
    async fn test_client_error_becomes_single_failure_reply() {
        let mut control = MockInstanceControl::new();
        control.expect_start_instance().times(1).returning(|_| {
            Err(ControlError::provider(
                "StartInstance",
                "ThrottlingException: Rate exceeded",
            ))
        });
        let dispatcher = dispatcher(control, MockWebsiteProbe::new());
        let sink = RecordingSink::default();

        dispatcher
            .on_command(&admin_event("server", "start"), &sink)
            .await;

        let replies = sink.replies.lock().unwrap();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].content.contains("ThrottlingException"));
        assert_eq!(
            replies[0].content,
            "❌ Command failed: ThrottlingException: Rate exceeded"
        );
    }

    #[tokio::test]
    async fn test_every_operation_failure_is_reported() {
        let mut control = MockInstanceControl::new();
        control
            .expect_stop_instance()
            .returning(|_| Err(ControlError::provider("StopInstance", "stop boom")));
        control
            .expect_reboot_instance()
            .returning(|_| Err(ControlError::provider("RebootInstance", "reboot boom")));
        control
            .expect_get_instance_state()
            .returning(|_| Err(ControlError::MissingState));
        let dispatcher = dispatcher(control, MockWebsiteProbe::new());

        for (sub, text) in [
            ("stop", "stop boom"),
            ("reboot", "reboot boom"),
            ("status", "Failed to get instance state"),
        ] {
            let reply = dispatcher.dispatch(&admin_event("server", sub)).await;
            assert_eq!(reply.content, messages::command_failed(text));
        }
    }

    #[test]
    fn test_route_table() {
        assert_eq!(Route::resolve(Some("server"), Some("start")), Route::ServerStart);
        assert_eq!(
            Route::resolve(Some("server"), Some("check-website")),
            Route::CheckWebsite
        );
        assert_eq!(Route::resolve(Some("bot"), Some("status")), Route::BotStatus);
        assert_eq!(Route::resolve(Some("bot"), Some("start")), Route::Unknown);
        assert_eq!(Route::resolve(None, Some("status")), Route::Unknown);
        assert_eq!(Route::resolve(Some("server"), None), Route::Unknown);
    }
}
