//! # Command Schema
//!
//! Platform-neutral declaration of the `/gfcbot` slash command tree.
//! The Discord adapter turns this into serenity builders.

pub const ROOT_COMMAND: &str = "gfcbot";

pub const GROUP_SERVER: &str = "server";
pub const GROUP_BOT: &str = "bot";

pub const SUB_START: &str = "start";
pub const SUB_STOP: &str = "stop";
pub const SUB_REBOOT: &str = "reboot";
pub const SUB_STATUS: &str = "status";
pub const SUB_CHECK_WEBSITE: &str = "check-website";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub groups: Vec<GroupSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub subcommands: Vec<SubcommandSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcommandSpec {
    pub name: &'static str,
    pub description: &'static str,
}

const fn sub(name: &'static str, description: &'static str) -> SubcommandSpec {
    SubcommandSpec { name, description }
}

/// Full command set registered in the guild, as one unit.
pub fn command_schema() -> Vec<CommandSpec> {
    vec![CommandSpec {
        name: ROOT_COMMAND,
        description: "GFC Bot commands",
        groups: vec![
            GroupSpec {
                name: GROUP_SERVER,
                description: "Manage the server",
                subcommands: vec![
                    sub(SUB_START, "Start the server"),
                    sub(SUB_STOP, "Stop the server"),
                    sub(SUB_REBOOT, "Reboot the server"),
                    sub(SUB_STATUS, "Get server status"),
                    sub(
                        SUB_CHECK_WEBSITE,
                        "Check if the website is returning a 200 success code",
                    ),
                ],
            },
            GroupSpec {
                name: GROUP_BOT,
                description: "Bot management commands",
                subcommands: vec![sub(SUB_STATUS, "Check bot status")],
            },
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let schema = command_schema();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema[0].name, ROOT_COMMAND);

        let groups: Vec<_> = schema[0].groups.iter().map(|g| g.name).collect();
        assert_eq!(groups, vec![GROUP_SERVER, GROUP_BOT]);

        let server: Vec<_> = schema[0].groups[0].subcommands.iter().map(|s| s.name).collect();
        assert_eq!(
            server,
            vec![SUB_START, SUB_STOP, SUB_REBOOT, SUB_STATUS, SUB_CHECK_WEBSITE]
        );
        assert_eq!(schema[0].groups[1].subcommands.len(), 1);
    }

    #[test]
    fn test_descriptions_fit_discord_limits() {
        // Discord rejects names over 32 chars and descriptions over 100.
        for command in command_schema() {
            for group in &command.groups {
                assert!(group.name.len() <= 32);
                assert!(group.description.len() <= 100);
                for sub in &group.subcommands {
                    assert!(sub.name.len() <= 32);
                    assert!(!sub.description.is_empty() && sub.description.len() <= 100);
                }
            }
        }
    }
}
