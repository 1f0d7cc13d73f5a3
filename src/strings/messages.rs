//! # Messages
//!
//! User-facing reply texts for every command outcome.

pub const UNABLE_TO_VERIFY: &str = "🚫 Unable to verify your permissions!";
pub const ROLE_REQUIRED: &str = "🚫 You need the required role to use this bot!";
pub const UNKNOWN_COMMAND: &str = "❓ Unknown command.";

pub const SERVER_START_SENT: &str = "✅ Server start command successfully sent!";
pub const SERVER_STOP_SENT: &str =
    "✅ Server stop command successfully sent, Please wait 5 minutes!";
pub const SERVER_REBOOT_SENT: &str =
    "✅ Server rebooted successfully, please wait 5 mins and check status again!";

pub const BOT_OPERATIONAL: &str = "🟢 Bot is running normally!";

pub const WEBSITE_UP: &str = "✅ Website is up returned a 200 success code!";

pub fn instance_state(state: &str) -> String {
    format!("Current Instance state: {state}")
}

pub fn website_unexpected_status(status: u16) -> String {
    format!("⚠️ Website returned a non-200 status code: \n{status}")
}

pub fn website_unreachable(err: &str) -> String {
    format!("❌ Failed to reach the website: \n{err}")
}

pub fn command_failed(err: &str) -> String {
    format!("❌ Command failed: {err}")
}
