//! Channel identity resolution from public Telegram links.

use once_cell::sync::Lazy;
use regex::Regex;

static CHANNEL_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"t\.me/(?:s/)?([a-zA-Z]\w{3,})").expect("channel link pattern is valid")
});

/// Path segments on `t.me` that are service pages rather than channels.
const SERVICE_PAGES: [&str; 5] = ["s", "addstickers", "joinchat", "addtheme", "proxy"];

/// Extracts the channel username from a `t.me/<name>` or `t.me/s/<name>` link.
///
/// Returns `None` for links without a channel name and for service pages.
pub fn username_from_link(link: &str) -> Option<String> {
    let username = CHANNEL_LINK.captures(link)?.get(1)?.as_str();
    if SERVICE_PAGES.contains(&username.to_lowercase().as_str()) {
        return None;
    }
    Some(username.to_string())
}
