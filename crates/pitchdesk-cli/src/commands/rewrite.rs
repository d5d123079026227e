use anyhow::{Context, Result, bail};
use colored::Colorize;

use pitchdesk_core::channel::ChannelRepository;

use crate::bootstrap::Bootstrap;

pub async fn run(
    app: &Bootstrap,
    text: &str,
    variants: usize,
    channel: Option<&str>,
) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Nothing to rewrite: the text is empty");
    }

    let channel = match channel {
        Some(username) => {
            let username = username.trim_start_matches('@');
            let found = app.channels().find_by_username(username).await?;
            Some(found.with_context(|| format!("Channel @{username} is not in the catalog"))?)
        }
        None => None,
    };

    let composer = app.composer()?;
    let texts = if variants <= 1 {
        vec![composer.rewrite(text, channel.as_ref()).await?]
    } else {
        composer
            .rewrite_variants(text, channel.as_ref(), variants)
            .await?
    };

    for (index, variant) in texts.iter().enumerate() {
        if texts.len() > 1 {
            println!("{}", format!("--- Вариант {} ---", index + 1).bright_magenta());
        }
        println!("{variant}");
    }
    Ok(())
}
