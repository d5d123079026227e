use anyhow::Result;
use colored::Colorize;

use pitchdesk_application::flow::format::channel_card;

use crate::bootstrap::Bootstrap;

pub async fn run(app: &Bootstrap, query: &str, limit: Option<usize>) -> Result<()> {
    let radar = app.radar()?;
    let limit = limit.unwrap_or(app.config.search.result_limit);

    println!("{}", format!("Ищу каналы: {query}...").bright_black());
    let channels = radar.search_channels_limited(query, limit).await?;

    if channels.is_empty() {
        println!("{}", format!("По запросу «{query}» ничего не нашлось.").yellow());
        return Ok(());
    }

    let total = channels.len();
    for (index, channel) in channels.iter().enumerate() {
        println!();
        for line in channel_card(channel, index, total).lines() {
            println!("{}", line.bright_blue());
        }
    }
    Ok(())
}
