//! Paraphrase prompt used to make every sent copy of a message unique.

use pitchdesk_core::channel::Channel;

const CHANNEL_DESCRIPTION_LIMIT: usize = 200;

const REWRITE_SYSTEM: &str = "Ты — копирайтер-рерайтер. Твоя задача — переписать текст так, \
чтобы он сохранил смысл и посыл, но отличался по формулировкам.\n\n\
ПРАВИЛА:\n\
1. Сохрани основной смысл и призыв к действию.\n\
2. Измени порядок предложений, замени синонимами, перефразируй.\n\
3. Сохрани длину — не делай текст значительно длиннее или короче.\n\
4. Сохрани тон и стиль оригинала.\n\
5. НЕ добавляй новую информацию, которой нет в оригинале.\n\
6. НЕ удаляй ключевую информацию (контакты, навыки, предложение).\n\
7. Результат должен выглядеть как новое сообщение, а не как правка старого.\n\
8. Отвечай ТОЛЬКО текстом переписанного сообщения, без пояснений.";

/// What the rewrite needs to know about the target channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelInfo {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<&Channel> for ChannelInfo {
    fn from(channel: &Channel) -> Self {
        let title = channel
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| Some(channel.username.clone()));
        Self {
            title,
            description: channel.description.clone(),
        }
    }
}

/// A system/user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePrompt {
    pub system: String,
    pub user: String,
}

pub fn rewrite_prompt(original_text: &str, channel: Option<&ChannelInfo>) -> RewritePrompt {
    let mut parts = vec![
        "ОРИГИНАЛЬНЫЙ ТЕКСТ:".to_string(),
        original_text.trim().to_string(),
    ];

    if let Some(channel) = channel {
        if let Some(title) = channel.title.as_deref().filter(|t| !t.trim().is_empty()) {
            parts.push(format!("\nЦелевой канал: {title}"));
        }
        if let Some(description) = channel
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            let capped: String = description.chars().take(CHANNEL_DESCRIPTION_LIMIT).collect();
            parts.push(format!("Описание канала: {capped}"));
        }
        parts.push("Адаптируй текст под тематику канала, если уместно.".to_string());
    }

    parts.push("\nПерепиши этот текст, сохранив смысл.".to_string());

    RewritePrompt {
        system: REWRITE_SYSTEM.to_string(),
        user: parts.join("\n"),
    }
}
