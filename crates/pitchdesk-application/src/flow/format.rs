//! Plain-text formatting shared by front-ends.

use pitchdesk_core::channel::{Channel, ChannelPurpose, LinkedChannel};
use pitchdesk_core::template::{MessageKind, Template};

const UNTITLED: &str = "Без названия";
const CARD_DESCRIPTION_LIMIT: usize = 200;
const TEMPLATE_PREVIEW_LIMIT: usize = 35;
const CONNECTION_LABEL_LIMIT: usize = 45;

pub fn purpose_label(purpose: ChannelPurpose) -> &'static str {
    match purpose {
        ChannelPurpose::Broadcast => "Рассылка",
        ChannelPurpose::Vacancies => "Вакансии",
        ChannelPurpose::Both => "Рассылка + Вакансии",
    }
}

pub fn kind_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Broadcast => "Рассылка",
        MessageKind::Vacancy => "Отклик",
    }
}

/// `[R]` for broadcasts, `[O]` for vacancy responses.
pub fn kind_marker(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Broadcast => "[R]",
        MessageKind::Vacancy => "[O]",
    }
}

/// Subscriber count with space-separated thousands, or a dash when unknown.
pub fn format_subscribers(count: Option<u64>) -> String {
    let Some(count) = count.filter(|c| *c > 0) else {
        return "—".to_string();
    };

    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let head: String = text.chars().take(limit).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Body of a candidate card at zero-based `index` out of `total`.
pub fn channel_card(channel: &Channel, index: usize, total: usize) -> String {
    let title = channel
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(UNTITLED);

    let mut text = format!(
        "Канал {}/{}\n\n{}\n@{}\n",
        index + 1,
        total,
        title,
        channel.username
    );
    if let Some(description) = channel.description.as_deref().filter(|d| !d.is_empty()) {
        text.push_str(&format!(
            "\n{}\n",
            truncate_chars(description, CARD_DESCRIPTION_LIMIT)
        ));
    }
    text.push_str(&format!(
        "\nПодписчиков: {}",
        format_subscribers(channel.subscribers_count)
    ));
    if let Some(category) = channel.category.as_deref().filter(|c| !c.is_empty()) {
        text.push_str(&format!("\nКатегория: {category}"));
    }
    text
}

/// One-line list entry for a template: kind marker plus a short preview.
pub fn template_preview(template: &Template) -> String {
    let flat = template.content.replace('\n', " ");
    format!(
        "{} {}",
        kind_marker(template.kind),
        truncate_chars(&flat, TEMPLATE_PREVIEW_LIMIT)
    )
}

/// One-line list entry for a connection: title and purpose.
pub fn connection_label(linked: &LinkedChannel) -> String {
    let label = format!(
        "{} [{}]",
        linked.channel.display_title(),
        purpose_label(linked.link.purpose)
    );
    if label.chars().count() > CONNECTION_LABEL_LIMIT {
        let head: String = label.chars().take(CONNECTION_LABEL_LIMIT - 3).collect();
        format!("{head}...")
    } else {
        label
    }
}

/// Detail text for a connection.
pub fn connection_detail(linked: &LinkedChannel) -> String {
    format!(
        "{}\n@{}\n\nПодписчиков: {}\nНазначение: {}",
        linked.channel.display_title(),
        linked.channel.username,
        format_subscribers(linked.channel.subscribers_count),
        purpose_label(linked.link.purpose)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(title: Option<&str>, description: Option<String>) -> Channel {
        Channel {
            id: "c1".into(),
            username: "python_jobs".into(),
            title: title.map(str::to_string),
            description,
            subscribers_count: Some(12345),
            category: Some("Работа".into()),
            source: "search".into(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_format_subscribers() {
        assert_eq!(format_subscribers(Some(1234567)), "1 234 567");
        assert_eq!(format_subscribers(Some(999)), "999");
        assert_eq!(format_subscribers(None), "—");
        assert_eq!(format_subscribers(Some(0)), "—");
    }

    #[test]
    fn test_channel_card_layout() {
        let card = channel_card(&channel(Some("Python Jobs"), None), 0, 3);
        assert_eq!(
            card,
            "Канал 1/3\n\nPython Jobs\n@python_jobs\n\nПодписчиков: 12 345\nКатегория: Работа"
        );
    }

    #[test]
    fn test_channel_card_truncates_description_and_titles_untitled() {
        let card = channel_card(&channel(None, Some("д".repeat(250))), 1, 2);
        assert!(card.contains("Без названия"));
        assert!(card.contains(&format!("{}...", "д".repeat(200))));
        assert!(!card.contains(&"д".repeat(201)));
    }

    #[test]
    fn test_template_preview() {
        let template = Template {
            id: "t1".into(),
            user_id: "u1".into(),
            kind: MessageKind::Vacancy,
            content: "Здравствуйте!\nГотов взяться за ваш проект по редизайну сайта".into(),
            created_at: String::new(),
        };
        let preview = template_preview(&template);
        assert!(preview.starts_with("[O] Здравствуйте! Готов"));
        assert!(preview.ends_with("..."));
    }
}
