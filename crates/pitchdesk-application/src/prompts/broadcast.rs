//! Outreach message prompts.

use strum::{Display, EnumString};

use pitchdesk_core::profile::User;

use super::profile::profile_lines;

/// Target size of a broadcast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MessageLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl MessageLength {
    /// Label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "Короткое",
            Self::Medium => "Среднее",
            Self::Long => "Длинное",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Self::Short => "Длина: 2-3 предложения, не больше 300 символов.",
            Self::Medium => "Длина: 4-6 предложений, примерно 500-700 символов.",
            Self::Long => {
                "Длина: развёрнутое сообщение на 8-12 предложений, до 1500 символов, \
                 с перечнем услуг и преимуществ."
            }
        }
    }
}

/// System instructions for an outreach message of the given length.
pub fn broadcast_system(length: MessageLength) -> String {
    format!(
        "Ты — опытный копирайтер, который пишет продающие сообщения для фрилансеров. \
         Сообщение будет опубликовано в Telegram-каналах и чатах, где ищут исполнителей.\n\n\
         ПРАВИЛА:\n\
         1. Обязательно сохрани призыв к действию: как связаться и что сделать дальше.\n\
         2. Пиши живым языком, избегай шаблонных фраз, меняй формулировки.\n\
         3. НЕ выдумывай факты: опыт, цены, кейсы и контакты бери только из диалога.\n\
         4. {length}\n\
         5. Если пользователь просит доработать текст, учитывай всю историю диалога.\n\
         6. Отвечай ТОЛЬКО текстом сообщения, без пояснений.",
        length = length.instruction()
    )
}

/// Seed user turn describing the profile, used when generating without chat input.
pub fn broadcast_context(user: &User) -> String {
    format!(
        "Составь сообщение для рассылки на основе моего профиля.\n\n{}",
        profile_lines(user)
    )
}
