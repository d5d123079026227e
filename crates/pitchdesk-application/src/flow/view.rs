//! Presentation contract.
//!
//! After every transition the flows hand a [`Screen`] to the [`Presenter`]:
//! a typed [`View`] with the data to show plus the enumerated actions the
//! user may pick next. Short-lived messages that do not replace the screen
//! go through [`Presenter::notify`].

use async_trait::async_trait;

use pitchdesk_core::channel::{Channel, LinkedChannel};
use pitchdesk_core::generation::GenerationError;
use pitchdesk_core::template::{MessageKind, Template};

use super::trigger::Action;
use crate::prompts::MessageLength;

#[async_trait]
pub trait Presenter: Send + Sync {
    async fn render(&self, user_id: &str, screen: Screen);

    async fn notify(&self, user_id: &str, notice: Notice);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub view: View,
    pub actions: Vec<ActionOption>,
    /// Whether free text is meaningful on this screen.
    pub accepts_text: bool,
}

impl Screen {
    pub fn new(view: View) -> Self {
        Self {
            view,
            actions: Vec::new(),
            accepts_text: false,
        }
    }

    pub fn action(mut self, label: impl Into<String>, action: Action) -> Self {
        self.actions.push(ActionOption {
            label: label.into(),
            action,
        });
        self
    }

    pub fn with_text_input(mut self) -> Self {
        self.accepts_text = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOption {
    pub label: String,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    MainMenu,
    ComposeMenu {
        has_templates: bool,
    },
    BroadcastIntake {
        length: MessageLength,
    },
    VacancyIntake {
        stage: VacancyStage,
    },
    /// Shown while a network round trip is in flight.
    Progress(Activity),
    Draft {
        kind: MessageKind,
        text: String,
    },
    /// An entry generation failed and the session was discarded.
    GenerationFailed {
        error: GenerationError,
    },
    Templates(Page<Template>),
    NoTemplates,
    TemplateDetail {
        template: Template,
    },
    RadarMenu {
        linked_count: usize,
        has_profile_keywords: bool,
    },
    SearchPrompt,
    NoResults {
        query: String,
    },
    ChannelCard {
        channel: Channel,
        /// Zero-based position of the card.
        index: usize,
        total: usize,
    },
    SearchFinished {
        reviewed: usize,
    },
    Connections(Page<LinkedChannel>),
    NoConnections,
    ConnectionDetail {
        linked: LinkedChannel,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VacancyStage {
    AwaitingPosting,
    PostingReceived,
    DetailsReceived,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    Generating,
    Refining,
    Searching { query: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    /// A precondition was not met; nothing changed.
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Alert,
            text: text.into(),
        }
    }
}

/// One page of a longer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page number, clamped to the last page.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Slices `items` into the requested page of `page_size` entries.
    pub fn paginate(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(page_size).max(1);
        let page = page.min(total_pages - 1);

        let items = items
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .collect();

        Self {
            items,
            page,
            total_pages,
            total_items,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

/// User-facing explanation of a generation failure.
pub fn describe_generation_error(error: &GenerationError) -> &'static str {
    match error {
        GenerationError::Timeout => "Модель не ответила вовремя. Попробуй ещё раз.",
        GenerationError::RateLimited { .. } => "Слишком много запросов. Подожди немного и повтори.",
        GenerationError::ConnectionFailed(_) => "Нет связи с сервисом генерации. Попробуй позже.",
        GenerationError::EmptyResponse => "Модель вернула пустой ответ. Попробуй ещё раз.",
        GenerationError::Unexpected(_) | GenerationError::NoVariants { .. } => {
            "Не удалось сгенерировать текст. Попробуй позже."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_and_clamp() {
        let page = Page::paginate((1..=12).collect::<Vec<_>>(), 1, 5);
        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev() && page.has_next());

        let last = Page::paginate((1..=12).collect::<Vec<_>>(), 9, 5);
        assert_eq!(last.page, 2);
        assert_eq!(last.items, vec![11, 12]);
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginate_empty() {
        let page = Page::<u8>::paginate(Vec::new(), 0, 5);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_prev() && !page.has_next());
    }
}
