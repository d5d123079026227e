//! Terminal presenter: prints screens with numbered actions.

use async_trait::async_trait;
use colored::Colorize;
use tokio::sync::Mutex;

use pitchdesk_application::flow::format::{channel_card, connection_detail, kind_label};
use pitchdesk_application::flow::view::describe_generation_error;
use pitchdesk_application::flow::{
    Action, Activity, Notice, NoticeLevel, Presenter, Screen, VacancyStage, View,
};

/// Presenter for a single local user. Remembers the actions of the last
/// rendered screen so the REPL can resolve a typed number.
#[derive(Default)]
pub struct ConsolePresenter {
    actions: Mutex<Vec<Action>>,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Action behind the 1-based `number` shown on the last screen.
    pub async fn action(&self, number: usize) -> Option<Action> {
        let actions = self.actions.lock().await;
        number
            .checked_sub(1)
            .and_then(|index| actions.get(index))
            .cloned()
    }
}

#[async_trait]
impl Presenter for ConsolePresenter {
    async fn render(&self, _user_id: &str, screen: Screen) {
        println!();
        for line in view_text(&screen.view).lines() {
            println!("{}", line.bright_blue());
        }
        if !screen.actions.is_empty() {
            println!();
        }
        for (index, option) in screen.actions.iter().enumerate() {
            println!("  {} {}", format!("[{}]", index + 1).bright_magenta(), option.label);
        }
        if screen.accepts_text {
            println!("{}", "(можно ответить текстом)".bright_black());
        }

        *self.actions.lock().await = screen.actions.into_iter().map(|o| o.action).collect();
    }

    async fn notify(&self, _user_id: &str, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.text.green()),
            NoticeLevel::Alert => println!("{}", notice.text.yellow()),
        }
    }
}

fn view_text(view: &View) -> String {
    match view {
        View::MainMenu => "Главное меню".to_string(),
        View::ComposeMenu { .. } => "Что составим?".to_string(),
        View::BroadcastIntake { length } => format!(
            "Опиши, кого ищешь и что предлагаешь, или сгенерируй текст по профилю.\nДлина: {}",
            length.label()
        ),
        View::VacancyIntake { stage } => match stage {
            VacancyStage::AwaitingPosting => "Вставь текст вакансии.",
            VacancyStage::PostingReceived => {
                "Вакансия получена. Добавь детали о себе или сгенерируй отклик."
            }
            VacancyStage::DetailsReceived => "Детали добавлены. Можно дописать ещё или сгенерировать.",
        }
        .to_string(),
        View::Progress(activity) => match activity {
            Activity::Generating => "Генерирую...".to_string(),
            Activity::Refining => "Дорабатываю...".to_string(),
            Activity::Searching { query } => format!("Ищу каналы: {query}..."),
        },
        View::Draft { kind, text } => format!(
            "{}:\n\n{}\n\nНапиши, что изменить, или выбери действие.",
            kind_label(*kind),
            text
        ),
        View::GenerationFailed { error } => describe_generation_error(error).to_string(),
        View::Templates(page) => format!(
            "Мои шаблоны (стр. {}/{}, всего {})",
            page.page + 1,
            page.total_pages,
            page.total_items
        ),
        View::NoTemplates => "Шаблонов пока нет.".to_string(),
        View::TemplateDetail { template } => {
            format!("{}\n\n{}", kind_label(template.kind), template.content)
        }
        View::RadarMenu {
            linked_count,
            has_profile_keywords,
        } => {
            let mut text = format!("Радар каналов\nПодключено каналов: {linked_count}");
            if !has_profile_keywords {
                text.push_str("\nДобавь ключевые слова в профиль, чтобы искать по нему.");
            }
            text
        }
        View::SearchPrompt => "Введи поисковый запрос.".to_string(),
        View::NoResults { query } => format!("По запросу «{query}» ничего не нашлось."),
        View::ChannelCard {
            channel,
            index,
            total,
        } => channel_card(channel, *index, *total),
        View::SearchFinished { reviewed } => format!("Просмотрено каналов: {reviewed}."),
        View::Connections(page) => format!(
            "Мои каналы (стр. {}/{}, всего {})",
            page.page + 1,
            page.total_pages,
            page.total_items
        ),
        View::NoConnections => "Подключённых каналов нет.".to_string(),
        View::ConnectionDetail { linked } => connection_detail(linked),
    }
}
