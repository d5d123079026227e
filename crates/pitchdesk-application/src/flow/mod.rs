//! Conversation engine.
//!
//! - `trigger`: typed inbound events and their token encoding
//! - `session`: per-user state as a tagged union
//! - `view`: screens, notices and the `Presenter` contract
//! - `compose` / `radar`: the two state machines
//! - `dispatcher`: routes events and serialises them per user

pub mod compose;
pub mod dispatcher;
pub mod format;
pub mod radar;
pub mod session;
pub mod trigger;
pub mod view;

pub use compose::ComposeFlow;
pub use dispatcher::Dispatcher;
pub use radar::RadarFlow;
pub use session::{ComposeSession, RadarSession, Session};
pub use trigger::{Action, ComposeAction, QuickRefine, RadarAction, Trigger, TriggerParseError};
pub use view::{
    ActionOption, Activity, Notice, NoticeLevel, Page, Presenter, Screen, VacancyStage, View,
};

/// Who the current event belongs to and where its output goes.
pub(crate) struct FlowContext<'a> {
    pub user_id: &'a str,
    pub presenter: &'a dyn Presenter,
}

impl FlowContext<'_> {
    pub async fn render(&self, screen: Screen) {
        self.presenter.render(self.user_id, screen).await;
    }

    pub async fn notify(&self, notice: Notice) {
        self.presenter.notify(self.user_id, notice).await;
    }
}

pub(crate) fn main_menu_screen() -> Screen {
    Screen::new(View::MainMenu)
        .action("Составить текст", Action::Compose(ComposeAction::Menu))
        .action("Радар", Action::Radar(RadarAction::Menu))
}
