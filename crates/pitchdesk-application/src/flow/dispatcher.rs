//! Event dispatcher.
//!
//! Each user owns one session slot guarded by an async mutex that is held
//! for the whole handling of an event, generation and search round trips
//! included. Events of the same user therefore queue up and run in arrival
//! order, while different users proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use pitchdesk_core::error::Result;
use pitchdesk_core::profile::ProfileRepository;

use super::compose::ComposeFlow;
use super::radar::RadarFlow;
use super::session::Session;
use super::trigger::{Action, Trigger};
use super::view::{Notice, Presenter};
use super::{FlowContext, main_menu_screen};
use crate::composer::ComposerService;
use crate::radar::RadarService;

type SessionSlot = Arc<Mutex<Option<Session>>>;

pub struct Dispatcher {
    compose: ComposeFlow,
    radar: RadarFlow,
    profiles: Arc<dyn ProfileRepository>,
    presenter: Arc<dyn Presenter>,
    sessions: Mutex<HashMap<String, SessionSlot>>,
}

impl Dispatcher {
    /// Builds the engine. `page_size` applies to template and connection lists.
    pub fn new(
        composer: Arc<ComposerService>,
        radar: Arc<RadarService>,
        profiles: Arc<dyn ProfileRepository>,
        presenter: Arc<dyn Presenter>,
        page_size: usize,
    ) -> Self {
        Self {
            compose: ComposeFlow::new(composer, page_size),
            radar: RadarFlow::new(radar, page_size),
            profiles,
            presenter,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    async fn slot(&self, user_id: &str) -> SessionSlot {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// Handles one inbound event for `user_id`.
    ///
    /// Generation failures are resolved inside the flows. A data store error
    /// aborts the event and leaves the session as it was before the event.
    pub async fn handle_event(&self, user_id: &str, trigger: Trigger) -> Result<()> {
        let slot = self.slot(user_id).await;
        let mut session = slot.lock().await;

        self.profiles.get_or_create_user(user_id).await?;

        let ctx = FlowContext {
            user_id,
            presenter: self.presenter.as_ref(),
        };
        let current = session.clone();
        let from = current.as_ref().map(Session::state_name).unwrap_or("menu");

        let next = match trigger {
            Trigger::Action(Action::MainMenu) => {
                ctx.render(main_menu_screen()).await;
                None
            }
            Trigger::Action(Action::Compose(action)) => {
                self.compose.handle_action(&ctx, current, action).await?
            }
            Trigger::Action(Action::Radar(action)) => {
                self.radar.handle_action(&ctx, current, action).await?
            }
            Trigger::Text(text) => match current {
                Some(Session::Compose(state)) => self.compose.handle_text(&ctx, state, &text).await?,
                Some(Session::Radar(state)) => self.radar.handle_text(&ctx, state, &text).await?,
                None => {
                    ctx.notify(Notice::alert("Выбери действие в меню")).await;
                    ctx.render(main_menu_screen()).await;
                    None
                }
            },
        };

        let to = next.as_ref().map(Session::state_name).unwrap_or("menu");
        tracing::debug!(user_id, from, to, "event handled");
        *session = next;
        Ok(())
    }

    /// Snapshot of the user's session, waiting for any in-flight event.
    pub async fn session(&self, user_id: &str) -> Option<Session> {
        let slot = self.slot(user_id).await;
        let session = slot.lock().await;
        session.clone()
    }

    /// Replaces the user's session, e.g. when resuming a saved conversation.
    pub async fn restore_session(&self, user_id: &str, session: Option<Session>) {
        let slot = self.slot(user_id).await;
        *slot.lock().await = session;
    }
}
