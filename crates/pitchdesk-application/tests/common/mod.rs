#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use pitchdesk_application::flow::{Notice, Presenter, Screen, Session, Trigger, View};
use pitchdesk_application::{ComposerService, Dispatcher, RadarService};
use pitchdesk_core::channel::ChannelRepository;
use pitchdesk_core::generation::{
    GenerationError, GenerationGateway, GenerationRequest, TextGenerator,
};
use pitchdesk_core::profile::ProfileRepository;
use pitchdesk_core::search::{RawCandidate, SearchBackend};
use pitchdesk_core::template::TemplateRepository;
use pitchdesk_infrastructure::LocalStore;

pub const USER: &str = "user-1";

/// Replies with pre-scripted outcomes in order and records every request.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn push(&self, reply: Result<String, GenerationError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_ok(&self, text: &str) {
        self.push(Ok(text.to_string()));
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Unexpected("script exhausted".into())))
    }
}

/// Returns the same candidates for every query.
#[derive(Default)]
pub struct StaticSearch {
    results: Mutex<Vec<RawCandidate>>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StaticSearch {
    pub fn set_results(&self, results: Vec<RawCandidate>) {
        *self.results.lock().unwrap() = results;
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for StaticSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<RawCandidate> {
        self.queries.lock().unwrap().push((query.to_string(), limit));
        self.results.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Screen(Screen),
    Notice(Notice),
}

#[derive(Default)]
pub struct RecordingPresenter {
    outputs: Mutex<Vec<(String, Output)>>,
}

impl RecordingPresenter {
    pub fn outputs(&self) -> Vec<(String, Output)> {
        self.outputs.lock().unwrap().clone()
    }

    pub fn last_screen(&self) -> Screen {
        self.outputs()
            .into_iter()
            .rev()
            .find_map(|(_, output)| match output {
                Output::Screen(screen) => Some(screen),
                Output::Notice(_) => None,
            })
            .expect("no screen rendered")
    }

    pub fn last_view(&self) -> View {
        self.last_screen().view
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.outputs()
            .into_iter()
            .filter_map(|(_, output)| match output {
                Output::Notice(notice) => Some(notice),
                Output::Screen(_) => None,
            })
            .collect()
    }

    pub fn last_notice(&self) -> Notice {
        self.notices().pop().expect("no notice emitted")
    }

    pub fn clear(&self) {
        self.outputs.lock().unwrap().clear();
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn render(&self, user_id: &str, screen: Screen) {
        self.outputs
            .lock()
            .unwrap()
            .push((user_id.to_string(), Output::Screen(screen)));
    }

    async fn notify(&self, user_id: &str, notice: Notice) {
        self.outputs
            .lock()
            .unwrap()
            .push((user_id.to_string(), Output::Notice(notice)));
    }
}

/// Fully wired engine over the local store and scripted collaborators.
pub struct Harness {
    pub store: Arc<LocalStore>,
    pub generator: Arc<ScriptedGenerator>,
    pub search: Arc<StaticSearch>,
    pub presenter: Arc<RecordingPresenter>,
    pub composer: Arc<ComposerService>,
    pub radar: Arc<RadarService>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_page_size(5)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        let store = Arc::new(LocalStore::in_memory());
        let generator = Arc::new(ScriptedGenerator::default());
        let search = Arc::new(StaticSearch::default());
        let presenter = Arc::new(RecordingPresenter::default());

        let profiles: Arc<dyn ProfileRepository> = store.clone();
        let channels: Arc<dyn ChannelRepository> = store.clone();
        let templates: Arc<dyn TemplateRepository> = store.clone();

        let gateway =
            GenerationGateway::new(generator.clone()).with_timeout(Duration::from_secs(5));
        let composer = Arc::new(ComposerService::new(
            gateway,
            profiles.clone(),
            templates,
        ));
        let radar = Arc::new(RadarService::new(
            search.clone(),
            channels,
            profiles.clone(),
        ));
        let dispatcher = Dispatcher::new(
            composer.clone(),
            radar.clone(),
            profiles,
            presenter.clone(),
            page_size,
        );

        Self {
            store,
            generator,
            search,
            presenter,
            composer,
            radar,
            dispatcher,
        }
    }

    pub async fn send(&self, trigger: impl Into<Trigger>) {
        self.dispatcher
            .handle_event(USER, trigger.into())
            .await
            .expect("event handled");
    }

    pub async fn say(&self, text: &str) {
        self.send(Trigger::text(text)).await;
    }

    pub async fn session(&self) -> Option<Session> {
        self.dispatcher.session(USER).await
    }
}

pub fn channel_candidate(username: &str, title: &str) -> RawCandidate {
    RawCandidate::with_username(username).title(title)
}
