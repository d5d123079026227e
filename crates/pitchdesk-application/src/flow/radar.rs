//! Radar state machine: search, card-by-card review, connection management.
//!
//! Only the search and review steps keep a session. Listing, detail,
//! purpose changes and unlinking are single request/response operations.

use std::sync::Arc;

use strum::IntoEnumIterator;

use pitchdesk_core::channel::{Channel, ChannelPurpose, LinkedChannel};
use pitchdesk_core::error::Result;

use super::FlowContext;
use super::format::{connection_label, purpose_label};
use super::session::{RadarSession, Session};
use super::trigger::{Action, RadarAction};
use super::view::{Activity, Notice, Page, Screen, View};
use crate::radar::RadarService;

pub struct RadarFlow {
    radar: Arc<RadarService>,
    page_size: usize,
}

impl RadarFlow {
    pub fn new(radar: Arc<RadarService>, page_size: usize) -> Self {
        Self {
            radar,
            page_size: page_size.max(1),
        }
    }

    pub(crate) async fn handle_action(
        &self,
        ctx: &FlowContext<'_>,
        session: Option<Session>,
        action: RadarAction,
    ) -> Result<Option<Session>> {
        let (current, unrelated) = match session {
            Some(Session::Radar(state)) => (Some(state), None),
            other => (None, other),
        };

        match (action, current) {
            (RadarAction::Menu, _) => {
                self.show_menu(ctx).await?;
                Ok(None)
            }
            (RadarAction::StartSearch, _) => {
                ctx.render(search_prompt_screen()).await;
                Ok(Some(RadarSession::Searching.into()))
            }
            (RadarAction::ProfileSearch, current) => {
                match self.radar.profile_query(ctx.user_id).await? {
                    Some(query) => self.run_search(ctx, &query).await,
                    None => {
                        ctx.notify(Notice::alert("В профиле нет ключевых слов"))
                            .await;
                        Ok(current.map(Session::Radar).or(unrelated))
                    }
                }
            }
            (
                RadarAction::Link {
                    channel_id,
                    purpose,
                },
                Some(RadarSession::Browsing {
                    candidates,
                    current_index,
                }),
            ) => {
                let on_card = candidates
                    .get(current_index)
                    .is_some_and(|channel| channel.id == channel_id);
                if !on_card {
                    ctx.notify(Notice::alert("Эта карточка уже неактуальна")).await;
                    return Ok(Some(
                        RadarSession::Browsing {
                            candidates,
                            current_index,
                        }
                        .into(),
                    ));
                }

                let link = self
                    .radar
                    .link_channel(ctx.user_id, &channel_id, purpose)
                    .await?;
                ctx.notify(Notice::info(format!(
                    "Канал подключён: {}",
                    purpose_label(link.purpose)
                )))
                .await;
                Ok(advance(ctx, candidates, current_index).await)
            }
            (
                RadarAction::Skip,
                Some(RadarSession::Browsing {
                    candidates,
                    current_index,
                }),
            ) => Ok(advance(ctx, candidates, current_index).await),
            (RadarAction::Connections { page }, _) => {
                self.show_connections(ctx, page).await?;
                Ok(None)
            }
            (RadarAction::ConnectionDetail { link_id }, _) => {
                match self.radar.linked_channel(ctx.user_id, &link_id).await? {
                    Some(linked) => ctx.render(connection_detail_screen(linked)).await,
                    None => ctx.notify(Notice::alert("Канал не найден")).await,
                }
                Ok(None)
            }
            (RadarAction::ChangePurpose { link_id, purpose }, _) => {
                if self
                    .radar
                    .linked_channel(ctx.user_id, &link_id)
                    .await?
                    .is_none()
                {
                    ctx.notify(Notice::alert("Канал не найден")).await;
                    return Ok(None);
                }
                let link = self.radar.change_purpose(&link_id, purpose).await?;
                ctx.notify(Notice::info(format!(
                    "Назначение изменено: {}",
                    purpose_label(link.purpose)
                )))
                .await;
                self.show_connections(ctx, 0).await?;
                Ok(None)
            }
            (RadarAction::Unlink { channel_id }, _) => {
                self.radar.unlink_channel(ctx.user_id, &channel_id).await?;
                ctx.notify(Notice::info("Канал отключён")).await;
                self.show_connections(ctx, 0).await?;
                Ok(None)
            }
            (action, current) => {
                tracing::debug!(
                    user_id = ctx.user_id,
                    ?action,
                    "radar action not available in current state"
                );
                ctx.notify(Notice::alert("Это действие сейчас недоступно")).await;
                Ok(current.map(Session::Radar).or(unrelated))
            }
        }
    }

    pub(crate) async fn handle_text(
        &self,
        ctx: &FlowContext<'_>,
        state: RadarSession,
        text: &str,
    ) -> Result<Option<Session>> {
        match state {
            RadarSession::Searching => {
                let query = text.trim();
                if query.is_empty() {
                    ctx.notify(Notice::alert("Введи поисковый запрос текстом."))
                        .await;
                    return Ok(Some(RadarSession::Searching.into()));
                }
                self.run_search(ctx, query).await
            }
            browsing @ RadarSession::Browsing { .. } => {
                ctx.notify(Notice::alert("Выбери назначение канала или пропусти его"))
                    .await;
                Ok(Some(browsing.into()))
            }
        }
    }

    async fn show_menu(&self, ctx: &FlowContext<'_>) -> Result<()> {
        let linked_count = self.radar.linked_channels(ctx.user_id).await?.len();
        let has_profile_keywords = self.radar.profile_query(ctx.user_id).await?.is_some();
        ctx.render(radar_menu_screen(linked_count, has_profile_keywords))
            .await;
        Ok(())
    }

    async fn run_search(&self, ctx: &FlowContext<'_>, query: &str) -> Result<Option<Session>> {
        ctx.render(Screen::new(View::Progress(Activity::Searching {
            query: query.to_string(),
        })))
        .await;

        let candidates = self.radar.search_channels(query).await?;
        let Some(first) = candidates.first() else {
            ctx.render(
                Screen::new(View::NoResults {
                    query: query.to_string(),
                })
                .action("← Радар", radar(RadarAction::Menu)),
            )
            .await;
            return Ok(None);
        };

        ctx.render(channel_card_screen(first, 0, candidates.len()))
            .await;
        Ok(Some(
            RadarSession::Browsing {
                candidates,
                current_index: 0,
            }
            .into(),
        ))
    }

    async fn show_connections(&self, ctx: &FlowContext<'_>, page: usize) -> Result<()> {
        let linked = self.radar.linked_channels(ctx.user_id).await?;
        let screen = if linked.is_empty() {
            Screen::new(View::NoConnections).action("← Радар", radar(RadarAction::Menu))
        } else {
            connections_screen(Page::paginate(linked, page, self.page_size))
        };
        ctx.render(screen).await;
        Ok(())
    }
}

/// Moves to the next card, ending the session after the last one.
async fn advance(
    ctx: &FlowContext<'_>,
    candidates: Vec<Channel>,
    current_index: usize,
) -> Option<Session> {
    let next = current_index + 1;
    match candidates.get(next) {
        Some(channel) => {
            ctx.render(channel_card_screen(channel, next, candidates.len()))
                .await;
            Some(
                RadarSession::Browsing {
                    candidates,
                    current_index: next,
                }
                .into(),
            )
        }
        None => {
            ctx.render(
                Screen::new(View::SearchFinished {
                    reviewed: candidates.len(),
                })
                .action("← Радар", radar(RadarAction::Menu)),
            )
            .await;
            None
        }
    }
}

fn radar(action: RadarAction) -> Action {
    Action::Radar(action)
}

fn short_purpose_label(purpose: ChannelPurpose) -> &'static str {
    match purpose {
        ChannelPurpose::Both => "Оба",
        other => purpose_label(other),
    }
}

fn radar_menu_screen(linked_count: usize, has_profile_keywords: bool) -> Screen {
    let mut screen = Screen::new(View::RadarMenu {
        linked_count,
        has_profile_keywords,
    });
    if has_profile_keywords {
        screen = screen.action("Поиск по профилю", radar(RadarAction::ProfileSearch));
    }
    screen = screen.action("Свой запрос", radar(RadarAction::StartSearch));
    if linked_count > 0 {
        screen = screen.action("Мои каналы", radar(RadarAction::Connections { page: 0 }));
    }
    screen.action("← Меню", Action::MainMenu)
}

fn search_prompt_screen() -> Screen {
    Screen::new(View::SearchPrompt)
        .with_text_input()
        .action("← Радар", radar(RadarAction::Menu))
}

fn channel_card_screen(channel: &Channel, index: usize, total: usize) -> Screen {
    let mut screen = Screen::new(View::ChannelCard {
        channel: channel.clone(),
        index,
        total,
    });
    for purpose in ChannelPurpose::iter() {
        screen = screen.action(
            short_purpose_label(purpose),
            radar(RadarAction::Link {
                channel_id: channel.id.clone(),
                purpose,
            }),
        );
    }
    screen.action("Пропустить", radar(RadarAction::Skip))
}

fn connections_screen(page: Page<LinkedChannel>) -> Screen {
    let entries: Vec<(String, String)> = page
        .items
        .iter()
        .map(|linked| (connection_label(linked), linked.link.id.clone()))
        .collect();
    let (has_prev, has_next, current) = (page.has_prev(), page.has_next(), page.page);

    let mut screen = Screen::new(View::Connections(page));
    for (label, link_id) in entries {
        screen = screen.action(label, radar(RadarAction::ConnectionDetail { link_id }));
    }
    if has_prev {
        screen = screen.action("←", radar(RadarAction::Connections { page: current - 1 }));
    }
    if has_next {
        screen = screen.action("→", radar(RadarAction::Connections { page: current + 1 }));
    }
    screen.action("← Радар", radar(RadarAction::Menu))
}

fn connection_detail_screen(linked: LinkedChannel) -> Screen {
    let link_id = linked.link.id.clone();
    let channel_id = linked.channel.id.clone();

    let mut screen = Screen::new(View::ConnectionDetail { linked });
    for purpose in ChannelPurpose::iter() {
        screen = screen.action(
            short_purpose_label(purpose),
            radar(RadarAction::ChangePurpose {
                link_id: link_id.clone(),
                purpose,
            }),
        );
    }
    screen
        .action("Отключить канал", radar(RadarAction::Unlink { channel_id }))
        .action("← Мои каналы", radar(RadarAction::Connections { page: 0 }))
}
