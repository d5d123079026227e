//! Compose state machine.
//!
//! ```text
//! menu ─┬─ broadcast ─> CollectingBroadcast ─┐
//!       └─ vacancy ───> CollectingVacancy ───┴─ generate ─> Refining
//! ```
//!
//! A failed entry generation discards the session. A failed refinement
//! rolls the conversation back to its last successful turn and stays in
//! `Refining`.

use std::sync::Arc;

use pitchdesk_core::error::Result;
use pitchdesk_core::generation::{ChatMessage, GenerationError};
use pitchdesk_core::template::Template;

use super::FlowContext;
use super::format::template_preview;
use super::session::{ComposeSession, Session};
use super::trigger::{Action, ComposeAction, QuickRefine};
use super::view::{
    Activity, Notice, Page, Screen, VacancyStage, View, describe_generation_error,
};
use crate::composer::{ComposerService, DraftTarget};
use crate::prompts::{MessageLength, VACANCY_GENERATE_INSTRUCTION};

const LENGTHS: [MessageLength; 3] = [MessageLength::Short, MessageLength::Medium, MessageLength::Long];

pub struct ComposeFlow {
    composer: Arc<ComposerService>,
    page_size: usize,
}

/// How a refinement turn was requested.
enum Refinement {
    /// Drop the last draft and generate again from the same history.
    Regenerate,
    /// Append an instruction turn and generate.
    Instruction(String),
}

impl ComposeFlow {
    pub fn new(composer: Arc<ComposerService>, page_size: usize) -> Self {
        Self {
            composer,
            page_size: page_size.max(1),
        }
    }

    pub(crate) async fn handle_action(
        &self,
        ctx: &FlowContext<'_>,
        session: Option<Session>,
        action: ComposeAction,
    ) -> Result<Option<Session>> {
        let (current, unrelated) = match session {
            Some(Session::Compose(state)) => (Some(state), None),
            other => (None, other),
        };

        match (action, current) {
            (ComposeAction::Menu, _) => {
                self.show_menu(ctx).await?;
                Ok(None)
            }
            (ComposeAction::StartBroadcast, _) => {
                let length = MessageLength::default();
                ctx.render(broadcast_intake_screen(length)).await;
                Ok(Some(
                    ComposeSession::CollectingBroadcast {
                        history: Vec::new(),
                        length,
                    }
                    .into(),
                ))
            }
            (ComposeAction::StartVacancy, _) => {
                let history = self.composer.vacancy_seed(ctx.user_id).await?;
                ctx.render(vacancy_intake_screen(VacancyStage::AwaitingPosting))
                    .await;
                Ok(Some(
                    ComposeSession::CollectingVacancy {
                        history,
                        has_vacancy: false,
                    }
                    .into(),
                ))
            }
            (
                ComposeAction::SetLength(length),
                Some(ComposeSession::CollectingBroadcast { history, .. }),
            ) => {
                ctx.notify(Notice::info(format!("Длина: {}", length.label())))
                    .await;
                ctx.render(broadcast_intake_screen(length)).await;
                Ok(Some(
                    ComposeSession::CollectingBroadcast { history, length }.into(),
                ))
            }
            (
                ComposeAction::GenerateFromProfile,
                Some(ComposeSession::CollectingBroadcast { length, .. }),
            ) => {
                let history = self.composer.broadcast_seed(ctx.user_id).await?;
                Ok(self
                    .entry_generation(ctx, DraftTarget::Broadcast { length }, history)
                    .await)
            }
            (
                ComposeAction::GenerateVacancy,
                Some(ComposeSession::CollectingVacancy {
                    mut history,
                    has_vacancy: true,
                }),
            ) => {
                history.push(ChatMessage::user(VACANCY_GENERATE_INSTRUCTION));
                Ok(self.entry_generation(ctx, DraftTarget::Vacancy, history).await)
            }
            (
                ComposeAction::GenerateVacancy,
                Some(state @ ComposeSession::CollectingVacancy { .. }),
            ) => {
                ctx.notify(Notice::alert("Сначала вставь текст вакансии")).await;
                Ok(Some(state.into()))
            }
            (ComposeAction::Save, Some(state @ ComposeSession::Refining { .. })) => {
                self.save(ctx, &state).await?;
                Ok(Some(state.into()))
            }
            (
                ComposeAction::Regenerate,
                Some(ComposeSession::Refining {
                    target,
                    history,
                    last_result,
                }),
            ) => {
                let next = self
                    .refine(ctx, target, history, last_result, Refinement::Regenerate)
                    .await;
                Ok(Some(next.into()))
            }
            (
                ComposeAction::Refine(shortcut),
                Some(ComposeSession::Refining {
                    target,
                    history,
                    last_result,
                }),
            ) => {
                let instruction = quick_refine_instruction(shortcut);
                let next = self
                    .refine(ctx, target, history, last_result, instruction)
                    .await;
                Ok(Some(next.into()))
            }
            (ComposeAction::Templates { page }, _) => {
                self.show_templates(ctx, page).await?;
                Ok(None)
            }
            (ComposeAction::TemplateDetail { template_id }, _) => {
                match self.composer.template(ctx.user_id, &template_id).await? {
                    Some(template) => ctx.render(template_detail_screen(template)).await,
                    None => ctx.notify(Notice::alert("Шаблон не найден")).await,
                }
                Ok(None)
            }
            (ComposeAction::DeleteTemplate { template_id }, _) => {
                self.composer
                    .delete_template(ctx.user_id, &template_id)
                    .await?;
                ctx.notify(Notice::info("Шаблон удалён")).await;
                self.show_templates(ctx, 0).await?;
                Ok(None)
            }
            (action, current) => {
                tracing::debug!(
                    user_id = ctx.user_id,
                    ?action,
                    "compose action not available in current state"
                );
                ctx.notify(Notice::alert("Это действие сейчас недоступно")).await;
                Ok(current.map(Session::Compose).or(unrelated))
            }
        }
    }

    pub(crate) async fn handle_text(
        &self,
        ctx: &FlowContext<'_>,
        state: ComposeSession,
        text: &str,
    ) -> Result<Option<Session>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Some(state.into()));
        }

        let next = match state {
            ComposeSession::CollectingBroadcast {
                mut history,
                length,
            } => {
                history.push(ChatMessage::user(text));
                self.entry_generation(ctx, DraftTarget::Broadcast { length }, history)
                    .await
            }
            ComposeSession::CollectingVacancy {
                mut history,
                has_vacancy,
            } => {
                history.push(ChatMessage::user(text));
                let stage = if has_vacancy {
                    VacancyStage::DetailsReceived
                } else {
                    VacancyStage::PostingReceived
                };
                ctx.render(vacancy_intake_screen(stage)).await;
                Some(
                    ComposeSession::CollectingVacancy {
                        history,
                        has_vacancy: true,
                    }
                    .into(),
                )
            }
            ComposeSession::Refining {
                target,
                history,
                last_result,
            } => {
                let refinement = Refinement::Instruction(text.to_string());
                Some(
                    self.refine(ctx, target, history, last_result, refinement)
                        .await
                        .into(),
                )
            }
        };
        Ok(next)
    }

    async fn show_menu(&self, ctx: &FlowContext<'_>) -> Result<()> {
        let has_templates = !self.composer.templates(ctx.user_id).await?.is_empty();
        ctx.render(compose_menu_screen(has_templates)).await;
        Ok(())
    }

    async fn show_templates(&self, ctx: &FlowContext<'_>, page: usize) -> Result<()> {
        let templates = self.composer.templates(ctx.user_id).await?;
        let screen = if templates.is_empty() {
            Screen::new(View::NoTemplates).action("← Назад", compose(ComposeAction::Menu))
        } else {
            templates_screen(Page::paginate(templates, page, self.page_size))
        };
        ctx.render(screen).await;
        Ok(())
    }

    /// First generation of a session. Failure discards the session.
    async fn entry_generation(
        &self,
        ctx: &FlowContext<'_>,
        target: DraftTarget,
        mut history: Vec<ChatMessage>,
    ) -> Option<Session> {
        ctx.render(Screen::new(View::Progress(Activity::Generating)))
            .await;

        match self.composer.generate(target, &history).await {
            Ok(text) => {
                history.push(ChatMessage::assistant(text.clone()));
                ctx.render(draft_screen(target, &text)).await;
                Some(
                    ComposeSession::Refining {
                        target,
                        history,
                        last_result: text,
                    }
                    .into(),
                )
            }
            Err(error) => {
                tracing::warn!(
                    user_id = ctx.user_id,
                    kind = error.kind(),
                    "entry generation failed, session discarded"
                );
                ctx.render(failure_screen(error)).await;
                None
            }
        }
    }

    /// Generation from an existing draft. Failure restores the prior history.
    async fn refine(
        &self,
        ctx: &FlowContext<'_>,
        target: DraftTarget,
        mut history: Vec<ChatMessage>,
        last_result: String,
        refinement: Refinement,
    ) -> ComposeSession {
        let snapshot = history.clone();
        match refinement {
            Refinement::Regenerate => {
                if history.last().is_some_and(ChatMessage::is_assistant) {
                    history.pop();
                }
            }
            Refinement::Instruction(instruction) => history.push(ChatMessage::user(instruction)),
        }

        ctx.render(Screen::new(View::Progress(Activity::Refining)))
            .await;

        match self.composer.generate(target, &history).await {
            Ok(text) => {
                history.push(ChatMessage::assistant(text.clone()));
                ctx.render(draft_screen(target, &text)).await;
                ComposeSession::Refining {
                    target,
                    history,
                    last_result: text,
                }
            }
            Err(error) => {
                tracing::warn!(
                    user_id = ctx.user_id,
                    kind = error.kind(),
                    "refinement failed, history rolled back"
                );
                ctx.notify(Notice::alert(describe_generation_error(&error)))
                    .await;
                ctx.render(draft_screen(target, &last_result)).await;
                ComposeSession::Refining {
                    target,
                    history: snapshot,
                    last_result,
                }
            }
        }
    }

    async fn save(&self, ctx: &FlowContext<'_>, state: &ComposeSession) -> Result<()> {
        let ComposeSession::Refining {
            target,
            last_result,
            ..
        } = state
        else {
            return Ok(());
        };

        if last_result.trim().is_empty() {
            ctx.notify(Notice::alert("Нечего сохранять")).await;
            return Ok(());
        }

        self.composer
            .save_template(ctx.user_id, target.kind(), last_result)
            .await?;
        ctx.notify(Notice::info("Сохранено как шаблон!")).await;
        Ok(())
    }
}

fn quick_refine_instruction(shortcut: QuickRefine) -> Refinement {
    Refinement::Instruction(shortcut.instruction().to_string())
}

fn compose(action: ComposeAction) -> Action {
    Action::Compose(action)
}

fn compose_menu_screen(has_templates: bool) -> Screen {
    let mut screen = Screen::new(View::ComposeMenu { has_templates })
        .action("Сообщение для рассылки", compose(ComposeAction::StartBroadcast))
        .action("Отклик на вакансию", compose(ComposeAction::StartVacancy));
    if has_templates {
        screen = screen.action("Мои шаблоны", compose(ComposeAction::Templates { page: 0 }));
    }
    screen.action("← Меню", Action::MainMenu)
}

fn broadcast_intake_screen(length: MessageLength) -> Screen {
    let mut screen = Screen::new(View::BroadcastIntake { length }).with_text_input();
    for option in LENGTHS {
        screen = screen.action(option.label(), compose(ComposeAction::SetLength(option)));
    }
    screen
        .action("Сгенерировать по профилю", compose(ComposeAction::GenerateFromProfile))
        .action("← Назад", compose(ComposeAction::Menu))
}

fn vacancy_intake_screen(stage: VacancyStage) -> Screen {
    let mut screen = Screen::new(View::VacancyIntake { stage }).with_text_input();
    if stage != VacancyStage::AwaitingPosting {
        screen = screen.action("Сгенерировать", compose(ComposeAction::GenerateVacancy));
    }
    screen.action("← Назад", compose(ComposeAction::Menu))
}

fn draft_screen(target: DraftTarget, text: &str) -> Screen {
    Screen::new(View::Draft {
        kind: target.kind(),
        text: text.to_string(),
    })
    .with_text_input()
    .action("Сохранить", compose(ComposeAction::Save))
    .action("Переделать", compose(ComposeAction::Regenerate))
    .action("Короче", compose(ComposeAction::Refine(QuickRefine::Shorter)))
    .action("Длиннее", compose(ComposeAction::Refine(QuickRefine::Longer)))
    .action("Другой тон", compose(ComposeAction::Refine(QuickRefine::Tone)))
    .action("← Меню", compose(ComposeAction::Menu))
}

fn failure_screen(error: GenerationError) -> Screen {
    Screen::new(View::GenerationFailed { error }).action("← Назад", compose(ComposeAction::Menu))
}

fn templates_screen(page: Page<Template>) -> Screen {
    let entries: Vec<(String, String)> = page
        .items
        .iter()
        .map(|t| (template_preview(t), t.id.clone()))
        .collect();
    let (has_prev, has_next, current) = (page.has_prev(), page.has_next(), page.page);

    let mut screen = Screen::new(View::Templates(page));
    for (label, template_id) in entries {
        screen = screen.action(label, compose(ComposeAction::TemplateDetail { template_id }));
    }
    if has_prev {
        screen = screen.action("←", compose(ComposeAction::Templates { page: current - 1 }));
    }
    if has_next {
        screen = screen.action("→", compose(ComposeAction::Templates { page: current + 1 }));
    }
    screen.action("← Назад", compose(ComposeAction::Menu))
}

fn template_detail_screen(template: Template) -> Screen {
    let delete = compose(ComposeAction::DeleteTemplate {
        template_id: template.id.clone(),
    });
    Screen::new(View::TemplateDetail { template })
        .action("Удалить", delete)
        .action("← Шаблоны", compose(ComposeAction::Templates { page: 0 }))
}
