mod common;

use common::{Harness, USER};
use pitchdesk_application::flow::{
    Action, ComposeAction, ComposeSession, NoticeLevel, QuickRefine, RadarSession, Session,
    VacancyStage, View,
};
use pitchdesk_application::prompts::{VACANCY_GENERATE_INSTRUCTION, broadcast_system};
use pitchdesk_application::{DraftTarget, MessageLength};
use pitchdesk_core::channel::Channel;
use pitchdesk_core::generation::{ChatMessage, ChatRole, GenerationError};
use pitchdesk_core::profile::{ProfileRepository, ProfileUpdate};
use pitchdesk_core::template::{MessageKind, TemplateRepository};

fn compose(action: ComposeAction) -> Action {
    Action::Compose(action)
}

fn refining(history: Vec<ChatMessage>, last_result: &str) -> Session {
    ComposeSession::Refining {
        target: DraftTarget::Broadcast {
            length: MessageLength::Medium,
        },
        history,
        last_result: last_result.to_string(),
    }
    .into()
}

#[tokio::test]
async fn test_short_broadcast_from_free_text() {
    let h = Harness::new();
    h.generator.push_ok("  Привет! Делаю логотипы под ключ.  ");

    h.send(compose(ComposeAction::StartBroadcast)).await;
    h.send(compose(ComposeAction::SetLength(MessageLength::Short)))
        .await;
    h.say("Ищу клиентов на дизайн логотипов").await;

    let expected = ComposeSession::Refining {
        target: DraftTarget::Broadcast {
            length: MessageLength::Short,
        },
        history: vec![
            ChatMessage::user("Ищу клиентов на дизайн логотипов"),
            ChatMessage::assistant("Привет! Делаю логотипы под ключ."),
        ],
        last_result: "Привет! Делаю логотипы под ключ.".to_string(),
    };
    assert_eq!(h.session().await, Some(expected.into()));

    let requests = h.generator.requests();
    assert_eq!(requests.len(), 1);
    let messages = &requests[0].messages;
    assert_eq!(messages[0].role, ChatRole::System);
    assert_eq!(messages[0].content, broadcast_system(MessageLength::Short));
    assert_eq!(messages.len(), 2);

    assert_eq!(
        h.presenter.last_view(),
        View::Draft {
            kind: MessageKind::Broadcast,
            text: "Привет! Делаю логотипы под ключ.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_generate_from_profile_uses_profile_seed() {
    let h = Harness::new();
    h.store.get_or_create_user(USER).await.unwrap();
    h.store
        .update_user(
            USER,
            ProfileUpdate {
                specializations: Some(vec!["Дизайн".into()]),
                services_description: Some("Логотипы и фирменный стиль".into()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();
    h.generator.push_ok("Черновик");

    h.send(compose(ComposeAction::StartBroadcast)).await;
    h.send(compose(ComposeAction::GenerateFromProfile)).await;

    let session = h.session().await.expect("session kept");
    assert_eq!(session.state_name(), "refining");
    let seed = &session.history()[0];
    assert_eq!(seed.role, ChatRole::User);
    assert!(seed.content.contains("Логотипы и фирменный стиль"));
    assert!(seed.content.contains("Дизайн"));
}

#[tokio::test]
async fn test_entry_generation_failure_discards_session() {
    let h = Harness::new();
    h.generator.push(Err(GenerationError::Timeout));

    h.send(compose(ComposeAction::StartBroadcast)).await;
    h.send(compose(ComposeAction::GenerateFromProfile)).await;

    assert_eq!(h.session().await, None);
    assert_eq!(
        h.presenter.last_view(),
        View::GenerationFailed {
            error: GenerationError::Timeout
        }
    );
}

#[tokio::test]
async fn test_refine_failure_rolls_history_back() {
    let h = Harness::new();
    let history = vec![ChatMessage::user("u1"), ChatMessage::assistant("a1")];
    h.dispatcher
        .restore_session(USER, Some(refining(history.clone(), "a1")))
        .await;
    h.generator
        .push(Err(GenerationError::RateLimited { retry_after: None }));

    h.send(compose(ComposeAction::Refine(QuickRefine::Shorter)))
        .await;

    assert_eq!(h.session().await, Some(refining(history, "a1")));
    assert_eq!(h.presenter.last_notice().level, NoticeLevel::Alert);
    assert_eq!(
        h.presenter.last_view(),
        View::Draft {
            kind: MessageKind::Broadcast,
            text: "a1".to_string(),
        }
    );
}

#[tokio::test]
async fn test_refine_with_free_text_appends_instruction() {
    let h = Harness::new();
    let history = vec![ChatMessage::user("u1"), ChatMessage::assistant("a1")];
    h.dispatcher
        .restore_session(USER, Some(refining(history, "a1")))
        .await;
    h.generator.push_ok("a2");

    h.say("Добавь про сроки").await;

    let session = h.session().await.unwrap();
    assert_eq!(
        session.history(),
        &[
            ChatMessage::user("u1"),
            ChatMessage::assistant("a1"),
            ChatMessage::user("Добавь про сроки"),
            ChatMessage::assistant("a2"),
        ]
    );
}

#[tokio::test]
async fn test_regenerate_replaces_last_draft() {
    let h = Harness::new();
    let history = vec![ChatMessage::user("u1"), ChatMessage::assistant("a1")];
    h.dispatcher
        .restore_session(USER, Some(refining(history, "a1")))
        .await;
    h.generator.push_ok("a1-bis");

    h.send(compose(ComposeAction::Regenerate)).await;

    let sent = &h.generator.requests()[0].messages;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1], ChatMessage::user("u1"));
    assert_eq!(
        h.session().await,
        Some(refining(
            vec![ChatMessage::user("u1"), ChatMessage::assistant("a1-bis")],
            "a1-bis"
        ))
    );
}

#[tokio::test]
async fn test_regenerate_failure_restores_previous_draft() {
    let h = Harness::new();
    let history = vec![ChatMessage::user("u1"), ChatMessage::assistant("a1")];
    h.dispatcher
        .restore_session(USER, Some(refining(history.clone(), "a1")))
        .await;
    h.generator
        .push(Err(GenerationError::ConnectionFailed("refused".into())));

    h.send(compose(ComposeAction::Regenerate)).await;

    assert_eq!(h.session().await, Some(refining(history, "a1")));
}

#[tokio::test]
async fn test_save_without_result_is_noop() {
    let h = Harness::new();
    h.dispatcher
        .restore_session(USER, Some(refining(vec![ChatMessage::user("u1")], "")))
        .await;

    h.send(compose(ComposeAction::Save)).await;

    assert!(h.store.list_for_user(USER).await.unwrap().is_empty());
    let notice = h.presenter.last_notice();
    assert_eq!(notice.level, NoticeLevel::Alert);
    assert_eq!(notice.text, "Нечего сохранять");
}

#[tokio::test]
async fn test_save_stores_last_result_and_keeps_refining() {
    let h = Harness::new();
    let session = refining(
        vec![ChatMessage::user("u1"), ChatMessage::assistant("a1")],
        "a1",
    );
    h.dispatcher
        .restore_session(USER, Some(session.clone()))
        .await;

    h.send(compose(ComposeAction::Save)).await;

    let templates = h.store.list_for_user(USER).await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].content, "a1");
    assert_eq!(templates[0].kind, MessageKind::Broadcast);
    assert_eq!(h.session().await, Some(session));
}

#[tokio::test]
async fn test_vacancy_response_flow() {
    let h = Harness::new();
    h.generator.push_ok("Здравствуйте! Готов помочь.");

    h.send(compose(ComposeAction::StartVacancy)).await;
    h.send(compose(ComposeAction::GenerateVacancy)).await;
    assert_eq!(h.presenter.last_notice().text, "Сначала вставь текст вакансии");

    h.say("Ищем дизайнера на лендинг").await;
    assert_eq!(
        h.presenter.last_view(),
        View::VacancyIntake {
            stage: VacancyStage::PostingReceived
        }
    );
    h.say("Есть кейс с похожим лендингом").await;
    assert_eq!(
        h.presenter.last_view(),
        View::VacancyIntake {
            stage: VacancyStage::DetailsReceived
        }
    );

    h.send(compose(ComposeAction::GenerateVacancy)).await;

    let Some(Session::Compose(ComposeSession::Refining {
        target, history, ..
    })) = h.session().await
    else {
        panic!("expected refining session");
    };
    assert_eq!(target, DraftTarget::Vacancy);
    assert_eq!(history.len(), 5);
    assert_eq!(history[3], ChatMessage::user(VACANCY_GENERATE_INSTRUCTION));
    assert!(history[4].is_assistant());
}

#[tokio::test]
async fn test_stale_action_keeps_other_flow_session() {
    let h = Harness::new();
    let browsing: Session = RadarSession::Browsing {
        candidates: vec![Channel {
            id: "c1".into(),
            username: "design_jobs".into(),
            title: None,
            description: None,
            subscribers_count: None,
            category: None,
            source: "search".into(),
            created_at: String::new(),
        }],
        current_index: 0,
    }
    .into();
    h.dispatcher
        .restore_session(USER, Some(browsing.clone()))
        .await;

    h.send(compose(ComposeAction::Regenerate)).await;

    assert_eq!(h.session().await, Some(browsing));
    assert_eq!(h.presenter.last_notice().text, "Это действие сейчас недоступно");
    assert!(h.generator.requests().is_empty());
}

#[tokio::test]
async fn test_text_without_session_returns_to_menu() {
    let h = Harness::new();

    h.say("привет").await;

    assert_eq!(h.session().await, None);
    assert_eq!(h.presenter.last_notice().level, NoticeLevel::Alert);
    assert_eq!(h.presenter.last_view(), View::MainMenu);
}

#[tokio::test]
async fn test_main_menu_clears_session() {
    let h = Harness::new();
    h.send(compose(ComposeAction::StartBroadcast)).await;
    assert!(h.session().await.is_some());

    h.send(Action::MainMenu).await;

    assert_eq!(h.session().await, None);
    assert_eq!(h.presenter.last_view(), View::MainMenu);
}

#[tokio::test]
async fn test_template_pages_and_delete() {
    let h = Harness::new();
    for i in 0..7 {
        h.composer
            .save_template(USER, MessageKind::Vacancy, &format!("Отклик {i}"))
            .await
            .unwrap();
    }

    h.send(compose(ComposeAction::Templates { page: 1 })).await;
    let View::Templates(page) = h.presenter.last_view() else {
        panic!("expected template list");
    };
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 2);

    let victim = page.items[0].id.clone();
    h.send(compose(ComposeAction::DeleteTemplate {
        template_id: victim.clone(),
    }))
    .await;

    assert_eq!(h.presenter.last_notice().text, "Шаблон удалён");
    assert!(h.store.find_by_id(&victim).await.unwrap().is_none());
    assert_eq!(h.store.list_for_user(USER).await.unwrap().len(), 6);
}

#[tokio::test]
async fn test_foreign_template_is_hidden() {
    let h = Harness::new();
    let foreign = h
        .composer
        .save_template("someone-else", MessageKind::Broadcast, "чужой")
        .await
        .unwrap();

    h.send(compose(ComposeAction::TemplateDetail {
        template_id: foreign.id.clone(),
    }))
    .await;
    assert_eq!(h.presenter.last_notice().text, "Шаблон не найден");

    h.send(compose(ComposeAction::DeleteTemplate {
        template_id: foreign.id.clone(),
    }))
    .await;
    assert!(h.store.find_by_id(&foreign.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_rewrite_variants_tolerates_partial_failure() {
    let h = Harness::new();
    h.generator.push_ok("вариант 1");
    h.generator.push(Err(GenerationError::EmptyResponse));
    h.generator.push_ok("вариант 3");

    let variants = h
        .composer
        .rewrite_variants("Исходный текст", None, 3)
        .await
        .unwrap();

    assert_eq!(variants.len(), 2);
    assert!(
        h.generator
            .requests()
            .iter()
            .all(|r| r.params.temperature == 0.8)
    );
}

#[tokio::test]
async fn test_rewrite_variants_all_failed() {
    let h = Harness::new();
    for _ in 0..3 {
        h.generator.push(Err(GenerationError::Timeout));
    }

    let result = h.composer.rewrite_variants("Текст", None, 3).await;

    assert_eq!(result, Err(GenerationError::NoVariants { attempts: 3 }));
}
