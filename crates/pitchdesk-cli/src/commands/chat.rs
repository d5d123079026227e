use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use pitchdesk_application::flow::{Action, Trigger};

use crate::bootstrap::Bootstrap;
use crate::console::ConsolePresenter;

/// What a line typed at the prompt means.
enum Input {
    Quit,
    Skip,
    Event(Trigger),
    Invalid(String),
}

pub async fn run(app: &Bootstrap, user_id: &str) -> Result<()> {
    let presenter = Arc::new(ConsolePresenter::new());
    let dispatcher = app.dispatcher(presenter.clone())?;
    let mut rl = DefaultEditor::new()?;

    println!("{}", "=== Pitchdesk ===".bright_magenta().bold());
    println!(
        "{}",
        "Номер пункта выбирает действие, /menu открывает меню, quit завершает работу.".bright_black()
    );

    dispatcher.handle_event(user_id, Action::MainMenu.into()).await?;

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let event = match parse_input(&line, &presenter).await {
            Input::Quit => break,
            Input::Skip => continue,
            Input::Invalid(message) => {
                println!("{}", message.yellow());
                continue;
            }
            Input::Event(event) => event,
        };
        let _ = rl.add_history_entry(line.as_str());

        if let Err(err) = dispatcher.handle_event(user_id, event).await {
            tracing::error!(error = %err, "event failed");
            println!("{}", format!("Ошибка: {err}").red());
        }
    }

    println!("{}", "До встречи!".bright_green());
    Ok(())
}

async fn parse_input(line: &str, presenter: &ConsolePresenter) -> Input {
    let trimmed = line.trim();
    match trimmed {
        "" => return Input::Skip,
        "quit" | "exit" => return Input::Quit,
        "/menu" => return Input::Event(Action::MainMenu.into()),
        _ => {}
    }

    if let Some(token) = trimmed.strip_prefix('/') {
        return match token.parse::<Action>() {
            Ok(action) => Input::Event(action.into()),
            Err(err) => Input::Invalid(format!("Неизвестная команда: {err}")),
        };
    }

    if let Ok(number) = trimmed.parse::<usize>() {
        return match presenter.action(number).await {
            Some(action) => Input::Event(action.into()),
            None => Input::Invalid(format!("Нет пункта с номером {number}")),
        };
    }

    Input::Event(Trigger::text(trimmed))
}
