use anyhow::Result;
use colored::Colorize;

use pitchdesk_core::profile::{ProfileRepository, ProfileUpdate};

use crate::bootstrap::Bootstrap;

/// Requested profile changes as given on the command line.
pub struct ProfileEdit {
    pub name: Option<String>,
    pub specializations: Option<String>,
    pub services: Option<String>,
    pub keywords: Option<String>,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn show(app: &Bootstrap, user_id: &str) -> Result<()> {
    let profiles = app.profiles();
    let user = profiles.get_or_create_user(user_id).await?;
    let search = profiles.active_search_profile(user_id).await?;

    let or_dash = |value: Option<&str>| value.unwrap_or("—").to_string();
    println!("{}", format!("Профиль {}", user.id).bright_magenta().bold());
    println!("Имя: {}", or_dash(user.first_name.as_deref()));
    println!(
        "Специализации: {}",
        if user.specializations.is_empty() {
            "—".to_string()
        } else {
            user.specializations.join(", ")
        }
    );
    println!("Описание услуг: {}", or_dash(user.services_description.as_deref()));
    println!(
        "Ключевые слова радара: {}",
        or_dash(search.and_then(|p| p.keyword_query()).as_deref())
    );
    Ok(())
}

pub async fn set(app: &Bootstrap, user_id: &str, edit: ProfileEdit) -> Result<()> {
    let profiles = app.profiles();
    profiles.get_or_create_user(user_id).await?;

    let update = ProfileUpdate {
        first_name: edit.name,
        specializations: edit.specializations.as_deref().map(split_list),
        services_description: edit.services,
    };
    if !update.is_empty() {
        profiles.update_user(user_id, update).await?;
    }
    if let Some(keywords) = edit.keywords.as_deref() {
        profiles
            .save_search_keywords(user_id, split_list(keywords))
            .await?;
    }

    println!("{}", "Профиль обновлён.".green());
    show(app, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_blanks() {
        assert_eq!(
            split_list(" Дизайн, Python-разработка ,, "),
            vec!["Дизайн".to_string(), "Python-разработка".to_string()]
        );
    }
}
