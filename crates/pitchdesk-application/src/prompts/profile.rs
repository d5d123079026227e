//! Profile summary shared by the seed turns.

use pitchdesk_core::profile::User;

const NAME_PLACEHOLDER: &str = "Фрилансер";
const SPECIALIZATIONS_PLACEHOLDER: &str = "не указаны";
const SERVICES_PLACEHOLDER: &str = "не указано";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(super) fn profile_lines(user: &User) -> String {
    let name = non_blank(user.first_name.as_deref()).unwrap_or(NAME_PLACEHOLDER);

    let specializations: Vec<&str> = user
        .specializations
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let specializations = if specializations.is_empty() {
        SPECIALIZATIONS_PLACEHOLDER.to_string()
    } else {
        specializations.join(", ")
    };

    let services =
        non_blank(user.services_description.as_deref()).unwrap_or(SERVICES_PLACEHOLDER);

    format!(
        "Имя: {name}\n\
         Специализации: {specializations}\n\
         Описание услуг: {services}"
    )
}
