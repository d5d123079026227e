//! Job application prompts.

use pitchdesk_core::profile::User;

use super::profile::profile_lines;

/// Turn appended before generating a response to the pasted posting.
pub const VACANCY_GENERATE_INSTRUCTION: &str = "Напиши отклик на эту вакансию от моего лица.";

pub fn vacancy_system() -> String {
    "Ты помогаешь фрилансеру откликаться на вакансии. Пиши отклик от первого лица, \
     как будто его пишет сам исполнитель.\n\n\
     ПРАВИЛА:\n\
     1. Опирайся на текст вакансии и сведения о пользователе из диалога.\n\
     2. Покажи, почему пользователь подходит именно под эту задачу.\n\
     3. НЕ выдумывай опыт, навыки или цены, которых нет в диалоге.\n\
     4. Пиши кратко и по делу, без канцелярита, закончи предложением обсудить детали.\n\
     5. Отвечай ТОЛЬКО текстом отклика, без пояснений."
        .to_string()
}

/// Seed user turn introducing the profile before any posting is pasted.
pub fn vacancy_context(user: &User) -> String {
    format!(
        "Информация обо мне для отклика на вакансию:\n\n{}\n\n\
         Дальше я пришлю текст вакансии и, возможно, дополнительную информацию.",
        profile_lines(user)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vacancy_context_never_fails_on_empty_profile() {
        let user = User {
            id: "u1".into(),
            first_name: None,
            specializations: vec![" ".into()],
            services_description: Some("   ".into()),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let context = vacancy_context(&user);
        assert!(context.contains("Специализации: не указаны"));
        assert!(context.contains("Описание услуг: не указано"));
    }

    #[test]
    fn test_vacancy_system_is_first_person() {
        assert!(vacancy_system().contains("от первого лица"));
    }
}
