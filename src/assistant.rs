/// Role used for free-form chat from the dashboard
pub const CHAT_ROLE: &str = "你是助手";
/// Appended to every chat message to keep answers short
pub const CHAT_SUFFIX: &str = " (请精简回答)";
/// Role used for the hourly encouragement
pub const HOURLY_ROLE: &str = "你是我的贴心助手";

const DIARY_CONTEXT_CHARS: usize = 1000;

pub fn chat_message(input: &str) -> String {
    format!("{}{}", input.trim(), CHAT_SUFFIX)
}

/// Prompt for the hourly encouragement, grounded in the latest diary when there is one
pub fn diary_encouragement_prompt(latest_diary: Option<&str>) -> String {
    match latest_diary.map(str::trim).filter(|c| !c.is_empty()) {
        Some(content) => {
            let excerpt: String = content.chars().take(DIARY_CONTEXT_CHARS).collect();
            format!(
                "这是我最近的日记：\n{}\n\n请根据这篇日记的内容，给我一句简短的鼓励的话。请保持回答精简。",
                excerpt
            )
        }
        None => "请直接给我一句简短的鼓励的话。请保持回答精简。".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_appends_suffix() {
        assert_eq!(chat_message("  今天做什么？ "), "今天做什么？ (请精简回答)");
    }

    #[test]
    fn test_diary_prompt_without_diary() {
        let prompt = diary_encouragement_prompt(None);
        assert!(prompt.starts_with("请直接给我"));
        assert_eq!(diary_encouragement_prompt(Some("   ")), prompt);
    }

    #[test]
    fn test_diary_prompt_truncates_by_characters() {
        let diary = "晴".repeat(1500);
        let prompt = diary_encouragement_prompt(Some(&diary));
        assert_eq!(prompt.matches('晴').count(), 1000);
    }
}
