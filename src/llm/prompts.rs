//! Prompt catalog — system prompts for every AI action.
//!
//! Pure functions, no I/O. The catalog is total over `AiAction`; the
//! string entry point fails closed for anything outside that set.

use crate::actions::{AiAction, UnsupportedAction};

pub const MODEL: &str = "llama-3.2-90b-vision-preview";
pub const MAX_TOKENS: u32 = 2048;
pub const TEMPERATURE: f64 = 0.7;

/// Target language used when neither the caller nor the config names one.
pub const DEFAULT_TARGET_LANGUAGE: &str = "zh-CN";

pub const SUMMARIZE_PROMPT: &str = "You are a summarization expert. Summarize the following text in a concise manner, keeping the key points. Use bullet points if appropriate. Output in the same language as the input.";

pub const EXPLAIN_PROMPT: &str = "You are a helpful teacher. Explain the following text in simple terms that anyone can understand. Output in the same language as the input.";

pub const REWRITE_PROMPT: &str = "You are a professional editor. Rewrite the following text to make it clearer, more engaging, and well-structured. Keep the same meaning. Output in the same language as the input.";

pub const CODE_EXPLAIN_PROMPT: &str = "You are a senior software engineer. Explain the following code in detail, including what it does, how it works, and any important concepts. Output in the same language as the input text (if any) or in English.";

pub const SUMMARIZE_PAGE_PROMPT: &str = "You are a summarization expert. Summarize the following webpage content in a comprehensive but concise manner. Include the main topic, key points, and any important details. Use bullet points for clarity. Output in the same language as the content.";

/// Parameters some prompts are templated on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptParams {
    /// Translation target as a locale tag ("fr", "en-US", ...).
    pub lang: Option<String>,
}

impl PromptParams {
    pub fn with_lang(lang: impl Into<String>) -> Self {
        Self {
            lang: Some(lang.into()),
        }
    }
}

pub fn translate_prompt(target_lang: &str) -> String {
    format!(
        "You are a professional translator. Translate the following text to {}. Only output the translation, nothing else.",
        target_lang
    )
}

/// System prompt for an AI action.
pub fn system_prompt(action: AiAction, params: &PromptParams) -> String {
    match action {
        AiAction::Translate => {
            let lang = params
                .lang
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or(DEFAULT_TARGET_LANGUAGE);
            translate_prompt(lang)
        }
        AiAction::Summarize => SUMMARIZE_PROMPT.to_string(),
        AiAction::Explain => EXPLAIN_PROMPT.to_string(),
        AiAction::Rewrite => REWRITE_PROMPT.to_string(),
        AiAction::CodeExplain => CODE_EXPLAIN_PROMPT.to_string(),
        AiAction::SummarizePage => SUMMARIZE_PAGE_PROMPT.to_string(),
    }
}

/// Look up a prompt by wire name.
///
/// Identifiers that are not AI actions (including menu-only actions
/// such as "search") return `UnsupportedAction` instead of a default.
pub fn prompt_for(action: &str, params: &PromptParams) -> Result<String, UnsupportedAction> {
    let action: AiAction = action.parse()?;
    Ok(system_prompt(action, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_embeds_target_language() {
        let prompt = prompt_for("translate", &PromptParams::with_lang("fr")).unwrap();
        assert!(prompt.contains("fr"));
        assert!(prompt.starts_with("You are a professional translator."));
    }

    #[test]
    fn translate_without_language_uses_default() {
        let prompt = system_prompt(AiAction::Translate, &PromptParams::default());
        assert!(prompt.contains(DEFAULT_TARGET_LANGUAGE));

        let blank = system_prompt(AiAction::Translate, &PromptParams::with_lang("  "));
        assert_eq!(blank, prompt);
    }

    #[test]
    fn fixed_prompts_ignore_params() {
        let params = PromptParams::with_lang("de");
        assert_eq!(prompt_for("summarize", &params).unwrap(), SUMMARIZE_PROMPT);
        assert_eq!(prompt_for("explain", &params).unwrap(), EXPLAIN_PROMPT);
        assert_eq!(prompt_for("rewrite", &params).unwrap(), REWRITE_PROMPT);
        assert_eq!(prompt_for("codeExplain", &params).unwrap(), CODE_EXPLAIN_PROMPT);
        assert_eq!(
            prompt_for("summarizePage", &params).unwrap(),
            SUMMARIZE_PAGE_PROMPT
        );
    }

    #[test]
    fn unknown_or_menu_only_actions_fail_closed() {
        let params = PromptParams::default();
        assert!(prompt_for("search", &params).is_err());
        assert!(prompt_for("copy", &params).is_err());
        assert_eq!(
            prompt_for("haiku", &params),
            Err(UnsupportedAction("haiku".to_string()))
        );
    }
}
