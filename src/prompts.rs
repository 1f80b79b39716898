use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use crate::config::AppConfig;
use crate::direction::Direction;

pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_TRANSLATE: &str = "translate.txt";

pub const DEFAULT_TRANSLATE_TEXT: &str = r#"Translate the following {{source_lang}} text into {{target_lang}}.
Split the text into individual sentences. Return a JSON array where each element is one sentence pair: {"src": "original sentence", "tgt": "translated sentence"}.
Each sentence must be a SEPARATE element. Output ONLY valid JSON, no markdown fences, no explanations.
Example input: "{{example_input}}"
Example output: {{example_output}}"#;

#[derive(Clone, Debug)]
pub struct PromptSet {
    pub translate: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            translate: DEFAULT_TRANSLATE_TEXT.to_string(),
        }
    }
}

impl PromptSet {
    /// Built-in template unless `[prompts] translate` names a file (relative to the config dir).
    pub fn load(config_path: &Path, cfg: &AppConfig) -> anyhow::Result<Self> {
        let Some(rel) = cfg.prompts.translate.as_ref() else {
            return Ok(Self::default());
        };
        let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let mut p = PathBuf::from(rel);
        if p.is_relative() {
            p = config_dir.join(&p);
        }
        if !p.exists() {
            return Err(anyhow!(
                "prompt file not found for translate: {} (run: ollama-translate --init-config)",
                p.display()
            ));
        }
        let translate =
            std::fs::read_to_string(&p).with_context(|| format!("read prompt: {}", p.display()))?;
        Ok(Self { translate })
    }

    pub fn system_prompt(&self, direction: Direction) -> String {
        let (example_input, example_output) = direction.prompt_example();
        render_template(
            &self.translate,
            &[
                ("source_lang", direction.source_lang()),
                ("target_lang", direction.target_lang()),
                ("example_input", example_input),
                ("example_output", example_output),
            ],
        )
    }
}

pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        let pat = format!("{{{{{k}}}}}");
        out = out.replace(&pat, v);
    }
    out
}

pub fn default_prompt_files() -> Vec<(&'static str, &'static str)> {
    vec![(DEFAULT_TRANSLATE, DEFAULT_TRANSLATE_TEXT)]
}

#[cfg(test)]
mod tests {
    use super::{render_template, PromptSet};
    use crate::direction::Direction;

    #[test]
    fn fills_placeholders() {
        assert_eq!(render_template("{{a}}-{{b}}-{{a}}", &[("a", "x"), ("b", "y")]), "x-y-x");
    }

    #[test]
    fn default_prompt_per_direction() {
        let prompts = PromptSet::default();
        let en = prompts.system_prompt(Direction::ToEnglish);
        assert!(en.starts_with("Translate the following Chinese text into English."));
        assert!(en.contains(r#"Example input: "你好世界。今天天气不错。""#));
        assert!(!en.contains("{{"));

        let cn = prompts.system_prompt(Direction::ToChinese);
        assert!(cn.starts_with("Translate the following English text into Chinese."));
        assert!(cn.contains(r#"{"src": "Hello world.", "tgt": "你好世界。"}"#));
    }
}
