//! Alfred script-filter output: one JSON document with a single item on stdout.

use std::path::Path;

use serde::Serialize;

use crate::chat::ChatFailure;
use crate::direction::Direction;

#[derive(Debug, Serialize)]
pub struct ScriptFilter {
    pub items: Vec<LauncherItem>,
}

#[derive(Debug, Serialize)]
pub struct LauncherItem {
    pub title: String,
    pub subtitle: String,
    pub arg: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quicklookurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<LargeType>,
}

#[derive(Debug, Serialize)]
pub struct LargeType {
    pub largetype: String,
}

impl LauncherItem {
    fn notice(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            arg: String::new(),
            valid: false,
            quicklookurl: None,
            text: None,
        }
    }

    pub fn empty_query() -> Self {
        Self::notice("输入要翻译的文字", "中英互译 (Ollama)")
    }

    pub fn translated(translation: &str, direction: Direction, preview: &Path) -> Self {
        let text = (!translation.is_empty()).then(|| LargeType {
            largetype: translation.to_string(),
        });
        Self {
            title: translation.to_string(),
            subtitle: format!("{} | Shift 查看对照", direction.arrow()),
            arg: translation.to_string(),
            valid: true,
            quicklookurl: Some(preview.display().to_string()),
            text,
        }
    }

    pub fn failed(err: &anyhow::Error) -> Self {
        match ChatFailure::classify(err) {
            ChatFailure::Unreachable => Self::notice("无法连接 Ollama", "请确保 Ollama 正在运行"),
            ChatFailure::Timeout => Self::notice("翻译超时", "请稍后重试"),
            ChatFailure::Other => Self::notice(format!("错误: {err:#}"), "翻译失败"),
        }
    }

    pub fn into_filter(self) -> ScriptFilter {
        ScriptFilter { items: vec![self] }
    }
}

impl ScriptFilter {
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
