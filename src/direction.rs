use clap::ValueEnum;

/// Which way a request translates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Chinese in, English out.
    #[value(name = "en")]
    ToEnglish,
    /// English in, Chinese out.
    #[value(name = "cn", alias = "zh")]
    ToChinese,
}

impl Direction {
    pub fn source_lang(self) -> &'static str {
        match self {
            Self::ToEnglish => "Chinese",
            Self::ToChinese => "English",
        }
    }

    pub fn target_lang(self) -> &'static str {
        match self {
            Self::ToEnglish => "English",
            Self::ToChinese => "Chinese",
        }
    }

    /// Left and right panel headings of the preview document.
    pub fn panel_labels(self) -> (&'static str, &'static str) {
        match self {
            Self::ToEnglish => ("中文原文", "English Translation"),
            Self::ToChinese => ("English Original", "中文译文"),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::ToEnglish => "中→英",
            Self::ToChinese => "英→中",
        }
    }

    /// One-shot (input, output) example embedded in the system prompt.
    pub fn prompt_example(self) -> (&'static str, &'static str) {
        match self {
            Self::ToEnglish => (
                "你好世界。今天天气不错。",
                r#"[{"src": "你好世界。", "tgt": "Hello world."}, {"src": "今天天气不错。", "tgt": "The weather is nice today."}]"#,
            ),
            Self::ToChinese => (
                "Hello world. Nice weather today.",
                r#"[{"src": "Hello world.", "tgt": "你好世界。"}, {"src": "Nice weather today.", "tgt": "今天天气不错。"}]"#,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::Direction;

    #[test]
    fn parses_cli_values() {
        assert_eq!(Direction::from_str("en", true), Ok(Direction::ToEnglish));
        assert_eq!(Direction::from_str("cn", true), Ok(Direction::ToChinese));
        assert_eq!(Direction::from_str("zh", true), Ok(Direction::ToChinese));
        assert!(Direction::from_str("fr", true).is_err());
    }

    #[test]
    fn labels_follow_direction() {
        assert_eq!(Direction::ToEnglish.panel_labels().0, "中文原文");
        assert_eq!(Direction::ToChinese.panel_labels().1, "中文译文");
    }
}
