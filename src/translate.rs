use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};

use crate::align::{extract_pairs, joined_translation};
use crate::chat::ChatBackend;
use crate::direction::Direction;
use crate::preview::{PreviewWriter, RenderRequest};
use crate::prompts::PromptSet;

#[derive(Clone, Debug)]
pub struct Translation {
    pub text: String,
    pub preview_path: PathBuf,
    /// Whether the preview carries sentence alignment.
    pub aligned: bool,
}

pub struct Translator<C> {
    chat: C,
    prompts: PromptSet,
    preview: PreviewWriter,
}

impl<C: ChatBackend> Translator<C> {
    pub fn new(chat: C, prompts: PromptSet, preview: PreviewWriter) -> Self {
        Self {
            chat,
            prompts,
            preview,
        }
    }

    pub fn translate(&self, query: &str, direction: Direction) -> anyhow::Result<Translation> {
        let system_prompt = self.prompts.system_prompt(direction);
        let response = self
            .chat
            .chat(&system_prompt, query)
            .context("translate request")?;
        let response = response.trim();
        debug!(response, "model response");

        let (text, preview_path, aligned) = match extract_pairs(response) {
            Some(pairs) => {
                let path = self
                    .preview
                    .write(&RenderRequest::aligned(direction, &pairs))?;
                (joined_translation(&pairs), path, true)
            }
            None => {
                let path = self
                    .preview
                    .write(&RenderRequest::unaligned(direction, query, response))?;
                (response.to_string(), path, false)
            }
        };
        info!(?direction, aligned, preview = %preview_path.display(), "translated");
        Ok(Translation {
            text,
            preview_path,
            aligned,
        })
    }
}
