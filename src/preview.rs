use std::path::{Path, PathBuf};

use anyhow::Context;
use quick_xml::escape::escape;
use tracing::debug;

use crate::align::SentencePair;
use crate::direction::Direction;

pub const PREVIEW_FILE_NAME: &str = "alfred_ollama_translate.html";

/// `<temp dir>/alfred_ollama_translate.html`
pub fn default_preview_path() -> PathBuf {
    std::env::temp_dir().join(PREVIEW_FILE_NAME)
}

#[derive(Clone, Copy, Debug)]
pub enum PreviewBody<'a> {
    Aligned(&'a [SentencePair]),
    Unaligned {
        original: &'a str,
        translation: &'a str,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct RenderRequest<'a> {
    pub direction: Direction,
    pub body: PreviewBody<'a>,
}

impl<'a> RenderRequest<'a> {
    pub fn aligned(direction: Direction, pairs: &'a [SentencePair]) -> Self {
        Self {
            direction,
            body: PreviewBody::Aligned(pairs),
        }
    }

    pub fn unaligned(direction: Direction, original: &'a str, translation: &'a str) -> Self {
        Self {
            direction,
            body: PreviewBody::Unaligned {
                original,
                translation,
            },
        }
    }
}

/// Writes preview documents to one fixed path. Every write replaces the previous document.
pub struct PreviewWriter {
    path: PathBuf,
}

impl PreviewWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, request: &RenderRequest<'_>) -> anyhow::Result<PathBuf> {
        let html = render_document(request);
        std::fs::write(&self.path, html)
            .with_context(|| format!("write preview: {}", self.path.display()))?;
        debug!(path = %self.path.display(), "preview written");
        Ok(self.path.clone())
    }
}

impl Default for PreviewWriter {
    fn default() -> Self {
        Self::new(default_preview_path())
    }
}

pub fn render_document(request: &RenderRequest<'_>) -> String {
    let (left_label, right_label) = request.direction.panel_labels();
    let (left_html, right_html, interactive) = match request.body {
        PreviewBody::Aligned(pairs) => {
            let (left, right) = aligned_panels(pairs);
            (left, right, true)
        }
        PreviewBody::Unaligned {
            original,
            translation,
        } => (
            escape(original).into_owned(),
            escape(translation).into_owned(),
            false,
        ),
    };
    let (highlight_css, highlight_js) = if interactive {
        (HIGHLIGHT_CSS, HIGHLIGHT_JS)
    } else {
        ("", "")
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
{BASE_CSS}{highlight_css}</style>
</head>
<body>
<div class="container">
  <div class="panel" id="left">
    <div class="label">{left_label}</div>
    <div class="text">{left_html}</div>
  </div>
  <div class="panel" id="right">
    <div class="label">{right_label}</div>
    <div class="text">{right_html}</div>
  </div>
</div>
{highlight_js}
</body>
</html>"#
    )
}

fn aligned_panels(pairs: &[SentencePair]) -> (String, String) {
    let mut left = Vec::with_capacity(pairs.len());
    let mut right = Vec::with_capacity(pairs.len());
    for (i, p) in pairs.iter().enumerate() {
        left.push(tagged_span(i, &p.src));
        right.push(tagged_span(i, &p.tgt));
    }
    (left.join(" "), right.join(" "))
}

fn tagged_span(key: usize, text: &str) -> String {
    format!(r#"<span class="s" data-i="{key}">{}</span>"#, escape(text))
}

const BASE_CSS: &str = r#"  body {
    font-family: -apple-system, BlinkMacSystemFont, sans-serif;
    margin: 0; padding: 20px;
    background: #fff; color: #222;
  }
  @media (prefers-color-scheme: dark) {
    body { background: #1e1e1e; color: #ddd; }
    .panel { background: #2a2a2a; border-color: #444; }
    .s.active { background: rgba(255, 196, 0, 0.2); }
  }
  .container { display: flex; gap: 20px; }
  .panel {
    flex: 1; padding: 16px; border: 1px solid #ddd;
    border-radius: 8px; background: #f9f9f9;
  }
  .label {
    font-size: 12px; font-weight: 600; color: #888;
    text-transform: uppercase; margin-bottom: 8px;
  }
  .text { font-size: 16px; line-height: 1.6; white-space: pre-wrap; }
"#;

const HIGHLIGHT_CSS: &str = r#"  .s { cursor: pointer; border-radius: 3px; padding: 1px 0; transition: background 0.15s; }
  .s.active { background: rgba(255, 196, 0, 0.3); }
"#;

// Two states: idle (active === null) or one pair highlighted (active === key).
const HIGHLIGHT_JS: &str = r#"<script>
(function () {
  var selection = {
    active: null,
    clear: function () {
      document.querySelectorAll('.s.active').forEach(function (el) { el.classList.remove('active'); });
      this.active = null;
    },
    select: function (key) {
      this.clear();
      document.querySelectorAll('.s').forEach(function (el) {
        if (el.dataset.i === key) { el.classList.add('active'); }
      });
      this.active = key;
    }
  };
  document.querySelectorAll('.s').forEach(function (el) {
    el.addEventListener('click', function (e) {
      e.stopPropagation();
      selection.select(this.dataset.i);
    });
  });
  document.addEventListener('click', function () { selection.clear(); });
})();
</script>"#;
