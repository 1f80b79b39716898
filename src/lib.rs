pub mod align;
pub mod chat;
pub mod config;
pub mod direction;
pub mod launcher;
pub mod logging;
pub mod preview;
pub mod prompts;
pub mod translate;
