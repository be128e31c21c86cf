//! Conversa: a Telegram writing tutor.
//!
//! The user picks a language and a CEFR level, receives a writing prompt,
//! submits a text and gets feedback on it.

pub mod bot;
pub mod core;
pub mod infrastructure;
