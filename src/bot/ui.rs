use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

const BUTTONS_PER_ROW: usize = 3;

/// Telegram caps messages at 4096 UTF-16 units; emoji take two, hence the margin.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Inline keyboard whose callback data is the choice label, so a tap reads
/// the same as typing the label.
pub fn choices_menu(choices: &[String]) -> InlineKeyboardMarkup {
    let keyboard: Vec<Vec<InlineKeyboardButton>> = choices
        .chunks(BUTTONS_PER_ROW)
        .map(|row| {
            row.iter()
                .map(|choice| InlineKeyboardButton::callback(choice.clone(), choice.clone()))
                .collect()
        })
        .collect();

    InlineKeyboardMarkup::new(keyboard)
}

/// Splits `text` into pieces of at most `limit` characters, preferring to
/// break after a newline. Always yields at least one piece.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let hard_end = rest
            .char_indices()
            .nth(limit)
            .map_or(rest.len(), |(idx, _)| idx);
        let end = match rest[..hard_end].rfind('\n') {
            Some(idx) if idx > 0 => idx + 1,
            _ => hard_end,
        };
        chunks.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    chunks.push(rest.to_string());
    chunks
}
