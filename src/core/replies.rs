use crate::core::curriculum::{Language, Level};

pub fn greeting(first_name: Option<&str>) -> String {
    let name = first_name.unwrap_or("there");
    format!(
        "👋 Hi {name}, I'm Conversa & I'm here to help you with your language learning!\n\
         Please choose the language you want to practise writing in today."
    )
}

pub fn choose_language_again() -> String {
    "🤔 I can only help with the languages below. Please pick one of them.".to_string()
}

pub fn choose_level(language: Language) -> String {
    format!("Great, {language} it is! Now please select the CEFR level you want to practise writing at.")
}

pub fn choose_level_again() -> String {
    "🤔 That isn't a CEFR level I know. Please pick one of A1, A2, B1, B2, C1 or C2.".to_string()
}

pub fn present_prompt(language: Language, level: Level, prompt: &str) -> String {
    format!(
        "📝 Your {language} {level} writing prompt:\n\n{prompt}\n\n\
         Write your answer and send it as a single message."
    )
}

pub fn submission_empty() -> String {
    "✏️ Your submission is empty. Please send the text you wrote for the prompt.".to_string()
}

pub fn present_feedback(feedback: &str) -> String {
    format!("🎓 Here is my feedback on your text:\n\n{feedback}\n\nSend /start to practise again.")
}

pub fn service_apology() -> String {
    "😔 Sorry, I couldn't reach my teaching service just now. Please send your last message again in a moment."
        .to_string()
}

pub fn farewell() -> String {
    "👋 Conversation cancelled. Send /start whenever you want to practise again.".to_string()
}

pub fn no_session() -> String {
    "ℹ️ There is no writing session in progress. Send /start to begin one.".to_string()
}

pub fn help() -> String {
    "Use the following commands to interact with me:\n\
     /start - Choose a language and level and get a writing prompt\n\
     /cancel - Stop the current writing session\n\
     /help - Show this message\n\
     /about - Learn more about Conversa"
        .to_string()
}

pub fn about() -> String {
    "Conversa is your friendly language teacher!\n\
     It gives you a writing prompt in Spanish or French at your CEFR level \
     and feedback on the text you write."
        .to_string()
}
