pub mod dialogue;
pub mod ui;
