pub mod curriculum;
pub mod grading;
pub mod lang_detect;
pub mod machine;
pub mod prompts;
pub mod replies;
pub mod services;
