pub mod question;
pub mod question_bank;
pub mod session;
