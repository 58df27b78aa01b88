pub mod github_dto;
pub mod question_bank_dto;
pub mod session_dto;
