pub mod github_service;
pub mod parser_service;
pub mod question_bank_service;
pub mod sampler_service;
pub mod scoring_service;
pub mod session_service;
pub mod store_service;
