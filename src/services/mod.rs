pub mod completion_json;
pub mod llm_service;
pub mod question_generator;
pub mod study_materials;
pub mod tutor;

pub use llm_service::{CompletionOptions, LlmService};
pub use question_generator::QuestionGenerator;
pub use study_materials::StudyMaterialService;
pub use tutor::TutorService;
