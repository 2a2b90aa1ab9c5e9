pub mod auth_flow;
pub mod chat_session;
pub mod profile_flow;
pub mod study_flow;
pub mod test_flow;
pub mod test_session;

pub use auth_flow::{AuthFlow, SignUpForm};
pub use chat_session::ChatSession;
pub use profile_flow::{ProfileFlow, ProfileView, ProgressSummary, ScoreBand, TestReview};
pub use study_flow::{StudyFlow, StudyResult};
pub use test_flow::TestFlow;
pub use test_session::{Advance, SessionState, SubmitReason, TestOutcome, TestSession};
