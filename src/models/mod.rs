pub mod catalog;
pub mod chat;
pub mod notice;
pub mod question;
pub mod record;

pub use catalog::{Catalog, StudySelection};
pub use chat::{ChatMessage, MessageKind};
pub use notice::{Notice, NoticeLevel};
pub use question::{Question, StudyVideo};
pub use record::{NewTestRecord, Profile, TestRecord};
