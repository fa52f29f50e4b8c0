pub mod chat_member;
pub mod question;
pub use chat_member::ChatMember;
pub use question::{GeneratedQuestion, NewQuestion, QuestionRecord};
