pub mod question_repository;
pub mod supabase_question_repository;

pub use question_repository::QuestionRepository;
pub use supabase_question_repository::SupabaseQuestionRepository;

#[cfg(test)]
pub use question_repository::MockQuestionRepository;
