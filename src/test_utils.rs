use crate::models::domain::QuestionRecord;

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    /// A stored question without image prompt.
    pub fn test_record(id: i64, context: &str) -> QuestionRecord {
        QuestionRecord {
            id,
            question: format!("Question {} about {}?", id, context),
            context: context.to_string(),
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid fixture date"),
            image_prompt: None,
        }
    }

    /// `count` stored questions for one context, ids starting at 1.
    pub fn test_records(context: &str, count: usize) -> Vec<QuestionRecord> {
        (1..=count as i64).map(|id| test_record(id, context)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_test_record() {
        let record = test_record(4, "crush");
        assert_eq!(record.id, 4);
        assert_eq!(record.question, "Question 4 about crush?");
        assert!(record.image_prompt.is_none());
    }

    #[test]
    fn test_fixtures_test_records() {
        let records = test_records("tabù", 3);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[2].id, 3);
    }
}
