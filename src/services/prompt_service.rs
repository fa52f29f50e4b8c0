use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::prompts::{
    CONTEXTS, IMAGE_OUTPUT, PROMPT_INTRO, PROMPT_REQUIREMENTS, SCENARIOS, TEXT_ONLY_OUTPUT,
};
use crate::models::domain::question::MAX_QUESTION_CHARS;

/// Whether the model is asked for the bare question or a `{question, image_prompt}` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    TextOnly,
    WithImage,
}

pub fn pick_context<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CONTEXTS.choose(rng).copied().unwrap_or(CONTEXTS[0])
}

pub fn pick_scenario<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SCENARIOS.choose(rng).copied().unwrap_or(SCENARIOS[0])
}

/// One `- question` line per earlier question, text left untouched.
fn previous_questions_list(previous_questions: &[String]) -> String {
    if previous_questions.is_empty() {
        return "- (nessuna)".to_string();
    }
    previous_questions
        .iter()
        .map(|question| format!("- {}", question))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assembles the instruction sent to the model.
///
/// Previous questions are embedded verbatim as a list so the model can avoid
/// repeating them. The output is a pure function of the arguments.
pub fn build_prompt(
    context: &str,
    previous_questions: &[String],
    scenario: &str,
    variant: PromptVariant,
) -> String {
    let output_rules = match variant {
        PromptVariant::TextOnly => TEXT_ONLY_OUTPUT,
        PromptVariant::WithImage => IMAGE_OUTPUT,
    };

    format!(
        "{intro}\n\
         Il contesto in cui si inserisce la domanda è: {context}.\n\
         Lo scenario della domanda è: {scenario}.\n\
         \n\
         Evita completamente i modelli di domande già usati.\n\
         Questi sono esempi di domande già fatte:\n\
         {previous}\n\
         \n\
         {requirements}\n\
         - La domanda deve contenere al massimo {max_chars} caratteri.\n\
         {output_rules}\n",
        intro = PROMPT_INTRO,
        context = context,
        scenario = scenario,
        previous = previous_questions_list(previous_questions),
        requirements = PROMPT_REQUIREMENTS,
        max_chars = MAX_QUESTION_CHARS,
        output_rules = output_rules,
    )
}
