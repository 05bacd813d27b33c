use std::collections::HashMap;

use crate::config::scoring::ScoringMode;
use crate::modules::assignments::model::QuestionWithOptions;

/// Counts the questions answered correctly.
///
/// `answers` maps question id to the selected option id. Option ids start at
/// 1, so an answer of 0 is the same as no answer.
pub fn score_answers(
    questions: &[QuestionWithOptions],
    answers: &HashMap<i64, i64>,
    mode: ScoringMode,
) -> i32 {
    questions
        .iter()
        .filter(|question| {
            let selected = answers
                .get(&question.question.id)
                .copied()
                .filter(|&id| id != 0);
            let correct = question.correct_option_id();
            match mode {
                ScoringMode::Literal => selected == correct,
                ScoringMode::Strict => correct.is_some() && selected == correct,
            }
        })
        .count() as i32
}
