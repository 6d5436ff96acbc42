//! Static reflective prompt templates.
//!
//! There is no inference here: prompts are fixed strings parameterized by a
//! year. Generation is deterministic so the same year always yields the same
//! pair of questions; persistence is the store's job, not this module's.

use crate::question::QuestionKind;

/// The fixed template pool. `{year}` is substituted on render.
const TEMPLATES: &[(QuestionKind, &str)] = &[
    (
        QuestionKind::Reflection,
        "What moment from {year} do you remember most vividly?",
    ),
    (
        QuestionKind::People,
        "Who were the most important people in your life in {year}?",
    ),
    (
        QuestionKind::Detail,
        "What did an ordinary day look like for you in {year}?",
    ),
    (
        QuestionKind::Gap,
        "What happened in {year} that you have never written down?",
    ),
    (
        QuestionKind::Followup,
        "How did the events of {year} shape the years that followed?",
    ),
];

/// A rendered template, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPrompt {
    pub kind: QuestionKind,
    pub question: String,
}

/// Number of questions generated per year.
pub const QUESTIONS_PER_YEAR: usize = 2;

/// Deterministically render exactly two distinct prompts for a year.
///
/// The year picks the starting template, the second prompt is the next
/// template in the pool, so consecutive years see different pairs.
///
/// ```
/// use memoir_core::prompts::questions_for_year;
///
/// let [first, second] = questions_for_year(2015);
/// assert!(first.question.contains("2015"));
/// assert_ne!(first.question, second.question);
/// assert_eq!(questions_for_year(2015), questions_for_year(2015));
/// ```
pub fn questions_for_year(year: i32) -> [GeneratedPrompt; 2] {
    let first = year.rem_euclid(TEMPLATES.len() as i32) as usize;
    let second = (first + 1) % TEMPLATES.len();
    [render(first, year), render(second, year)]
}

fn render(index: usize, year: i32) -> GeneratedPrompt {
    let (kind, template) = TEMPLATES[index];
    GeneratedPrompt {
        kind,
        question: template.replace("{year}", &year.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_two_prompts_per_year() {
        let prompts = questions_for_year(2015);
        assert_eq!(prompts.len(), QUESTIONS_PER_YEAR);
    }

    #[test]
    fn prompts_mention_the_year() {
        for prompt in questions_for_year(1987) {
            assert!(prompt.question.contains("1987"));
        }
    }

    #[test]
    fn the_two_prompts_differ() {
        let [first, second] = questions_for_year(2015);
        assert_ne!(first.question, second.question);
        assert_ne!(first.kind, second.kind);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(questions_for_year(2015), questions_for_year(2015));
    }

    #[test]
    fn consecutive_years_get_different_pairs() {
        let a = questions_for_year(2015);
        let b = questions_for_year(2016);
        assert_ne!(a[0].kind, b[0].kind);
    }

    #[test]
    fn negative_years_do_not_panic() {
        // rem_euclid keeps the index in range for years before year zero.
        let prompts = questions_for_year(-44);
        assert!(prompts[0].question.contains("-44"));
    }

    #[test]
    fn no_template_leaves_placeholder_unrendered() {
        for year in 1900..1906 {
            for prompt in questions_for_year(year) {
                assert!(!prompt.question.contains("{year}"));
            }
        }
    }
}
