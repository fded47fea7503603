use rand::Rng;

use super::tables::FOLLOW_UP_QUESTIONS;

/// Confidence below this asks the user a clarifying question.
pub const FOLLOW_UP_THRESHOLD: f64 = 0.6;

/// Chooses one clarifying question out of a fixed list.
pub trait QuestionPicker: Send + Sync {
    fn pick(&self, questions: &'static [&'static str]) -> &'static str;
}

/// Uniform pick from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl QuestionPicker for RandomPicker {
    fn pick(&self, questions: &'static [&'static str]) -> &'static str {
        pick_with(&mut rand::thread_rng(), questions)
    }
}

/// Always returns the question at `index` (wrapping).
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl QuestionPicker for FixedPicker {
    fn pick(&self, questions: &'static [&'static str]) -> &'static str {
        if questions.is_empty() {
            return "";
        }
        questions[self.0 % questions.len()]
    }
}

/// Uniform pick driven by a caller-supplied generator.
pub fn pick_with<R: Rng + ?Sized>(rng: &mut R, questions: &'static [&'static str]) -> &'static str {
    if questions.is_empty() {
        return "";
    }
    questions[rng.gen_range(0..questions.len())]
}

/// Returns a follow-up question when `confidence` is too low, otherwise `None`.
pub fn follow_up_question(confidence: f64, picker: &dyn QuestionPicker) -> Option<String> {
    if confidence < FOLLOW_UP_THRESHOLD {
        Some(picker.pick(FOLLOW_UP_QUESTIONS).to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn low_confidence_asks_a_question() {
        let question = follow_up_question(0.3, &FixedPicker(1));
        assert_eq!(
            question.as_deref(),
            Some("Are these symptoms constant or do they come and go?")
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(follow_up_question(0.6, &FixedPicker(0)).is_none());
        assert!(follow_up_question(0.59, &FixedPicker(0)).is_some());
    }

    #[test]
    fn seeded_pick_is_repeatable() {
        let a = pick_with(&mut StdRng::seed_from_u64(7), FOLLOW_UP_QUESTIONS);
        let b = pick_with(&mut StdRng::seed_from_u64(7), FOLLOW_UP_QUESTIONS);
        assert_eq!(a, b);
        assert!(FOLLOW_UP_QUESTIONS.contains(&a));
    }

    #[test]
    fn random_picker_stays_in_list() {
        for _ in 0..20 {
            assert!(FOLLOW_UP_QUESTIONS.contains(&RandomPicker.pick(FOLLOW_UP_QUESTIONS)));
        }
    }
}
