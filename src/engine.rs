use crate::error::MatchError;
use crate::session::{Pair, SessionState};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Where a session stands for the currently loaded deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    Empty,
    Partial,
    Full,
    Checked,
}

/// Per-question feedback produced by a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFeedback {
    pub question_index: usize,
    pub question: String,
    pub given_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub correct: usize,
    pub incorrect: usize,
    pub items: Vec<ItemFeedback>,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    pub fn is_perfect(&self) -> bool {
        self.incorrect == 0 && self.correct > 0
    }

    pub fn summary(&self) -> Score {
        Score {
            correct: self.correct,
            incorrect: self.incorrect,
            placed: self.total(),
            total: self.total(),
        }
    }
}

/// Live figures for the score bar. `correct`/`incorrect` stay at zero until checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Score {
    pub correct: usize,
    pub incorrect: usize,
    pub placed: usize,
    pub total: usize,
}

/// Operations over a [`SessionState`]. Every mutation that touches the
/// assignment drops any validation result.
#[derive(Debug, Clone, Default)]
pub struct MatchEngine {
    state: SessionState,
}

impl MatchEngine {
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self {
            state: SessionState::new(pairs),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn load_pairs(&mut self, pairs: Vec<Pair>) {
        self.state.load_pairs(pairs);
        info!(pairs = self.state.len(), "deck loaded");
    }

    pub fn load_pairs_with<R: Rng + ?Sized>(&mut self, pairs: Vec<Pair>, rng: &mut R) {
        self.state.load_pairs_with(pairs, rng);
        info!(pairs = self.state.len(), "deck loaded");
    }

    pub fn reshuffle(&mut self) {
        self.state.reshuffle();
        debug!("answers reshuffled");
    }

    pub fn reshuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state.reshuffle_with(rng);
    }

    fn check_index(&self, index: usize) -> Result<(), MatchError> {
        let len = self.state.len();
        if index < len {
            Ok(())
        } else {
            Err(MatchError::OutOfRangeIndex { index, len })
        }
    }

    /// Places answer `a` on question `q`. If `a` sat on another question it
    /// moves; whatever answer `q` held becomes available again.
    pub fn assign(&mut self, q: usize, a: usize) -> Result<(), MatchError> {
        self.check_index(q)?;
        self.check_index(a)?;

        let st = &mut self.state;
        if let Some(prev_q) = st.placed[a].take() {
            st.slots[prev_q] = None;
        }
        if let Some(prev_a) = st.slots[q].take() {
            st.placed[prev_a] = None;
        }
        st.slots[q] = Some(a);
        st.placed[a] = Some(q);
        st.results = None;

        debug!(question = q, answer = a, "answer placed");
        Ok(())
    }

    pub fn unassign(&mut self, q: usize) -> Result<(), MatchError> {
        self.check_index(q)?;

        let st = &mut self.state;
        if let Some(a) = st.slots[q].take() {
            st.placed[a] = None;
            debug!(question = q, answer = a, "answer removed");
        }
        st.results = None;
        Ok(())
    }

    /// Scores a complete assignment. Nothing changes on error.
    pub fn validate(&mut self) -> Result<ValidationReport, MatchError> {
        let total = self.state.len();
        if total == 0 {
            return Err(MatchError::EmptyDataset);
        }
        let placed = self.state.assigned_count();
        if placed < total {
            return Err(MatchError::IncompleteAssignment {
                missing: total - placed,
            });
        }

        let items = self
            .state
            .questions()
            .iter()
            .enumerate()
            .filter_map(|(qi, question)| {
                let given = self.state.assigned(qi)?;
                Some(ItemFeedback {
                    question_index: qi,
                    question: question.text.clone(),
                    given_answer: self.state.answer(given).unwrap_or_default().to_string(),
                    correct_answer: self
                        .state
                        .answer(question.correct_answer)
                        .unwrap_or_default()
                        .to_string(),
                    is_correct: given == question.correct_answer,
                })
            })
            .collect::<Vec<_>>();

        let correct = items.iter().filter(|i| i.is_correct).count();
        self.state.results = Some(items.iter().map(|i| i.is_correct).collect());

        info!(correct, total, "assignment validated");
        Ok(ValidationReport {
            correct,
            incorrect: total - correct,
            items,
        })
    }

    /// Clears progress but keeps the deck and its presentation order.
    pub fn reset(&mut self) {
        self.state.clear_progress();
        debug!("progress reset");
    }

    pub fn reset_and_reshuffle(&mut self) {
        self.reset();
        self.reshuffle();
    }

    pub fn status(&self) -> SessionStatus {
        if self.state.is_checked() {
            return SessionStatus::Checked;
        }
        match self.state.assigned_count() {
            0 => SessionStatus::Empty,
            n if n == self.state.len() => SessionStatus::Full,
            _ => SessionStatus::Partial,
        }
    }

    pub fn score(&self) -> Score {
        let (correct, incorrect) = match self.state.results() {
            Some(results) => {
                let correct = results.iter().filter(|&&ok| ok).count();
                (correct, results.len() - correct)
            }
            None => (0, 0),
        };
        Score {
            correct,
            incorrect,
            placed: self.state.assigned_count(),
            total: self.state.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn engine(n: usize) -> MatchEngine {
        MatchEngine::new(
            (0..n)
                .map(|i| Pair::new(format!("q{i}"), format!("a{i}")))
                .collect(),
        )
    }

    #[test]
    fn assign_moves_answer_between_questions() {
        let mut e = engine(3);
        e.assign(0, 2).unwrap();
        e.assign(1, 2).unwrap();

        assert_eq!(e.state().assigned(0), None);
        assert_eq!(e.state().assigned(1), Some(2));
        assert_eq!(e.state().holder_of(2), Some(1));
    }

    #[test]
    fn assign_over_existing_frees_previous_answer() {
        let mut e = engine(3);
        e.assign(0, 1).unwrap();
        e.assign(0, 2).unwrap();

        assert_eq!(e.state().assigned(0), Some(2));
        assert_eq!(e.state().holder_of(1), None);
        assert!(e.state().available_answers().contains(&1));
    }

    #[test]
    fn assign_is_idempotent() {
        let mut e = engine(2);
        e.assign(1, 0).unwrap();
        e.assign(1, 0).unwrap();
        assert_eq!(e.state().assignment(), vec![(1, 0)]);
    }

    #[test]
    fn out_of_range_is_rejected_without_mutation() {
        let mut e = engine(2);
        e.assign(0, 0).unwrap();

        assert_matches!(
            e.assign(2, 0),
            Err(MatchError::OutOfRangeIndex { index: 2, len: 2 })
        );
        assert_matches!(
            e.assign(0, 5),
            Err(MatchError::OutOfRangeIndex { index: 5, len: 2 })
        );
        assert_matches!(e.unassign(9), Err(MatchError::OutOfRangeIndex { .. }));
        assert_eq!(e.state().assignment(), vec![(0, 0)]);
    }

    #[test]
    fn unassign_unbound_is_noop() {
        let mut e = engine(2);
        assert!(e.unassign(1).is_ok());
        assert_eq!(e.status(), SessionStatus::Empty);
    }

    #[test]
    fn validate_empty_dataset() {
        let mut e = engine(0);
        assert_matches!(e.validate(), Err(MatchError::EmptyDataset));
    }

    #[test]
    fn validate_incomplete_reports_missing() {
        let mut e = engine(4);
        e.assign(0, 0).unwrap();
        assert_matches!(
            e.validate(),
            Err(MatchError::IncompleteAssignment { missing: 3 })
        );
        assert_eq!(e.status(), SessionStatus::Partial);
    }

    #[test]
    fn validate_identity_is_perfect() {
        let mut e = engine(3);
        for i in 0..3 {
            e.assign(i, i).unwrap();
        }
        let report = e.validate().unwrap();
        assert_eq!(report.correct, 3);
        assert_eq!(report.incorrect, 0);
        assert!(report.is_perfect());
        assert_eq!(e.status(), SessionStatus::Checked);
    }

    #[test]
    fn validate_reports_given_and_correct_text() {
        let mut e = engine(2);
        e.assign(0, 1).unwrap();
        e.assign(1, 0).unwrap();
        let report = e.validate().unwrap();

        assert_eq!(report.correct, 0);
        let first = &report.items[0];
        assert_eq!(first.question, "q0");
        assert_eq!(first.given_answer, "a1");
        assert_eq!(first.correct_answer, "a0");
        assert!(!first.is_correct);
    }

    #[test]
    fn edits_clear_validation() {
        let mut e = engine(2);
        e.assign(0, 0).unwrap();
        e.assign(1, 1).unwrap();
        e.validate().unwrap();
        assert!(e.state().is_checked());

        e.assign(0, 0).unwrap();
        assert!(!e.state().is_checked());
        assert_eq!(e.status(), SessionStatus::Full);

        e.validate().unwrap();
        e.unassign(1).unwrap();
        assert!(!e.state().is_checked());
        assert_eq!(e.status(), SessionStatus::Partial);
    }

    #[test]
    fn reset_keeps_deck_and_order() {
        let mut e = engine(5);
        let order = e.state().presentation_order().to_vec();
        e.assign(0, 3).unwrap();
        e.reset();

        assert_eq!(e.status(), SessionStatus::Empty);
        assert_eq!(e.state().len(), 5);
        assert_eq!(e.state().presentation_order(), order.as_slice());
    }

    #[test]
    fn score_tracks_placed_and_checked_counts() {
        let mut e = engine(2);
        e.assign(0, 1).unwrap();
        assert_eq!(
            e.score(),
            Score {
                correct: 0,
                incorrect: 0,
                placed: 1,
                total: 2
            }
        );
        e.assign(1, 0).unwrap();
        e.validate().unwrap();
        assert_eq!(e.score().incorrect, 2);
    }
}
