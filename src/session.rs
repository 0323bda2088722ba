use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A question/answer unit as it arrives from a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub question: String,
    pub answer: String,
}

impl Pair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A question together with the answer index that satisfies it, fixed at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub correct_answer: usize,
}

/// Authoritative record of one loaded deck and the player's progress on it.
///
/// The assignment is kept as two vectors in lockstep: `slots[q] == Some(a)`
/// iff `placed[a] == Some(q)`. Only the engine mutates it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    questions: Vec<Question>,
    answers: Vec<String>,
    pub(crate) slots: Vec<Option<usize>>,
    pub(crate) placed: Vec<Option<usize>>,
    pub(crate) results: Option<Vec<bool>>,
    order: Vec<usize>,
}

impl SessionState {
    pub fn new(pairs: Vec<Pair>) -> Self {
        let mut state = Self::default();
        state.load_pairs(pairs);
        state
    }

    /// Replaces the deck wholesale. Progress and results are dropped and the
    /// presentation order is regenerated.
    pub fn load_pairs(&mut self, pairs: Vec<Pair>) {
        self.load_pairs_with(pairs, &mut rand::thread_rng());
    }

    pub fn load_pairs_with<R: Rng + ?Sized>(&mut self, pairs: Vec<Pair>, rng: &mut R) {
        let n = pairs.len();
        let (questions, answers): (Vec<Question>, Vec<String>) = pairs
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                (
                    Question {
                        text: p.question,
                        correct_answer: i,
                    },
                    p.answer,
                )
            })
            .unzip();

        self.questions = questions;
        self.answers = answers;
        self.slots = vec![None; n];
        self.placed = vec![None; n];
        self.results = None;
        self.reshuffle_with(rng);
    }

    /// New uniform permutation of answer indices. Assignment and results are untouched.
    pub fn reshuffle(&mut self) {
        self.reshuffle_with(&mut rand::thread_rng());
    }

    pub fn reshuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order = (0..self.answers.len()).collect();
        self.order.shuffle(rng);
    }

    pub(crate) fn clear_progress(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.placed.iter_mut().for_each(|p| *p = None);
        self.results = None;
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, idx: usize) -> Option<&Question> {
        self.questions.get(idx)
    }

    pub fn answer(&self, idx: usize) -> Option<&str> {
        self.answers.get(idx).map(String::as_str)
    }

    /// Answer index currently placed on question `q`.
    pub fn assigned(&self, q: usize) -> Option<usize> {
        self.slots.get(q).copied().flatten()
    }

    /// Question currently holding answer `a`.
    pub fn holder_of(&self, a: usize) -> Option<usize> {
        self.placed.get(a).copied().flatten()
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Snapshot of the question → answer mapping, in question order.
    pub fn assignment(&self) -> Vec<(usize, usize)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(q, a)| a.map(|a| (q, a)))
            .collect()
    }

    pub fn results(&self) -> Option<&[bool]> {
        self.results.as_deref()
    }

    pub fn is_checked(&self) -> bool {
        self.results.is_some()
    }

    pub fn presentation_order(&self) -> &[usize] {
        &self.order
    }

    /// Answers not yet placed, in presentation order.
    pub fn available_answers(&self) -> Vec<usize> {
        self.order
            .iter()
            .copied()
            .filter(|&a| self.placed[a].is_none())
            .collect()
    }
}
