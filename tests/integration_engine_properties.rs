use std::collections::HashSet;

use assert_matches::assert_matches;
use matchit::{MatchEngine, MatchError, Pair, SessionStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engine(n: usize) -> MatchEngine {
    MatchEngine::new(
        (0..n)
            .map(|i| Pair::new(format!("question {i}"), format!("answer {i}")))
            .collect(),
    )
}

fn assert_injective(e: &MatchEngine) {
    let st = e.state();
    let mut seen = HashSet::new();
    for (q, a) in st.assignment() {
        assert!(seen.insert(a), "answer {a} bound twice");
        assert_eq!(st.holder_of(a), Some(q));
    }
    for a in 0..st.len() {
        if let Some(q) = st.holder_of(a) {
            assert_eq!(st.assigned(q), Some(a));
        }
    }
}

#[test]
fn exclusivity_holds_over_random_edits() {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 8;
    let mut e = engine(n);

    for _ in 0..2_000 {
        let q = rng.gen_range(0..n);
        if rng.gen_bool(0.8) {
            e.assign(q, rng.gen_range(0..n)).unwrap();
        } else {
            e.unassign(q).unwrap();
        }
        assert_injective(&e);
        assert_eq!(
            e.state().assigned_count() + e.state().available_answers().len(),
            n
        );
    }
}

#[test]
fn every_edit_clears_validation() {
    let mut rng = StdRng::seed_from_u64(3);
    let n = 5;
    let mut e = engine(n);

    for _ in 0..200 {
        for q in 0..n {
            e.assign(q, (q + rng.gen_range(0..n)) % n).unwrap();
        }
        // rotations may collide; fill whatever is left
        let open: Vec<usize> = (0..n).filter(|&q| e.state().assigned(q).is_none()).collect();
        for (q, a) in open.into_iter().zip(e.state().available_answers()) {
            e.assign(q, a).unwrap();
        }

        e.validate().unwrap();
        assert_eq!(e.status(), SessionStatus::Checked);

        let q = rng.gen_range(0..n);
        if rng.gen_bool(0.5) {
            e.assign(q, rng.gen_range(0..n)).unwrap();
        } else {
            e.unassign(q).unwrap();
        }
        assert!(!e.state().is_checked());
        assert!(e.state().results().is_none());
    }
}

#[test]
fn identity_assignment_scores_full_marks() {
    for n in 1..10 {
        let mut e = engine(n);
        for i in 0..n {
            e.assign(i, i).unwrap();
        }
        let report = e.validate().unwrap();
        assert_eq!((report.correct, report.total()), (n, n));
    }
}

#[test]
fn rotated_assignment_scores_zero() {
    for n in 2..10 {
        let mut e = engine(n);
        for i in 0..n {
            e.assign(i, (i + 1) % n).unwrap();
        }
        let report = e.validate().unwrap();
        assert_eq!(report.correct, 0);
        assert_eq!(report.incorrect, n);
    }
}

#[test]
fn incomplete_guard_reports_missing_and_leaves_state() {
    let n = 6;
    let mut e = engine(n);
    for placed in 0..n {
        let before = e.state().assignment();
        assert_matches!(
            e.validate(),
            Err(MatchError::IncompleteAssignment { missing }) if missing == n - placed
        );
        assert_eq!(e.state().assignment(), before);
        assert!(!e.state().is_checked());
        e.assign(placed, placed).unwrap();
    }
}

#[test]
fn reshuffle_only_permutes_presentation() {
    let mut rng = StdRng::seed_from_u64(11);
    let n = 10;
    let mut e = engine(n);
    for i in 0..n {
        e.assign(i, (i + 3) % n).unwrap();
    }
    e.validate().unwrap();
    let assignment = e.state().assignment();

    for _ in 0..20 {
        e.reshuffle_with(&mut rng);
        assert_eq!(e.state().assignment(), assignment);
        assert!(e.state().is_checked());

        let mut order = e.state().presentation_order().to_vec();
        order.sort_unstable();
        assert_eq!(order, (0..n).collect::<Vec<_>>());
    }
}

#[test]
fn four_pair_scenario() {
    let mut e = engine(4);
    e.assign(0, 2).unwrap();
    e.assign(1, 2).unwrap();
    assert_eq!(e.state().assigned(0), None, "answer 2 moved to question 1");

    e.assign(0, 0).unwrap();
    e.assign(2, 3).unwrap();
    e.assign(3, 1).unwrap();
    assert_eq!(e.state().assigned_count(), 4);
    assert_eq!(e.status(), SessionStatus::Full);

    let report = e.validate().unwrap();
    assert_eq!(report.correct, 1);
    let correct: Vec<usize> = report
        .items
        .iter()
        .filter(|i| i.is_correct)
        .map(|i| i.question_index)
        .collect();
    assert_eq!(correct, vec![0]);
    assert_eq!(e.state().results(), Some(&[true, false, false, false][..]));
}

#[test]
fn duplicate_answer_text_is_scored_by_index() {
    let mut e = MatchEngine::new(vec![
        Pair::new("small fast memory near the cpu", "Cache"),
        Pair::new("buffer between cpu and ram", "Cache"),
    ]);
    e.assign(0, 1).unwrap();
    e.assign(1, 0).unwrap();

    let report = e.validate().unwrap();
    assert_eq!(report.correct, 0);
    assert_eq!(report.items[0].given_answer, report.items[0].correct_answer);
}

#[test]
fn reload_replaces_everything() {
    let mut e = engine(3);
    e.assign(0, 0).unwrap();
    e.load_pairs(vec![Pair::new("x", "y")]);

    assert_eq!(e.state().len(), 1);
    assert_eq!(e.status(), SessionStatus::Empty);
    assert_matches!(e.assign(2, 0), Err(MatchError::OutOfRangeIndex { .. }));
}
