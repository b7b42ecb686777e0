use crate::{tracker::Tracker, weights::Weights, Assignment, Formula, Variable};
use rand::Rng;
use tracing::trace;

/// Index drawn from a probability distribution by walking its cumulative sum
pub fn sample(probabilities: &[f64], rng: &mut impl Rng) -> usize {
    debug_assert!(!probabilities.is_empty());
    let total: f64 = probabilities.iter().sum();
    let target = rng.gen::<f64>() * total;

    let mut cumulative = 0.0;
    let mut last_possible = 0;
    for (idx, p) in probabilities.iter().enumerate() {
        if *p > 0.0 {
            cumulative += p;
            last_possible = idx;
            if target < cumulative {
                return idx;
            }
        }
    }
    // Rounding can leave the target a hair past the final sum
    last_possible
}

/// Performs one probSAT move: picks an unsatisfied clause uniformly, then one
/// of its literals by weight, and flips that literal's variable.
///
/// Returns `None` without touching anything when every clause is satisfied.
pub fn weighted_flip<T: Tracker, R: Rng>(
    formula: &Formula,
    assignment: &mut Assignment,
    tracker: &mut T,
    weights: &Weights,
    rng: &mut R,
    probabilities: &mut Vec<f64>,
) -> Option<Variable> {
    let unsatisfied = tracker.unsatisfied_count();
    if unsatisfied == 0 {
        return None;
    }
    let clause = tracker.nth_unsatisfied(rng.gen_range(0, unsatisfied))?;

    weights.distribution(formula, clause, assignment, tracker, probabilities);
    let literal = formula[clause].literals()[sample(probabilities, rng)];

    trace!(clause, %literal, "flip");
    tracker.flip(formula, assignment, literal.var());
    Some(literal.var())
}

#[test]
fn sample_skips_impossible_entries() {
    use rand::{rngs::StdRng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..1000 {
        let idx = sample(&[0.0, 0.3, 0.0, 0.7, 0.0], &mut rng);
        assert!(idx == 1 || idx == 3);
    }
    assert_eq!(sample(&[0.0, 1.0], &mut rng), 1);
}

#[test]
fn sample_follows_weights() {
    use rand::{rngs::StdRng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(11);
    let hits = (0..10_000)
        .filter(|_| sample(&[0.2, 0.8], &mut rng) == 1)
        .count();
    assert!(hits > 7_500 && hits < 8_500, "hits = {}", hits);
}

#[test]
fn unit_clause_needs_one_flip() -> Result<(), crate::error::FormatError> {
    use crate::tracker::Counters;
    use rand::{rngs::StdRng, SeedableRng};

    let formula = Formula::new(1, vec![vec![1]])?;
    let mut assignment = Assignment::from(vec![false]);
    let mut tracker = Counters::new(&formula, &assignment);
    let mut rng = StdRng::seed_from_u64(0);
    let mut probabilities = Vec::new();

    let flipped = weighted_flip(
        &formula,
        &mut assignment,
        &mut tracker,
        &Weights::default(),
        &mut rng,
        &mut probabilities,
    );
    assert_eq!(flipped, Some(0));
    assert!(tracker.is_satisfied());
    assert!(formula.is_satisfied_by(&assignment));

    let again = weighted_flip(
        &formula,
        &mut assignment,
        &mut tracker,
        &Weights::default(),
        &mut rng,
        &mut probabilities,
    );
    assert_eq!(again, None);
    Ok(())
}
