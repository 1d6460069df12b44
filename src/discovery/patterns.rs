use itertools::Itertools;

use super::relations::ActivityRelations;

/// A place candidate: input activity ids and output activity ids, both sorted
/// ascending and nonempty
pub type YPattern = (Vec<usize>, Vec<usize>);

/// Check whether `sub` is a subset of `sup` (both sorted ascending)
fn is_subset(sub: &[usize], sup: &[usize]) -> bool {
    let mut sup_iter = sup.iter();
    sub.iter().all(|x| sup_iter.any(|y| y == x))
}

/// Whether `(a, b)` is dominated by `(sup_a, sup_b)`
fn is_dominated(a: &[usize], b: &[usize], sup_a: &[usize], sup_b: &[usize]) -> bool {
    (a != sup_a || b != sup_b) && is_subset(a, sup_a) && is_subset(b, sup_b)
}

/// Enumerate all nonempty activity subsets that are pairwise in the choice
/// relation, in lexicographic order
///
/// The pairwise-choice condition is checked while extending a clique, so
/// branches failing it are pruned before any superset is generated. This
/// keeps the exponential subset enumeration bearable for the small activity
/// counts alpha mining targets, but it stays exponential in the worst case:
/// callers bound the activity count (see [`AlphaConfig`]).
///
/// [`AlphaConfig`]: super::alpha::AlphaConfig
fn choice_cliques(num_activities: usize, relations: &ActivityRelations) -> Vec<Vec<usize>> {
    fn extend(
        start: usize,
        num_activities: usize,
        relations: &ActivityRelations,
        current: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        for next in start..num_activities {
            if current.iter().all(|&m| relations.in_choice(m, next)) {
                current.push(next);
                out.push(current.clone());
                extend(next + 1, num_activities, relations, current, out);
                current.pop();
            }
        }
    }
    let mut cliques = Vec::new();
    extend(0, num_activities, relations, &mut Vec::new(), &mut cliques);
    cliques
}

/// Extract all maximal Y-patterns over the given activities
///
/// A pattern `(A, B)` is valid iff `A` and `B` are each pairwise in choice
/// and every member of `A` causes every member of `B`. A valid pattern is
/// maximal iff no other valid pattern has both a superset input side and a
/// superset output side. The result is an antichain under that dominance
/// order, sorted by `(A, B)` activity ids.
pub fn extract_maximal_patterns(
    num_activities: usize,
    relations: &ActivityRelations,
) -> Vec<YPattern> {
    let cliques = choice_cliques(num_activities, relations);
    // Only cliques whose members all have causal successors (resp.
    // predecessors) can form an input (resp. output) side.
    let input_sides: Vec<&Vec<usize>> = cliques
        .iter()
        .filter(|c| c.iter().all(|&a| (0..num_activities).any(|b| relations.causes(a, b))))
        .collect();
    let output_sides: Vec<&Vec<usize>> = cliques
        .iter()
        .filter(|c| c.iter().all(|&b| (0..num_activities).any(|a| relations.causes(a, b))))
        .collect();
    let valid: Vec<YPattern> = input_sides
        .iter()
        .cartesian_product(output_sides.iter())
        .filter(|(a, b)| {
            a.iter()
                .cartesian_product(b.iter())
                .all(|(x, y)| relations.causes(*x, *y))
        })
        .map(|(a, b)| (a.to_vec(), b.to_vec()))
        .collect();
    let mut maximal: Vec<YPattern> = valid
        .iter()
        .filter(|(a, b)| {
            !valid
                .iter()
                .any(|(sup_a, sup_b)| is_dominated(a, b, sup_a, sup_b))
        })
        .cloned()
        .collect();
    maximal.sort();
    maximal
}

/// Apply explicit override patterns to a maximal pattern set
///
/// Each override is added to the set and every pattern it dominates is
/// removed. This is the extension point for process shapes the alpha axioms
/// cannot express (e.g. an implicit join over non-exclusive predecessors);
/// the knowledge which patterns to force stays with the caller.
pub fn apply_overrides(mut patterns: Vec<YPattern>, overrides: &[YPattern]) -> Vec<YPattern> {
    for ov in overrides {
        patterns.retain(|(a, b)| !is_dominated(a, b, &ov.0, &ov.1));
        if !patterns.contains(ov) {
            patterns.push(ov.clone());
        }
    }
    patterns
}
