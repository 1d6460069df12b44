use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::event_log::activity_projection::EventLogActivityProjection;

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Behavioral relations between activities, inferred from direct succession
///
/// For activities `a`, `b` of a log:
/// - `(a,b)` is in `direct_succession` iff some trace contains `a` immediately
///   followed by `b`
/// - `causality(a,b)` iff `(a,b)` is a direct succession but `(b,a)` is not
/// - `choice(a,b)` iff `a != b` and neither `(a,b)` nor `(b,a)` is a direct
///   succession
///
/// Self-pairs `(a,a)` are excluded from causality and choice. Activities that
/// directly follow each other in both orders (parallel) end up in neither
/// relation.
pub struct ActivityRelations {
    /// Immediate-follow pairs
    pub direct_succession: HashSet<(usize, usize)>,
    /// One-directional direct succession
    pub causality: HashSet<(usize, usize)>,
    /// Pairs never directly following each other (symmetric)
    pub choice: HashSet<(usize, usize)>,
}

impl ActivityRelations {
    /// Compute the relations over all activities of the projection
    pub fn from_projection(log: &EventLogActivityProjection) -> Self {
        let mut direct_succession: HashSet<(usize, usize)> = HashSet::new();
        for (trace, _) in &log.traces {
            for pair in trace.windows(2) {
                direct_succession.insert((pair[0], pair[1]));
            }
        }
        let causality: HashSet<(usize, usize)> = direct_succession
            .iter()
            .filter(|(a, b)| !direct_succession.contains(&(*b, *a)))
            .copied()
            .collect();
        let n = log.activities.len();
        let choice: HashSet<(usize, usize)> = (0..n)
            .flat_map(|a| (0..n).map(move |b| (a, b)))
            .filter(|(a, b)| {
                a != b
                    && !direct_succession.contains(&(*a, *b))
                    && !direct_succession.contains(&(*b, *a))
            })
            .collect();
        Self {
            direct_succession,
            causality,
            choice,
        }
    }

    /// Whether `a` causes `b`
    pub fn causes(&self, a: usize, b: usize) -> bool {
        self.causality.contains(&(a, b))
    }

    /// Whether `a` and `b` are in the choice relation
    pub fn in_choice(&self, a: usize, b: usize) -> bool {
        self.choice.contains(&(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::event_log_struct::{EventLog, Trace};

    fn sample_log() -> EventLog {
        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("case1", vec!["A", "B", "D", "E", "F", "G", "H"]),
            ("case2", vec!["A", "B", "D", "G", "H", "E", "F"]),
            ("case3", vec!["A", "B", "C"]),
        ];
        let mut log = EventLog::new();
        for (case, acts) in cases {
            log.push_trace(Trace::new(case, acts.iter().map(|a| a.to_string()).collect()));
        }
        log
    }

    #[test]
    fn relations_on_sample_log() {
        let proj: EventLogActivityProjection = (&sample_log()).into();
        let rel = ActivityRelations::from_projection(&proj);
        let id = |a: &str| proj.act_to_index[a];

        assert!(rel.causes(id("A"), id("B")));
        assert!(!rel.causes(id("B"), id("A")));
        // E and C never directly follow each other
        assert!(rel.in_choice(id("E"), id("C")));
        assert!(rel.in_choice(id("C"), id("E")));
        // G -> H occurs in both traces, H -> G never
        assert!(rel.causes(id("G"), id("H")));
        // H -> E only in case2, E -> H never
        assert!(rel.causes(id("H"), id("E")));
        // D is followed by E and by G, neither reversed
        assert!(rel.causes(id("D"), id("E")));
        assert!(rel.causes(id("D"), id("G")));
    }

    #[test]
    fn self_pairs_are_excluded() {
        let proj: EventLogActivityProjection = (&sample_log()).into();
        let rel = ActivityRelations::from_projection(&proj);
        for a in 0..proj.activities.len() {
            assert!(!rel.causes(a, a));
            assert!(!rel.in_choice(a, a));
        }
    }

    #[test]
    fn parallel_pairs_are_in_neither_relation() {
        let mut log = EventLog::new();
        log.push_trace(Trace::new("c1", vec!["A".into(), "B".into(), "C".into()]));
        log.push_trace(Trace::new("c2", vec!["A".into(), "C".into(), "B".into()]));
        let proj: EventLogActivityProjection = (&log).into();
        let rel = ActivityRelations::from_projection(&proj);
        let (b, c) = (proj.act_to_index["B"], proj.act_to_index["C"]);
        assert!(rel.direct_succession.contains(&(b, c)));
        assert!(rel.direct_succession.contains(&(c, b)));
        assert!(!rel.causes(b, c));
        assert!(!rel.causes(c, b));
        assert!(!rel.in_choice(b, c));
    }
}
