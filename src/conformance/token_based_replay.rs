use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::event_log::activity_projection::EventLogActivityProjection;
use crate::petri_net::petri_net_struct::PetriNet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Token counters accumulated by token-based replay
pub struct TokenBasedReplayResult {
    /// Produced tokens (initial tokens count as produced)
    pub produced: u64,
    /// Consumed tokens (the final end-place consumption counts as consumed)
    pub consumed: u64,
    /// Tokens that had to be inserted to let a transition consume
    pub missing: u64,
    /// Tokens left in the marking after a trace
    pub remaining: u64,
}

impl TokenBasedReplayResult {
    /// Sum two counter sets
    fn add(self, other: Self) -> Self {
        Self {
            produced: self.produced + other.produced,
            consumed: self.consumed + other.consumed,
            missing: self.missing + other.missing,
            remaining: self.remaining + other.remaining,
        }
    }

    /// Weight the counters by a trace multiplicity
    fn scaled(self, weight: u64) -> Self {
        Self {
            produced: self.produced * weight,
            consumed: self.consumed * weight,
            missing: self.missing * weight,
            remaining: self.remaining * weight,
        }
    }

    /// Consumption fitness: `1 - missing / consumed`
    ///
    /// `None` when nothing was consumed (undefined ratio). Not clamped to
    /// `[0, 1]`.
    pub fn consumption_fitness(&self) -> Option<f64> {
        if self.consumed == 0 {
            return None;
        }
        Some(1.0 - self.missing as f64 / self.consumed as f64)
    }

    /// Production fitness: `1 - remaining / produced`
    ///
    /// `None` when nothing was produced (undefined ratio). Not clamped to
    /// `[0, 1]`.
    pub fn production_fitness(&self) -> Option<f64> {
        if self.produced == 0 {
            return None;
        }
        Some(1.0 - self.remaining as f64 / self.produced as f64)
    }

    /// Headline score: production fitness, rounded to 5 decimal places
    pub fn fitness(&self) -> Option<f64> {
        self.production_fitness()
            .map(|f| (f * 100_000.0).round() / 100_000.0)
    }
}

///
/// Replay an event log against a [`PetriNet`], tallying token counters
///
/// Each distinct trace is replayed on a private copy of the initial marking,
/// weighted by its multiplicity; traces run in parallel and their counters
/// sum. Replay never blocks on nonconformance: an activity without a
/// transition in the net is skipped with no effect, and a transition lacking
/// input tokens gets them inserted, counted as `missing`. After a trace, one
/// token is forcibly consumed from the designated end place if present
/// (`missing` otherwise), and leftover tokens count as `remaining`.
///
pub fn token_based_replay(
    log_proj: &EventLogActivityProjection,
    net: &PetriNet,
) -> TokenBasedReplayResult {
    let resolution: Vec<Option<usize>> = log_proj
        .activities
        .iter()
        .map(|act| net.resolve(act).map(|t| t.0))
        .collect();
    let initial = net.initial_marking();
    let initial_total: u64 = initial.iter().sum();
    log_proj
        .traces
        .par_iter()
        .map(|(trace, weight)| {
            let mut marking = initial.to_vec();
            let mut counts = TokenBasedReplayResult {
                produced: initial_total,
                ..Default::default()
            };
            for act in trace {
                let transition = match resolution[*act] {
                    Some(t) => &net.transitions[t],
                    // unknown-activity leniency: no effect
                    None => continue,
                };
                for p in &transition.inputs {
                    if marking[p.0] == 0 {
                        marking[p.0] = 1;
                        counts.missing += 1;
                    }
                }
                for p in &transition.inputs {
                    marking[p.0] -= 1;
                }
                for p in &transition.outputs {
                    marking[p.0] += 1;
                }
                counts.consumed += transition.inputs.len() as u64;
                counts.produced += transition.outputs.len() as u64;
            }
            if let Some(end) = net.end_place {
                if marking[end.0] > 0 {
                    marking[end.0] -= 1;
                    counts.consumed += 1;
                } else {
                    counts.missing += 1;
                }
            }
            counts.remaining = marking.iter().sum();
            counts.scaled(*weight)
        })
        .reduce(TokenBasedReplayResult::default, |a, b| a.add(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::alpha::{alpha_discover_petri_net, AlphaConfig};
    use crate::event_log::event_log_struct::{EventLog, Trace};

    fn projection(cases: &[&[&str]]) -> EventLogActivityProjection {
        let mut log = EventLog::new();
        for (i, acts) in cases.iter().enumerate() {
            log.push_trace(Trace::new(
                format!("case{}", i + 1),
                acts.iter().map(|a| a.to_string()).collect(),
            ));
        }
        (&log).into()
    }

    fn xor_net() -> PetriNet {
        let proj = projection(&[&["a", "b", "d"], &["a", "c", "d"]]);
        alpha_discover_petri_net(&proj, &AlphaConfig::default()).unwrap()
    }

    #[test]
    fn replaying_the_mining_log_is_perfectly_fit() {
        let proj = projection(&[&["a", "b", "d"], &["a", "c", "d"]]);
        let net = alpha_discover_petri_net(&proj, &AlphaConfig::default()).unwrap();
        let result = token_based_replay(&proj, &net);
        assert_eq!(result.missing, 0);
        assert_eq!(result.remaining, 0);
        assert_eq!(result.produced, result.consumed);
        assert_eq!(result.consumption_fitness(), Some(1.0));
        assert_eq!(result.production_fitness(), Some(1.0));
        assert_eq!(result.fitness(), Some(1.0));
    }

    #[test]
    fn incomplete_trace_leaves_missing_and_remaining_tokens() {
        let net = xor_net();
        let result = token_based_replay(&projection(&[&["a", "b"]]), &net);
        // initial token + one produced by a + one by b; end place stays empty
        assert_eq!(result.produced, 3);
        assert_eq!(result.consumed, 2);
        assert_eq!(result.missing, 1);
        assert_eq!(result.remaining, 1);
        assert_eq!(result.consumption_fitness(), Some(0.5));
        assert_eq!(result.fitness(), Some(0.66667));
    }

    #[test]
    fn unknown_activities_are_skipped_without_effect() {
        let net = xor_net();
        let with_noise = token_based_replay(&projection(&[&["a", "Z", "b", "d"]]), &net);
        let clean = token_based_replay(&projection(&[&["a", "b", "d"]]), &net);
        assert_eq!(with_noise, clean);
        assert_eq!(with_noise.missing, 0);
    }

    #[test]
    fn trace_multiplicity_weights_the_counters() {
        let net = xor_net();
        let once = token_based_replay(&projection(&[&["a", "b"]]), &net);
        let thrice = token_based_replay(&projection(&[&["a", "b"], &["a", "b"], &["a", "b"]]), &net);
        assert_eq!(thrice.produced, 3 * once.produced);
        assert_eq!(thrice.consumed, 3 * once.consumed);
        assert_eq!(thrice.missing, 3 * once.missing);
        assert_eq!(thrice.remaining, 3 * once.remaining);
        assert_eq!(thrice.fitness(), once.fitness());
    }

    #[test]
    fn fitness_is_not_clamped() {
        let net = xor_net();
        // b fires without its input token and the case never completes
        let result = token_based_replay(&projection(&[&["b"]]), &net);
        assert_eq!(result.missing, 2);
        assert_eq!(result.consumed, 1);
        assert!(result.consumption_fitness().unwrap() < 0.0);
    }

    #[test]
    fn re_added_input_edges_do_not_double_consume() {
        use crate::petri_net::petri_net_struct::NodeRef;
        let mut net = PetriNet::new();
        let p1 = net.add_place("p1", 1);
        let p2 = net.add_place("p2", 0);
        let a = net.add_transition("a");
        net.add_edge(NodeRef::Place(p1), NodeRef::Transition(a)).unwrap();
        net.add_edge(NodeRef::Place(p1), NodeRef::Transition(a)).unwrap();
        net.add_edge(NodeRef::Transition(a), NodeRef::Place(p2)).unwrap();
        net.end_place = Some(p2);

        let result = token_based_replay(&projection(&[&["a"]]), &net);
        assert_eq!(result.missing, 0);
        assert_eq!(result.consumed, 2);
        assert_eq!(result.produced, 2);
        assert_eq!(result.remaining, 0);
        assert_eq!(result.fitness(), Some(1.0));
    }

    #[test]
    fn empty_net_has_undefined_fitness() {
        let net = PetriNet::new();
        let result = token_based_replay(&projection(&[&["a", "b"]]), &net);
        assert_eq!(result.produced, 0);
        assert_eq!(result.consumed, 0);
        assert_eq!(result.consumption_fitness(), None);
        assert_eq!(result.production_fitness(), None);
        assert_eq!(result.fitness(), None);
    }
}
