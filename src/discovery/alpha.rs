use serde::{Deserialize, Serialize};

use super::patterns::{apply_overrides, extract_maximal_patterns, YPattern};
use super::relations::ActivityRelations;
use crate::event_log::activity_projection::EventLogActivityProjection;
use crate::petri_net::petri_net_struct::{NodeRef, PetriNet, PetriNetError};

/// Default bound on the activity count accepted by discovery
///
/// Pattern extraction enumerates activity subsets and is exponential in the
/// activity count; discovery refuses logs beyond the bound instead of
/// hanging.
pub const DEFAULT_MAX_ACTIVITIES: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// An explicitly supplied place pattern, by activity label
///
/// Applied after maximal-pattern extraction: the pattern is added and every
/// mined pattern it dominates is removed. This expresses process shapes the
/// alpha axioms cannot mine, e.g. a join over predecessors that are not
/// mutually exclusive.
pub struct PatternOverride {
    /// Input activity labels
    pub inputs: Vec<String>,
    /// Output activity labels
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Algorithm parameters for alpha discovery
pub struct AlphaConfig {
    /// Maximum number of distinct activities accepted (guard against the
    /// exponential pattern enumeration)
    pub max_activities: usize,
    /// Place patterns to force into the mined model
    pub overrides: Vec<PatternOverride>,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            max_activities: DEFAULT_MAX_ACTIVITIES,
            overrides: Vec::new(),
        }
    }
}

impl AlphaConfig {
    /// Serialize alpha parameters to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
    /// Deserialize alpha parameters from JSON string
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap()
    }
}

#[derive(Debug, Clone)]
/// Errors that can occur during alpha discovery
pub enum AlphaMinerError {
    /// The log has more distinct activities than the configured bound
    TooManyActivities {
        /// Distinct activities in the log
        count: usize,
        /// Configured bound
        limit: usize,
    },
    /// A pattern override references an activity with no transition
    MissingTransition {
        /// The unresolvable activity label
        activity: String,
    },
    /// A pattern override has an empty input or output side
    ///
    /// Y-patterns are pairs of nonempty activity sets; an empty side would
    /// yield a place with no producers or no consumers.
    EmptyOverride(PatternOverride),
    /// Net construction produced a structurally invalid edge
    InvalidNet(PetriNetError),
}

impl std::fmt::Display for AlphaMinerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlphaMinerError::TooManyActivities { count, limit } => {
                write!(
                    f,
                    "Log has {count} distinct activities, more than the configured bound of {limit}"
                )
            }
            AlphaMinerError::MissingTransition { activity } => {
                write!(f, "No transition registered for activity {activity:?}")
            }
            AlphaMinerError::EmptyOverride(ov) => {
                write!(
                    f,
                    "Override pattern {:?} -> {:?} has an empty side; both activity sets must be nonempty",
                    ov.inputs, ov.outputs
                )
            }
            AlphaMinerError::InvalidNet(e) => {
                write!(f, "Structurally invalid net: {e}")
            }
        }
    }
}

impl std::error::Error for AlphaMinerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AlphaMinerError::InvalidNet(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PetriNetError> for AlphaMinerError {
    fn from(e: PetriNetError) -> Self {
        AlphaMinerError::InvalidNet(e)
    }
}

/// Resolve label-based overrides to activity-id patterns
fn resolve_overrides(
    log_proj: &EventLogActivityProjection,
    overrides: &[PatternOverride],
) -> Result<Vec<YPattern>, AlphaMinerError> {
    let resolve_side = |labels: &[String]| -> Result<Vec<usize>, AlphaMinerError> {
        let mut side = labels
            .iter()
            .map(|act| {
                log_proj
                    .act_to_index
                    .get(act)
                    .copied()
                    .ok_or_else(|| AlphaMinerError::MissingTransition {
                        activity: act.clone(),
                    })
            })
            .collect::<Result<Vec<usize>, AlphaMinerError>>()?;
        side.sort();
        side.dedup();
        Ok(side)
    };
    overrides
        .iter()
        .map(|ov| {
            if ov.inputs.is_empty() || ov.outputs.is_empty() {
                return Err(AlphaMinerError::EmptyOverride(ov.clone()));
            }
            Ok((resolve_side(&ov.inputs)?, resolve_side(&ov.outputs)?))
        })
        .collect()
}

///
/// Discover a [`PetriNet`] from an event log using the alpha algorithm
///
/// Computes the behavioral relations of the log, extracts the maximal
/// Y-patterns, applies the configured overrides and constructs the net:
/// one transition per activity (in first-appearance order), a start place
/// `P0` holding one initial token and feeding every trace-starting activity,
/// one place per pattern, and an end place fed by every trace-ending
/// activity. Running discovery twice on the same log yields an identical
/// net.
///
pub fn alpha_discover_petri_net(
    log_proj: &EventLogActivityProjection,
    config: &AlphaConfig,
) -> Result<PetriNet, AlphaMinerError> {
    let num_activities = log_proj.activities.len();
    if num_activities > config.max_activities {
        return Err(AlphaMinerError::TooManyActivities {
            count: num_activities,
            limit: config.max_activities,
        });
    }
    let relations = ActivityRelations::from_projection(log_proj);
    let patterns = extract_maximal_patterns(num_activities, &relations);
    let overrides = resolve_overrides(log_proj, &config.overrides)?;
    let mut patterns = apply_overrides(patterns, &overrides);
    // Pattern order decides place naming; sort by activity labels so place
    // ids do not depend on the enumeration order.
    patterns.sort_by_key(|(a, b)| (log_proj.acts_to_names(a), log_proj.acts_to_names(b)));

    let mut net = PetriNet::new();
    let transitions: Vec<_> = log_proj
        .activities
        .iter()
        .map(|act| net.add_transition(act.clone()))
        .collect();
    let by_label = |acts: &[usize]| -> Vec<usize> {
        let mut acts = acts.to_vec();
        acts.sort_by(|a, b| log_proj.activities[*a].cmp(&log_proj.activities[*b]));
        acts
    };

    let mut place_count = 0;
    let start_place = net.add_place(format!("P{place_count}"), 1);
    place_count += 1;
    net.start_place = Some(start_place);
    for act in log_proj.start_activities() {
        net.add_edge(NodeRef::Place(start_place), NodeRef::Transition(transitions[act]))?;
    }

    for (inputs, outputs) in &patterns {
        let place = net.add_place(format!("P{place_count}"), 0);
        place_count += 1;
        for act in by_label(inputs) {
            net.add_edge(NodeRef::Transition(transitions[act]), NodeRef::Place(place))?;
        }
        for act in by_label(outputs) {
            net.add_edge(NodeRef::Place(place), NodeRef::Transition(transitions[act]))?;
        }
    }

    let end_place = net.add_place(format!("P{place_count}"), 0);
    net.end_place = Some(end_place);
    for act in log_proj.end_activities() {
        net.add_edge(NodeRef::Transition(transitions[act]), NodeRef::Place(end_place))?;
    }
    Ok(net)
}
