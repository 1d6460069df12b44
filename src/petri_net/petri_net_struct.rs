use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, PartialOrd, Ord)]
/// Place ID: index into the place arena of a [`PetriNet`]
pub struct PlaceID(pub usize);

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize, PartialOrd, Ord)]
/// Transition ID: index into the transition arena of a [`PetriNet`]
pub struct TransitionID(pub usize);

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
/// An edge endpoint: either a place or a transition
pub enum NodeRef {
    /// A place
    Place(PlaceID),
    /// A transition
    Transition(TransitionID),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Place in a Petri net
pub struct Place {
    /// Place label
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Transition in a Petri net, labeled with exactly one activity
pub struct Transition {
    /// Activity label
    pub label: String,
    /// Input places (one token consumed from each on firing)
    pub inputs: Vec<PlaceID>,
    /// Output places (one token produced in each on firing)
    pub outputs: Vec<PlaceID>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors for structurally invalid [`PetriNet`] modifications
pub enum PetriNetError {
    /// Edge endpoints are neither place→transition nor transition→place
    InvalidEdge {
        /// Source endpoint
        from: NodeRef,
        /// Target endpoint
        to: NodeRef,
    },
    /// An edge endpoint id is not registered in the net
    UnknownNode(NodeRef),
}

impl std::fmt::Display for PetriNetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PetriNetError::InvalidEdge { from, to } => {
                write!(
                    f,
                    "Invalid edge {from:?} -> {to:?}: edges must connect a place to a transition or a transition to a place"
                )
            }
            PetriNetError::UnknownNode(node) => {
                write!(f, "Unknown node {node:?}")
            }
        }
    }
}

impl std::error::Error for PetriNetError {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// A Petri net with token-based state
///
/// Bipartite graph of [`Place`]s and [`Transition`]s, indexed by small
/// integer ids. The structure is immutable after construction; only the
/// current marking changes, through [`PetriNet::fire`] and
/// [`PetriNet::reset`]. The marking at registration time is retained as the
/// initial marking.
pub struct PetriNet {
    /// Place arena
    pub places: Vec<Place>,
    /// Transition arena
    pub transitions: Vec<Transition>,
    /// Current marking: token count per place
    marking: Vec<u64>,
    /// Initial marking snapshot
    initial_marking: Vec<u64>,
    /// Lookup from place label to id
    place_ids: BTreeMap<String, PlaceID>,
    /// Designated start place, if any
    pub start_place: Option<PlaceID>,
    /// Designated end place, if any
    pub end_place: Option<PlaceID>,
}

impl PetriNet {
    /// Create a new [`PetriNet`] with no places or transitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a place with an initial token count
    ///
    /// Idempotent: re-registering a label returns the existing id unchanged.
    pub fn add_place<S: Into<String>>(&mut self, label: S, tokens: u64) -> PlaceID {
        let label: String = label.into();
        if let Some(id) = self.place_ids.get(&label) {
            return *id;
        }
        let id = PlaceID(self.places.len());
        self.place_ids.insert(label.clone(), id);
        self.places.push(Place { label });
        self.marking.push(tokens);
        self.initial_marking.push(tokens);
        id
    }

    /// Register a transition for an activity label, with no edges yet
    ///
    /// Ids are assigned sequentially in registration order.
    pub fn add_transition<S: Into<String>>(&mut self, label: S) -> TransitionID {
        let id = TransitionID(self.transitions.len());
        self.transitions.push(Transition {
            label: label.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        id
    }

    /// Add an edge between a place and a transition
    ///
    /// Place→transition extends the transition's inputs, transition→place its
    /// outputs. Any other endpoint combination is rejected. Inputs and
    /// outputs are sets: re-adding an existing edge is a no-op, so a
    /// transition never consumes or produces more than one token per place.
    pub fn add_edge(&mut self, from: NodeRef, to: NodeRef) -> Result<(), PetriNetError> {
        self.check_node(from)?;
        self.check_node(to)?;
        match (from, to) {
            (NodeRef::Place(p), NodeRef::Transition(t)) => {
                let inputs = &mut self.transitions[t.0].inputs;
                if !inputs.contains(&p) {
                    inputs.push(p);
                }
                Ok(())
            }
            (NodeRef::Transition(t), NodeRef::Place(p)) => {
                let outputs = &mut self.transitions[t.0].outputs;
                if !outputs.contains(&p) {
                    outputs.push(p);
                }
                Ok(())
            }
            _ => Err(PetriNetError::InvalidEdge { from, to }),
        }
    }

    fn check_node(&self, node: NodeRef) -> Result<(), PetriNetError> {
        let known = match node {
            NodeRef::Place(p) => p.0 < self.places.len(),
            NodeRef::Transition(t) => t.0 < self.transitions.len(),
        };
        if known {
            Ok(())
        } else {
            Err(PetriNetError::UnknownNode(node))
        }
    }

    /// Whether every input place of the transition holds at least one token
    ///
    /// `false` for unknown transition ids.
    pub fn is_enabled(&self, transition: TransitionID) -> bool {
        match self.transitions.get(transition.0) {
            Some(t) => t.inputs.iter().all(|p| self.marking[p.0] > 0),
            None => false,
        }
    }

    /// Fire a transition: consume one token from each input place, produce
    /// one token in each output place
    ///
    /// Atomic: if the transition is not enabled, nothing changes and `false`
    /// is returned.
    pub fn fire(&mut self, transition: TransitionID) -> bool {
        if !self.is_enabled(transition) {
            return false;
        }
        let t = &self.transitions[transition.0];
        for p in &t.inputs {
            self.marking[p.0] -= 1;
        }
        for p in &t.outputs {
            self.marking[p.0] += 1;
        }
        true
    }

    /// Restore the current marking to the initial marking
    pub fn reset(&mut self) {
        self.marking.copy_from_slice(&self.initial_marking);
    }

    /// Map an activity label to its transition id
    ///
    /// Returns the lowest id carrying the label, `None` if absent.
    pub fn resolve(&self, label: &str) -> Option<TransitionID> {
        self.transitions
            .iter()
            .position(|t| t.label == label)
            .map(TransitionID)
    }

    /// Current token count of a place (0 for unknown ids)
    pub fn tokens_at(&self, place: PlaceID) -> u64 {
        self.marking.get(place.0).copied().unwrap_or(0)
    }

    /// Sum of all tokens in the current marking
    pub fn total_tokens(&self) -> u64 {
        self.marking.iter().sum()
    }

    /// The current marking, indexed by place id
    pub fn marking(&self) -> &[u64] {
        &self.marking
    }

    /// The initial marking, indexed by place id
    pub fn initial_marking(&self) -> &[u64] {
        &self.initial_marking
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}
