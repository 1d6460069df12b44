use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A single case: an ordered sequence of activity occurrences
pub struct Trace {
    /// Case identifier
    pub case_id: String,
    /// Ordered activity labels observed for this case
    pub activities: Vec<String>,
}

impl Trace {
    /// Create a new [`Trace`] for the given case
    pub fn new<S: Into<String>>(case_id: S, activities: Vec<String>) -> Self {
        Self {
            case_id: case_id.into(),
            activities,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
/// An event log: the recorded [`Trace`]s of all cases
///
/// Decoding serialized trace formats (XES, CSV, ...) into this struct is the
/// responsibility of external collaborators.
pub struct EventLog {
    /// Traces contained in the log, one per case
    pub traces: Vec<Trace>,
}

impl EventLog {
    /// Create a new [`EventLog`] with no traces
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trace to the log
    pub fn push_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

impl From<Vec<(String, Vec<String>)>> for EventLog {
    fn from(cases: Vec<(String, Vec<String>)>) -> Self {
        Self {
            traces: cases
                .into_iter()
                .map(|(case_id, activities)| Trace { case_id, activities })
                .collect(),
        }
    }
}
