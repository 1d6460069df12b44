use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::event_log_struct::EventLog;

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Projection of an event log on just activity labels
///
/// Activities are mapped to `usize` indices in order of first appearance in
/// the log, so that identical logs always yield identical indices. Duplicate
/// traces are aggregated into one entry with an occurrence multiplicity.
pub struct EventLogActivityProjection {
    /// Activity labels, indexed by activity id (first-appearance order)
    pub activities: Vec<String>,
    /// Lookup table from activity label to activity id
    pub act_to_index: HashMap<String, usize>,
    /// Distinct traces (as activity ids) with their occurrence multiplicity
    pub traces: Vec<(Vec<usize>, u64)>,
}

impl From<&EventLog> for EventLogActivityProjection {
    fn from(log: &EventLog) -> Self {
        let mut activities: Vec<String> = Vec::new();
        let mut act_to_index: HashMap<String, usize> = HashMap::new();
        let mut trace_index: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut traces: Vec<(Vec<usize>, u64)> = Vec::new();
        for trace in &log.traces {
            let mut trace_acts: Vec<usize> = Vec::with_capacity(trace.activities.len());
            for act in &trace.activities {
                let index = match act_to_index.get(act) {
                    Some(index) => *index,
                    None => {
                        let new_index = activities.len();
                        activities.push(act.clone());
                        act_to_index.insert(act.clone(), new_index);
                        new_index
                    }
                };
                trace_acts.push(index);
            }
            match trace_index.get(&trace_acts) {
                Some(pos) => traces[*pos].1 += 1,
                None => {
                    trace_index.insert(trace_acts.clone(), traces.len());
                    traces.push((trace_acts, 1));
                }
            }
        }
        Self {
            activities,
            act_to_index,
            traces,
        }
    }
}

impl EventLogActivityProjection {
    /// Map activity ids to their (sorted) labels
    pub fn acts_to_names(&self, acts: &[usize]) -> Vec<String> {
        let mut ret: Vec<String> = acts
            .iter()
            .map(|act| self.activities[*act].clone())
            .collect();
        ret.sort();
        ret
    }

    /// Activity ids starting some trace, sorted by label
    pub fn start_activities(&self) -> Vec<usize> {
        self.boundary_activities(|t| t.first())
    }

    /// Activity ids ending some trace, sorted by label
    pub fn end_activities(&self) -> Vec<usize> {
        self.boundary_activities(|t| t.last())
    }

    fn boundary_activities(&self, pick: impl Fn(&[usize]) -> Option<&usize>) -> Vec<usize> {
        let mut acts: Vec<usize> = self
            .traces
            .iter()
            .filter_map(|(t, _)| pick(t).copied())
            .collect();
        acts.sort_by(|a, b| self.activities[*a].cmp(&self.activities[*b]));
        acts.dedup();
        acts
    }
}
