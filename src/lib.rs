#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

///
/// Event logs and their activity projections
///
pub mod event_log {
    /// Activity projection of event logs
    pub mod activity_projection;
    /// [`EventLog`] struct and sub-structs
    pub mod event_log_struct;

    pub use activity_projection::EventLogActivityProjection;
    pub use event_log_struct::{EventLog, Trace};
}

///
/// Alpha-Miner process discovery
///
pub mod discovery {
    /// Discovery driver and Petri net construction
    pub mod alpha;
    /// Maximal Y-pattern extraction and overrides
    pub mod patterns;
    /// Behavioral relations (direct succession, causality, choice)
    pub mod relations;
}

///
/// Petri nets
///
pub mod petri_net {
    /// [`PetriNet`] struct
    pub mod petri_net_struct;

    #[doc(inline)]
    pub use petri_net_struct::PetriNet;
}

///
/// Conformance checking
///
pub mod conformance {
    /// Token-based replay
    pub mod token_based_replay;
}

#[doc(inline)]
pub use conformance::token_based_replay::{token_based_replay, TokenBasedReplayResult};
#[doc(inline)]
pub use discovery::alpha::{alpha_discover_petri_net, AlphaConfig, AlphaMinerError, PatternOverride};
#[doc(inline)]
pub use event_log::{EventLog, EventLogActivityProjection, Trace};
#[doc(inline)]
pub use petri_net::PetriNet;
