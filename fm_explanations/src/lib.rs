mod clause_index_space;
mod creator;
mod error;
mod explanation;
mod invariant_presence_condition;
mod reason;
mod trace_model;

pub use creator::{ExplanationAlgorithm, ExplanationCreator};
pub use error::ExplanationError;
pub use explanation::Explanation;
pub use invariant_presence_condition::{
    InvariantPresenceCondition, MusInvariantPresenceConditionExplanationCreator,
};
pub use reason::Reason;
pub use trace_model::{TraceIndexOutOfRange, TraceModel, TracedConstraint};

pub use mus_oracle::{
    ContradictionError, DefaultOracleFactory, MusOracle, OracleConfig, OracleError,
    OracleFactory,
};
pub use prop_logic::{Boolean, Clause, Literal, Node};
