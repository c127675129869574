use mus_oracle::{ContradictionError, OracleError};
use prop_logic::Node;
use thiserror::Error;

use crate::trace_model::TraceIndexOutOfRange;

#[derive(Clone, Debug, Error)]
pub enum ExplanationError {
    #[error("expression stack must contain at least the subject")]
    EmptyExpressionStack,
    #[error("`{0}` is not a clause of a regular CNF")]
    NotAClause(Node),
    #[error("oracle holds {actual} clauses before pushing, trace model accounts for {expected}")]
    MisalignedOracle { expected: usize, actual: usize },
    /// push 中の矛盾．`explanation()` は説明なしとして扱い，呼び出し元には返さない
    #[error(transparent)]
    Contradiction(#[from] ContradictionError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Trace(#[from] TraceIndexOutOfRange),
}
