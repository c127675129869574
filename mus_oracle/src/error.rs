use thiserror::Error;

/// 節を追加した時点で単位伝播だけで矛盾が確定した
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("clause #{clause_index} makes the pushed clauses contradictory")]
pub struct ContradictionError {
    /// 追加しようとした節に割り当てられるはずだった番号
    pub clause_index: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum OracleError {
    /// MUS は充足不能な式にしか存在しない
    #[error("formula of {number_of_clauses} clauses is satisfiable")]
    Satisfiable { number_of_clauses: usize },
    #[error("cannot pop {requested} clauses, only {pushed} were pushed")]
    PopUnderflow { requested: usize, pushed: usize },
}
