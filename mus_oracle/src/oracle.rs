use prop_logic::Clause;

use crate::error::{ContradictionError, OracleError};

/// MUS を取り出せる充足可能性判定器
///
/// 節番号は基礎式の節から順に 0 始まりで，push した順に割り当てられる
pub trait MusOracle {
    /// 基礎式と push 済みの節の合計
    fn number_of_clauses(&self) -> usize;

    /// 節を追加し，追加された節の数を返す
    ///
    /// 単位伝播だけで矛盾が確定した場合は節を追加せずに `ContradictionError` を返す
    fn push(&mut self, clause: &Clause) -> Result<usize, ContradictionError>;

    /// 最後に push した `number_of_clauses` 個の節を取り除く．基礎式の節は取り除けない
    fn pop(&mut self, number_of_clauses: usize) -> Result<(), OracleError>;

    fn is_satisfiable(&mut self) -> bool;

    /// MUS をひとつ求め，その節番号を昇順で返す
    fn minimal_unsatisfiable_subset_indexes(&mut self) -> Result<Vec<usize>, OracleError>;

    /// 見つかった全ての MUS の節番号の和集合を昇順で返す
    fn all_minimal_unsatisfiable_subset_indexes(&mut self) -> Result<Vec<usize>, OracleError>;
}
