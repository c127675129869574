use std::collections::{HashSet, VecDeque};

use prop_logic::{Clause, Literal};
use tracing::{debug, trace};

use crate::{
    decision_stack::{DecisionStack, Reason},
    error::{ContradictionError, OracleError},
    factory::OracleConfig,
    oracle::MusOracle,
};

/// DPLL による MUS 抽出器
///
/// MUS は削除法で 1 つずつ縮小し，複数の MUS は hitting set tree で列挙する
pub struct DpllMusExtractor {
    clauses: Vec<Clause>,
    number_of_base_clauses: usize,
    number_of_variables: usize,
    max_subsets: usize,
}

impl DpllMusExtractor {
    pub fn new(clauses: Vec<Clause>, config: &OracleConfig) -> Self {
        let number_of_variables = clauses
            .iter()
            .filter_map(Clause::max_index)
            .max()
            .map_or(0, |index| index + 1);
        Self {
            number_of_base_clauses: clauses.len(),
            clauses,
            number_of_variables,
            max_subsets: config.max_subsets.max(1),
        }
    }

    pub fn number_of_base_clauses(&self) -> usize {
        return self.number_of_base_clauses;
    }

    fn solve(&self, enabled: &[bool]) -> bool {
        let mut decision_stack = DecisionStack::new(self.number_of_variables);
        loop {
            if decision_stack
                .propagate(&self.clauses, |clause_index| enabled[clause_index])
                .is_err()
            {
                if !decision_stack.flip_last_decision() {
                    return false;
                }
                continue;
            }
            let Some(index) = decision_stack.first_unassigned_variable() else {
                return true;
            };
            decision_stack.assign(Literal::negative(index), Reason::Decision { flipped: false });
        }
    }

    /// 充足不能な節集合を 1 節ずつ削って MUS にする
    fn shrink(&self, mut enabled: Vec<bool>) -> Vec<usize> {
        debug_assert!(!self.solve(&enabled));
        for clause_index in 0..self.clauses.len() {
            if !enabled[clause_index] {
                continue;
            }
            enabled[clause_index] = false;
            if self.solve(&enabled) {
                // この節がないと充足可能になるので MUS に必要
                enabled[clause_index] = true;
            }
        }
        return enabled
            .iter()
            .enumerate()
            .filter(|&(_, &is_enabled)| is_enabled)
            .map(|(clause_index, _)| clause_index)
            .collect();
    }

    fn satisfiable_error(&self) -> OracleError {
        return OracleError::Satisfiable {
            number_of_clauses: self.clauses.len(),
        };
    }
}

impl MusOracle for DpllMusExtractor {
    fn number_of_clauses(&self) -> usize {
        return self.clauses.len();
    }

    fn push(&mut self, clause: &Clause) -> Result<usize, ContradictionError> {
        let clause_index = self.clauses.len();
        self.clauses.push(clause.clone());
        let number_of_variables = self
            .number_of_variables
            .max(clause.max_index().map_or(0, |index| index + 1));

        // 矛盾の検出は push された節だけの単位伝播で行う
        let number_of_base_clauses = self.number_of_base_clauses;
        let mut decision_stack = DecisionStack::new(number_of_variables);
        if decision_stack
            .propagate(&self.clauses, |index| index >= number_of_base_clauses)
            .is_err()
        {
            self.clauses.pop();
            trace!(clause_index, %clause, "push rejected");
            return Err(ContradictionError { clause_index });
        }
        self.number_of_variables = number_of_variables;
        trace!(clause_index, %clause, "pushed");
        return Ok(1);
    }

    fn pop(&mut self, number_of_clauses: usize) -> Result<(), OracleError> {
        let pushed = self.clauses.len() - self.number_of_base_clauses;
        if number_of_clauses > pushed {
            return Err(OracleError::PopUnderflow {
                requested: number_of_clauses,
                pushed,
            });
        }
        self.clauses.truncate(self.clauses.len() - number_of_clauses);
        debug!(number_of_clauses, remaining = self.clauses.len(), "popped");
        return Ok(());
    }

    fn is_satisfiable(&mut self) -> bool {
        return self.solve(&vec![true; self.clauses.len()]);
    }

    fn minimal_unsatisfiable_subset_indexes(&mut self) -> Result<Vec<usize>, OracleError> {
        let enabled = vec![true; self.clauses.len()];
        if self.solve(&enabled) {
            return Err(self.satisfiable_error());
        }
        return Ok(self.shrink(enabled));
    }

    fn all_minimal_unsatisfiable_subset_indexes(&mut self) -> Result<Vec<usize>, OracleError> {
        // 各ノードは取り除いた節の集合．既知の MUS と交わらなければそれを再利用する
        let mut subsets: Vec<Vec<usize>> = Vec::default();
        let mut visited: HashSet<Vec<usize>> = HashSet::default();
        let mut queue: VecDeque<Vec<usize>> = VecDeque::from([Vec::default()]);
        while let Some(removed) = queue.pop_front() {
            if subsets.len() >= self.max_subsets {
                break;
            }
            let reusable = subsets
                .iter()
                .find(|subset| subset.iter().all(|index| !removed.contains(index)))
                .cloned();
            let subset = match reusable {
                Some(subset) => subset,
                None => {
                    let mut enabled = vec![true; self.clauses.len()];
                    for &index in removed.iter() {
                        enabled[index] = false;
                    }
                    if self.solve(&enabled) {
                        continue;
                    }
                    let subset = self.shrink(enabled);
                    trace!(?subset, "found minimal unsatisfiable subset");
                    subsets.push(subset.clone());
                    subset
                }
            };
            for &index in subset.iter() {
                let mut child = removed.clone();
                child.push(index);
                child.sort_unstable();
                if visited.insert(child.clone()) {
                    queue.push_back(child);
                }
            }
        }
        if subsets.is_empty() {
            return Err(self.satisfiable_error());
        }

        debug!(number_of_subsets = subsets.len(), "enumerated minimal unsatisfiable subsets");
        let mut indexes = subsets.into_iter().flatten().collect::<Vec<_>>();
        indexes.sort_unstable();
        indexes.dedup();
        return Ok(indexes);
    }
}
