use std::ops::Range;

use prop_logic::{Clause, Node};
use thiserror::Error;
use tracing::trace;

use crate::reason::Reason;

/// トレースモデルに記録された元の制約
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TracedConstraint {
    name: String,
    expression: Node,
}

impl TracedConstraint {
    pub fn new(name: impl Into<String>, expression: Node) -> Self {
        Self {
            name: name.into(),
            expression,
        }
    }

    pub fn name(&self) -> &str {
        return &self.name;
    }

    pub fn expression(&self) -> &Node {
        return &self.expression;
    }
}

impl std::fmt::Display for TracedConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.expression)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
#[error("clause index {index} is outside the trace model ({trace_count} traced clauses)")]
pub struct TraceIndexOutOfRange {
    pub index: usize,
    pub trace_count: usize,
}

/// 基礎式の節番号から元の制約を引くための台帳
///
/// 追記のみ．各制約は連続した節番号の範囲を持つ
#[derive(Clone, Default, Debug)]
pub struct TraceModel {
    clauses: Vec<Clause>,
    entries: Vec<TraceEntry>,
}

#[derive(Clone, Debug)]
struct TraceEntry {
    range: Range<usize>,
    constraint: TracedConstraint,
}

impl TraceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 制約を CNF に変換して末尾に追記し，割り当てた節番号の範囲を返す
    ///
    /// 節を持たない (恒真な) 制約は空の範囲になり，理由として現れることはない
    pub fn add_constraint(&mut self, name: impl Into<String>, expression: Node) -> Range<usize> {
        let start = self.clauses.len();
        self.clauses.extend(expression.to_clauses());
        let range = start..self.clauses.len();

        let constraint = TracedConstraint::new(name, expression);
        trace!(%constraint, ?range, "traced constraint");
        self.entries.push(TraceEntry {
            range: range.clone(),
            constraint,
        });
        return range;
    }

    /// 基礎式の節数
    #[inline(always)]
    pub fn trace_count(&self) -> usize {
        return self.clauses.len();
    }

    pub fn cnf(&self) -> &[Clause] {
        return &self.clauses;
    }

    pub fn number_of_constraints(&self) -> usize {
        return self.entries.len();
    }

    pub fn constraints(&self) -> impl Iterator<Item = &TracedConstraint> + Clone + '_ {
        return self.entries.iter().map(|entry| &entry.constraint);
    }

    pub fn reason_for(&self, index: usize) -> Result<Reason, TraceIndexOutOfRange> {
        if index >= self.trace_count() {
            return Err(TraceIndexOutOfRange {
                index,
                trace_count: self.trace_count(),
            });
        }
        // 範囲は昇順に隙間なく並ぶ (空の範囲を除く)
        let position = self.entries.partition_point(|entry| entry.range.end <= index);
        let entry = &self.entries[position];
        debug_assert!(entry.range.contains(&index));
        return Ok(Reason::Constraint(entry.constraint.clone()));
    }
}
