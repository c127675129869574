use prop_logic::Node;

use crate::trace_model::TracedConstraint;

/// 説明に含まれる原因
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Reason {
    /// トレースモデル上の制約
    Constraint(TracedConstraint),
    /// 説明対象と一緒に渡された補助式
    Expression(Node),
}

impl Reason {
    #[inline(always)]
    pub fn is_constraint(&self) -> bool {
        return matches!(self, Self::Constraint(_));
    }

    #[inline(always)]
    pub fn is_expression(&self) -> bool {
        return matches!(self, Self::Expression(_));
    }

    pub fn expression(&self) -> &Node {
        return match self {
            Self::Constraint(constraint) => constraint.expression(),
            Self::Expression(expression) => expression,
        };
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return match self {
            Self::Constraint(constraint) => write!(f, "constraint {}", constraint),
            Self::Expression(expression) => write!(f, "expression {}", expression),
        };
    }
}
