use prop_logic::{Boolean, Clause, Literal};

/// 割り当て理由
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Reason {
    /// 決定
    Decision {
        /// 一度失敗して反転した決定か
        flipped: bool,
    },
    /// 伝播
    Propagation {
        /// 伝播を引き起こした節の番号
        clause_index: usize,
    },
}

impl Reason {
    #[inline(always)]
    pub fn is_decision(&self) -> bool {
        return matches!(self, Self::Decision { .. });
    }
}

#[derive(Clone)]
pub(crate) struct DecisionStack {
    states: Vec<State>,
    assignment_stack: Vec<Assignment>,
    decision_stack: Vec<Decision>,
}

impl DecisionStack {
    const NULL_ASSIGNMENT_ORDER: usize = usize::MAX;

    pub fn new(number_of_variables: usize) -> Self {
        Self {
            states: vec![
                State {
                    value: Boolean::FALSE,
                    order: Self::NULL_ASSIGNMENT_ORDER,
                };
                number_of_variables
            ],
            assignment_stack: Vec::default(),
            decision_stack: Vec::default(),
        }
    }

    pub fn number_of_assignments(&self) -> usize {
        return self.assignment_stack.len();
    }

    pub fn decision_level(&self) -> usize {
        return self.decision_stack.len();
    }

    pub fn is_assigned(&self, index: usize) -> bool {
        return self.states[index].order != Self::NULL_ASSIGNMENT_ORDER;
    }

    pub fn is_true(&self, literal: Literal) -> bool {
        return self.states[literal.index()].order != Self::NULL_ASSIGNMENT_ORDER
            && self.states[literal.index()].value == literal.value();
    }

    pub fn is_false(&self, literal: Literal) -> bool {
        return self.states[literal.index()].order != Self::NULL_ASSIGNMENT_ORDER
            && self.states[literal.index()].value == !literal.value();
    }

    pub fn first_unassigned_variable(&self) -> Option<usize> {
        return (0..self.states.len()).find(|&index| !self.is_assigned(index));
    }

    pub fn get_assignment(&self, order: usize) -> Literal {
        let index = self.assignment_stack[order].index;
        let value = self.states[index].value;
        debug_assert!(self.states[index].order == order);
        return Literal::new(index, value);
    }

    pub fn assign(&mut self, literal: Literal, reason: Reason) {
        debug_assert!(self.states[literal.index()].order == Self::NULL_ASSIGNMENT_ORDER);

        let assignment_order = self.assignment_stack.len();
        if reason.is_decision() {
            self.decision_stack.push(Decision { assignment_order });
        }
        let decision_level = self.decision_stack.len();
        self.assignment_stack.push(Assignment {
            index: literal.index(),
            decision_level,
            reason,
        });
        self.states[literal.index()].order = assignment_order;
        self.states[literal.index()].value = literal.value();
    }

    pub fn backjump(&mut self, backjump_level: usize) {
        while self.decision_stack.len() > backjump_level {
            let Some(assignment) = self.assignment_stack.pop() else {
                break;
            };
            debug_assert!(assignment.decision_level == self.decision_stack.len());
            if assignment.reason.is_decision() {
                let decision = self.decision_stack.pop();
                debug_assert!(
                    decision.map(|decision| decision.assignment_order)
                        == Some(self.assignment_stack.len())
                );
            }
            self.states[assignment.index].order = Self::NULL_ASSIGNMENT_ORDER;
        }
    }

    /// 最後のまだ反転していない決定を反転する (時系列バックトラック)
    ///
    /// 反転できる決定が残っていなければ false
    pub fn flip_last_decision(&mut self) -> bool {
        while let Some(decision) = self.decision_stack.last() {
            let assignment_order = decision.assignment_order;
            let literal = self.get_assignment(assignment_order);
            let reason = self.assignment_stack[assignment_order].reason;
            self.backjump(self.decision_level() - 1);
            if reason == (Reason::Decision { flipped: false }) {
                self.assign(!literal, Reason::Decision { flipped: true });
                return true;
            }
        }
        return false;
    }

    /// 単位伝播．`is_enabled` な節だけを見て不動点まで繰り返す
    ///
    /// 全リテラルが偽になった節があればその番号を返す
    pub fn propagate(
        &mut self,
        clauses: &[Clause],
        is_enabled: impl Fn(usize) -> bool,
    ) -> Result<(), usize> {
        loop {
            let number_of_assignments = self.number_of_assignments();
            for (clause_index, clause) in clauses.iter().enumerate() {
                if !is_enabled(clause_index) {
                    continue;
                }
                let mut satisfied = false;
                let mut number_of_unassigned = 0;
                let mut unassigned = None;
                for literal in clause.iter_literals() {
                    if self.is_true(literal) {
                        satisfied = true;
                        break;
                    }
                    if !self.is_false(literal) {
                        number_of_unassigned += 1;
                        unassigned = Some(literal);
                    }
                }
                if satisfied {
                    continue;
                }
                match (number_of_unassigned, unassigned) {
                    (0, _) => return Err(clause_index),
                    (1, Some(literal)) => {
                        self.assign(literal, Reason::Propagation { clause_index })
                    }
                    _ => {}
                }
            }
            if self.number_of_assignments() == number_of_assignments {
                return Ok(());
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Decision {
    assignment_order: usize,
}

#[derive(Clone, Copy)]
struct Assignment {
    index: usize,
    decision_level: usize,
    reason: Reason,
}

#[derive(Clone, Copy)]
struct State {
    value: Boolean,
    order: usize,
}

#[cfg(test)]
mod test {
    use prop_logic::{Clause, Literal};

    use super::{DecisionStack, Reason};

    #[test]
    fn test_propagate() {
        let clauses = [
            Clause::unit(Literal::positive(0)),
            Clause::new([Literal::negative(0), Literal::positive(1)]),
            Clause::new([Literal::negative(1), Literal::negative(2)]),
        ];
        let mut decision_stack = DecisionStack::new(3);
        assert_eq!(decision_stack.propagate(&clauses, |_| true), Ok(()));
        assert!(decision_stack.is_true(Literal::positive(0)));
        assert!(decision_stack.is_true(Literal::positive(1)));
        assert!(decision_stack.is_false(Literal::positive(2)));
        assert_eq!(decision_stack.decision_level(), 0);
    }

    #[test]
    fn test_propagate_conflict() {
        let clauses = [
            Clause::unit(Literal::positive(0)),
            Clause::unit(Literal::negative(0)),
        ];
        let mut decision_stack = DecisionStack::new(1);
        assert_eq!(decision_stack.propagate(&clauses, |_| true), Err(1));

        let mut decision_stack = DecisionStack::new(1);
        assert_eq!(decision_stack.propagate(&clauses, |index| index == 1), Ok(()));
        assert!(decision_stack.is_false(Literal::positive(0)));
    }

    #[test]
    fn test_flip_last_decision() {
        let mut decision_stack = DecisionStack::new(2);
        decision_stack.assign(Literal::negative(0), Reason::Decision { flipped: false });
        decision_stack.assign(Literal::negative(1), Reason::Decision { flipped: false });
        assert_eq!(decision_stack.decision_level(), 2);

        assert!(decision_stack.flip_last_decision());
        assert!(decision_stack.is_true(Literal::positive(1)));
        assert_eq!(decision_stack.decision_level(), 2);

        // x_1 は反転済みなので x_0 が反転される
        assert!(decision_stack.flip_last_decision());
        assert!(decision_stack.is_true(Literal::positive(0)));
        assert!(!decision_stack.is_assigned(1));
        assert_eq!(decision_stack.decision_level(), 1);

        assert!(!decision_stack.flip_last_decision());
        assert_eq!(decision_stack.number_of_assignments(), 0);
    }
}
