use mus_oracle::{DefaultOracleFactory, MusOracle, OracleFactory};
use prop_logic::{Clause, Node};
use tracing::{error, trace};

use crate::{
    clause_index_space::{ClauseIndexSpace, ClauseOwner},
    creator::{ExplanationAlgorithm, ExplanationCreator},
    error::ExplanationError,
    explanation::Explanation,
    reason::Reason,
    trace_model::TraceModel,
};

/// MUS 抽出器を使う不変条件・プレゼンス条件の説明器
pub type MusInvariantPresenceConditionExplanationCreator<'a, FactoryT = DefaultOracleFactory> =
    ExplanationCreator<'a, InvariantPresenceCondition, FactoryT>;

/// 式が常に真 (または常に偽) である理由を MUS から求める
///
/// 式スタックの先頭が説明対象で，残りは証明の補助として仮定する式
#[derive(Clone, Default, Debug)]
pub struct InvariantPresenceCondition {
    expression_stack: Vec<Node>,
    tautology: bool,
}

impl InvariantPresenceCondition {
    pub fn new(
        expression_stack: impl IntoIterator<Item = Node>,
        tautology: bool,
    ) -> Result<Self, ExplanationError> {
        let mut algorithm = Self {
            expression_stack: Vec::default(),
            tautology,
        };
        algorithm.set_expression_stack(expression_stack)?;
        return Ok(algorithm);
    }

    pub fn expression_stack(&self) -> &[Node] {
        return &self.expression_stack;
    }

    /// 先頭の式が説明対象になる
    pub fn set_expression_stack(
        &mut self,
        expression_stack: impl IntoIterator<Item = Node>,
    ) -> Result<(), ExplanationError> {
        let expression_stack = expression_stack.into_iter().collect::<Vec<_>>();
        if expression_stack.is_empty() {
            return Err(ExplanationError::EmptyExpressionStack);
        }
        self.expression_stack = expression_stack;
        return Ok(());
    }

    /// true なら常に真であることを，false なら常に偽であることを示す
    pub fn is_tautology(&self) -> bool {
        return self.tautology;
    }

    pub fn set_tautology(&mut self, tautology: bool) {
        self.tautology = tautology;
    }

    fn push_expressions<'s>(
        &'s self,
        oracle: &mut dyn MusOracle,
        index_space: &mut ClauseIndexSpace<'s>,
    ) -> Result<(), ExplanationError> {
        for (position, expression) in self.expression_stack.iter().enumerate() {
            // 常に真であることは否定を仮定して矛盾を導くことで示す
            let is_subject = position == 0;
            let cnf = if is_subject && self.tautology {
                expression.negated().to_regular_cnf()
            } else {
                expression.to_regular_cnf()
            };

            let mut expression_clause_count = 0;
            if let Node::Literal(literal) = &cnf {
                expression_clause_count += oracle.push(&Clause::unit(*literal))?;
            } else {
                for child in cnf.children() {
                    let clause = child
                        .as_clause()
                        .ok_or_else(|| ExplanationError::NotAClause(child.clone()))?;
                    expression_clause_count += oracle.push(&clause)?;
                }
            }

            // 説明対象自身の節は原因から除く
            let range = index_space.allocate(expression, expression_clause_count, is_subject);
            trace!(%expression, ?range, is_subject, "pushed expression");
        }
        return Ok(());
    }
}

impl ExplanationAlgorithm for InvariantPresenceCondition {
    type Subject = Node;
    type Explanation = Explanation;

    fn subject(&self) -> Option<&Node> {
        return self.expression_stack.first();
    }

    fn set_subject(&mut self, subject: Option<Node>) {
        match subject {
            Some(subject) => match self.expression_stack.first_mut() {
                Some(head) => *head = subject,
                None => self.expression_stack.push(subject),
            },
            None => self.expression_stack.clear(),
        }
    }

    fn explain(
        &self,
        oracle: &mut dyn MusOracle,
        trace_model: &TraceModel,
    ) -> Result<Option<Explanation>, ExplanationError> {
        let Some(subject) = self.subject() else {
            return Ok(None);
        };
        let trace_count = trace_model.trace_count();
        let number_of_base_clauses = oracle.number_of_clauses();
        if number_of_base_clauses != trace_count {
            return Err(ExplanationError::MisalignedOracle {
                expected: trace_count,
                actual: number_of_base_clauses,
            });
        }

        let mut index_space = ClauseIndexSpace::new(trace_count);
        let indexes = match self.push_expressions(oracle, &mut index_space) {
            Ok(()) => oracle
                .all_minimal_unsatisfiable_subset_indexes()
                .map_err(ExplanationError::from),
            Err(error) => Err(error),
        };
        // 次の説明に備えて基礎式だけの状態に戻す
        let number_of_pushed_clauses = oracle.number_of_clauses() - number_of_base_clauses;
        oracle.pop(number_of_pushed_clauses)?;
        let indexes = indexes?;
        trace!(
            ?indexes,
            number_of_local_clauses = index_space.number_of_local_clauses(),
            "resolving minimal unsatisfiable subset"
        );

        let mut explanation = Explanation::new(subject.clone(), self.tautology);
        for index in indexes {
            match index_space.resolve(index) {
                ClauseOwner::Trace => {
                    explanation.add_reason(trace_model.reason_for(index)?);
                }
                ClauseOwner::Suppressed => {}
                ClauseOwner::Expression(expression) => {
                    explanation.add_reason(Reason::Expression(expression.clone()));
                }
                ClauseOwner::Unknown => {
                    debug_assert!(false, "clause index {} has no owner", index);
                    error!(index, "clause index has no owner, skipped");
                }
            }
        }
        return Ok(Some(explanation));
    }
}

impl<'a, FactoryT> ExplanationCreator<'a, InvariantPresenceCondition, FactoryT>
where
    FactoryT: OracleFactory,
{
    pub fn expression_stack(&self) -> &[Node] {
        return self.algorithm().expression_stack();
    }

    pub fn set_expression_stack(
        &mut self,
        expression_stack: impl IntoIterator<Item = Node>,
    ) -> Result<(), ExplanationError> {
        return self.algorithm_mut().set_expression_stack(expression_stack);
    }

    pub fn is_tautology(&self) -> bool {
        return self.algorithm().is_tautology();
    }

    pub fn set_tautology(&mut self, tautology: bool) {
        self.algorithm_mut().set_tautology(tautology);
    }
}

#[cfg(test)]
mod test {
    use mus_oracle::{ContradictionError, DpllMusExtractor, MusOracle, OracleConfig};
    use prop_logic::{Clause, Literal, Node};

    use super::InvariantPresenceCondition;
    use crate::{
        creator::ExplanationAlgorithm, error::ExplanationError, reason::Reason,
        trace_model::TraceModel,
    };

    fn a() -> Node {
        Node::variable(0)
    }

    fn b() -> Node {
        Node::variable(1)
    }

    fn c() -> Node {
        Node::variable(2)
    }

    fn oracle_of(trace_model: &TraceModel) -> DpllMusExtractor {
        return DpllMusExtractor::new(trace_model.cnf().to_vec(), &OracleConfig::default());
    }

    #[test]
    fn test_empty_expression_stack_is_rejected() {
        assert!(matches!(
            InvariantPresenceCondition::new(Vec::<Node>::new(), true),
            Err(ExplanationError::EmptyExpressionStack)
        ));
        let mut algorithm = InvariantPresenceCondition::new([a()], true).unwrap();
        assert!(algorithm.set_expression_stack(Vec::<Node>::new()).is_err());
        assert_eq!(algorithm.expression_stack(), &[a()]);
    }

    #[test]
    fn test_subject_follows_expression_stack() {
        let mut algorithm = InvariantPresenceCondition::new([a(), b()], false).unwrap();
        assert_eq!(algorithm.subject(), Some(&a()));
        algorithm.set_expression_stack([c(), b()]).unwrap();
        assert_eq!(algorithm.subject(), Some(&c()));
        algorithm.set_subject(Some(b()));
        assert_eq!(algorithm.expression_stack(), &[b(), b()]);
        algorithm.set_subject(None);
        assert_eq!(algorithm.subject(), None);
        algorithm.set_subject(Some(a()));
        assert_eq!(algorithm.expression_stack(), &[a()]);
    }

    #[test]
    fn test_supporting_expression_is_cited() {
        // 基礎式: a -> b．補助式 a のもとで b は常に真
        let mut trace_model = TraceModel::new();
        trace_model.add_constraint("requires", Node::implies(a(), b()));
        trace_model.add_constraint("unrelated", Node::or([c(), b()]));
        let mut oracle = oracle_of(&trace_model);

        let algorithm = InvariantPresenceCondition::new([b(), a()], true).unwrap();
        let explanation = algorithm.explain(&mut oracle, &trace_model).unwrap().unwrap();

        assert!(explanation.is_tautology());
        assert_eq!(explanation.subject(), &b());
        assert_eq!(
            explanation.reasons().cloned().collect::<Vec<_>>(),
            vec![
                trace_model.reason_for(0).unwrap(),
                Reason::Expression(a()),
            ]
        );
        // 基礎式だけの状態に戻っている
        assert_eq!(oracle.number_of_clauses(), trace_model.trace_count());
    }

    #[test]
    fn test_subject_clauses_are_never_cited() {
        let mut trace_model = TraceModel::new();
        trace_model.add_constraint("a or b", Node::or([a(), b()]));
        let mut oracle = oracle_of(&trace_model);

        // !a & !b は常に偽．説明対象の 2 節は MUS に入るが原因には現れない
        let subject = Node::and([a().negated(), b().negated()]);
        let algorithm = InvariantPresenceCondition::new([subject.clone()], false).unwrap();
        let explanation = algorithm.explain(&mut oracle, &trace_model).unwrap().unwrap();
        assert!(!explanation.is_tautology());
        assert_eq!(explanation.number_of_reasons(), 1);
        assert!(explanation.reasons().all(Reason::is_constraint));
        assert!(!explanation.contains(&Reason::Expression(subject)));
    }

    #[test]
    fn test_contradiction_is_reported_and_oracle_restored() {
        let mut trace_model = TraceModel::new();
        trace_model.add_constraint("c", c());
        let mut oracle = oracle_of(&trace_model);

        let algorithm = InvariantPresenceCondition::new([a(), a().negated()], false).unwrap();
        let result = algorithm.explain(&mut oracle, &trace_model);
        assert!(matches!(
            result,
            Err(ExplanationError::Contradiction(ContradictionError { clause_index: 2 }))
        ));
        assert_eq!(oracle.number_of_clauses(), 1);
    }

    #[test]
    fn test_satisfiable_formula_is_an_error() {
        let mut trace_model = TraceModel::new();
        trace_model.add_constraint("a or b", Node::or([a(), b()]));
        let mut oracle = oracle_of(&trace_model);

        let algorithm = InvariantPresenceCondition::new([a()], true).unwrap();
        assert!(matches!(
            algorithm.explain(&mut oracle, &trace_model),
            Err(ExplanationError::Oracle(_))
        ));
        assert_eq!(oracle.number_of_clauses(), 1);
    }

    #[test]
    fn test_misaligned_oracle() {
        let trace_model = TraceModel::new();
        let mut oracle = DpllMusExtractor::new(
            vec![Clause::unit(Literal::positive(0))],
            &OracleConfig::default(),
        );
        let algorithm = InvariantPresenceCondition::new([a()], true).unwrap();
        assert!(matches!(
            algorithm.explain(&mut oracle, &trace_model),
            Err(ExplanationError::MisalignedOracle {
                expected: 0,
                actual: 1
            })
        ));
    }
}
