use std::ops::Not;

use either::Either;

use crate::{clause::Clause, types::Literal};

/// 命題論理式
///
/// `And(vec![])` は真，`Or(vec![])` は偽を表す
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Node {
    Literal(Literal),
    Not(Box<Node>),
    And(Vec<Node>),
    Or(Vec<Node>),
    Implies(Box<Node>, Box<Node>),
    Equals(Box<Node>, Box<Node>),
}

impl Node {
    #[inline(always)]
    pub fn variable(index: usize) -> Self {
        return Node::Literal(Literal::positive(index));
    }

    pub fn and(children: impl IntoIterator<Item = Node>) -> Self {
        return Node::And(children.into_iter().collect());
    }

    pub fn or(children: impl IntoIterator<Item = Node>) -> Self {
        return Node::Or(children.into_iter().collect());
    }

    pub fn implies(premise: Node, conclusion: Node) -> Self {
        return Node::Implies(Box::new(premise), Box::new(conclusion));
    }

    pub fn equals(left: Node, right: Node) -> Self {
        return Node::Equals(Box::new(left), Box::new(right));
    }

    /// 否定 (リテラルは極性を反転するだけ)
    pub fn negated(&self) -> Node {
        return !self.clone();
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> + Clone + '_ {
        return match self {
            Node::Literal(_) => Either::Left(Either::Left(None.into_iter())),
            Node::Not(child) => Either::Left(Either::Left(Some(child.as_ref()).into_iter())),
            Node::And(children) | Node::Or(children) => {
                Either::Left(Either::Right(children.iter()))
            }
            Node::Implies(left, right) | Node::Equals(left, right) => {
                Either::Right([left.as_ref(), right.as_ref()].into_iter())
            }
        };
    }

    pub fn max_index(&self) -> Option<usize> {
        return match self {
            Node::Literal(literal) => Some(literal.index()),
            node => node.children().filter_map(Node::max_index).max(),
        };
    }

    pub fn evaluate(&self, values: &[bool]) -> bool {
        return match self {
            Node::Literal(literal) => literal.evaluate(values),
            Node::Not(child) => !child.evaluate(values),
            Node::And(children) => children.iter().all(|child| child.evaluate(values)),
            Node::Or(children) => children.iter().any(|child| child.evaluate(values)),
            Node::Implies(premise, conclusion) => {
                !premise.evaluate(values) || conclusion.evaluate(values)
            }
            Node::Equals(left, right) => left.evaluate(values) == right.evaluate(values),
        };
    }

    /// 節のリストへの変換
    ///
    /// 分配律による素朴な変換．恒真な節と重複する節は取り除く
    pub fn to_clauses(&self) -> Vec<Clause> {
        let mut clauses: Vec<Clause> = Vec::default();
        for literals in self.literal_sets(true) {
            let clause = Clause::new(literals);
            if clause.is_tautological() || clauses.contains(&clause) {
                continue;
            }
            clauses.push(clause);
        }
        return clauses;
    }

    /// `And[Or[Literal..]..]` の形の CNF
    ///
    /// 単位節ひとつだけになる場合はリテラルそのものを返す
    pub fn to_regular_cnf(&self) -> Node {
        let clauses = self.to_clauses();
        if let [clause] = clauses.as_slice() {
            if let Some(literal) = clause.unit_literal() {
                return Node::Literal(literal);
            }
        }
        return Node::And(
            clauses
                .into_iter()
                .map(|clause| Node::Or(clause.iter_literals().map(Node::Literal).collect()))
                .collect(),
        );
    }

    /// 正規 CNF の子 (リテラルまたはリテラルの選言) を節として取り出す
    pub fn as_clause(&self) -> Option<Clause> {
        return match self {
            Node::Literal(literal) => Some(Clause::unit(*literal)),
            Node::Or(children) => children
                .iter()
                .map(|child| match child {
                    Node::Literal(literal) => Some(*literal),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Clause::new),
            _ => None,
        };
    }

    fn literal_sets(&self, positive: bool) -> Vec<Vec<Literal>> {
        return match self {
            Node::Literal(literal) => {
                vec![vec![if positive { *literal } else { !*literal }]]
            }
            Node::Not(child) => child.literal_sets(!positive),
            Node::And(children) if positive => {
                conjoin(children.iter().map(|child| child.literal_sets(true)))
            }
            Node::And(children) => disjoin(children.iter().map(|child| child.literal_sets(false))),
            Node::Or(children) if positive => {
                disjoin(children.iter().map(|child| child.literal_sets(true)))
            }
            Node::Or(children) => conjoin(children.iter().map(|child| child.literal_sets(false))),
            Node::Implies(premise, conclusion) if positive => disjoin([
                premise.literal_sets(false),
                conclusion.literal_sets(true),
            ]),
            Node::Implies(premise, conclusion) => conjoin([
                premise.literal_sets(true),
                conclusion.literal_sets(false),
            ]),
            Node::Equals(left, right) if positive => conjoin([
                disjoin([left.literal_sets(false), right.literal_sets(true)]),
                disjoin([left.literal_sets(true), right.literal_sets(false)]),
            ]),
            Node::Equals(left, right) => conjoin([
                disjoin([left.literal_sets(true), right.literal_sets(true)]),
                disjoin([left.literal_sets(false), right.literal_sets(false)]),
            ]),
        };
    }
}

fn conjoin(operands: impl IntoIterator<Item = Vec<Vec<Literal>>>) -> Vec<Vec<Literal>> {
    return operands.into_iter().flatten().collect();
}

fn disjoin(operands: impl IntoIterator<Item = Vec<Vec<Literal>>>) -> Vec<Vec<Literal>> {
    // 空の選言は偽 (空節ひとつ)
    let mut result = vec![Vec::default()];
    for operand in operands {
        result = result
            .iter()
            .flat_map(|clause| {
                operand.iter().map(move |other| {
                    let mut clause = clause.clone();
                    clause.extend(other.iter().copied());
                    clause
                })
            })
            .collect();
    }
    return result;
}

impl Not for Node {
    type Output = Node;
    fn not(self) -> Self::Output {
        return match self {
            Node::Literal(literal) => Node::Literal(!literal),
            node => Node::Not(Box::new(node)),
        };
    }
}

impl From<Literal> for Node {
    fn from(literal: Literal) -> Self {
        return Node::Literal(literal);
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join(
            f: &mut std::fmt::Formatter<'_>,
            children: &[Node],
            separator: &str,
        ) -> std::fmt::Result {
            write!(f, "(")?;
            for (position, child) in children.iter().enumerate() {
                if position != 0 {
                    write!(f, " {} ", separator)?;
                }
                write!(f, "{}", child)?;
            }
            return write!(f, ")");
        }

        return match self {
            Node::Literal(literal) => write!(f, "{}", literal),
            Node::Not(child) => write!(f, "!{}", child),
            Node::And(children) if children.is_empty() => write!(f, "true"),
            Node::And(children) => join(f, children, "&"),
            Node::Or(children) if children.is_empty() => write!(f, "false"),
            Node::Or(children) => join(f, children, "|"),
            Node::Implies(premise, conclusion) => write!(f, "({} -> {})", premise, conclusion),
            Node::Equals(left, right) => write!(f, "({} <-> {})", left, right),
        };
    }
}

#[cfg(test)]
mod test {
    use super::Node;
    use crate::{clause::Clause, types::Literal};

    fn a() -> Node {
        Node::variable(0)
    }

    fn b() -> Node {
        Node::variable(1)
    }

    fn c() -> Node {
        Node::variable(2)
    }

    /// 全割り当てで元の式と CNF が一致するか
    fn assert_equivalent(node: &Node) {
        let number_of_variables = node.max_index().map_or(0, |index| index + 1);
        let clauses = node.to_clauses();
        for bits in 0..(1usize << number_of_variables) {
            let values = (0..number_of_variables)
                .map(|index| (bits >> index) & 1 == 1)
                .collect::<Vec<_>>();
            assert_eq!(
                node.evaluate(&values),
                clauses.iter().all(|clause| clause.evaluate(&values)),
                "{} under {:?}",
                node,
                values
            );
            assert_eq!(node.evaluate(&values), node.to_regular_cnf().evaluate(&values));
        }
    }

    #[test]
    fn test_single_literal_collapses() {
        assert_eq!(a().to_regular_cnf(), a());
        assert_eq!(
            Node::Not(Box::new(a())).to_regular_cnf(),
            Node::Literal(Literal::negative(0))
        );
        assert_eq!(Node::and([a(), a()]).to_regular_cnf(), a());
    }

    #[test]
    fn test_regular_cnf_shape() {
        let cnf = Node::and([a(), b()]).to_regular_cnf();
        assert_eq!(cnf, Node::and([Node::or([a()]), Node::or([b()])]));
        assert_eq!(
            cnf.children().map(|child| child.as_clause()).collect::<Vec<_>>(),
            vec![
                Some(Clause::unit(Literal::positive(0))),
                Some(Clause::unit(Literal::positive(1)))
            ]
        );

        let negated = Node::and([a(), b()]).negated().to_regular_cnf();
        assert_eq!(negated.children().count(), 1);
        assert_eq!(
            negated.children().next().and_then(Node::as_clause),
            Some(Clause::new([Literal::negative(0), Literal::negative(1)]))
        );
    }

    #[test]
    fn test_constants() {
        // 恒真式は節を持たない
        assert!(Node::or([a(), a().negated()]).to_clauses().is_empty());
        assert_eq!(Node::and([]).to_regular_cnf(), Node::And(vec![]));
        // 偽は空節ひとつ
        assert_eq!(Node::or([]).to_clauses(), vec![Clause::empty()]);
    }

    #[test]
    fn test_equivalence() {
        assert_equivalent(&Node::implies(a(), Node::or([b(), c()])));
        assert_equivalent(&Node::equals(a(), Node::and([b(), c().negated()])));
        assert_equivalent(&Node::equals(a(), b()).negated());
        assert_equivalent(&Node::or([Node::and([a(), b()]), Node::and([b().negated(), c()])]));
        assert_equivalent(&Node::implies(Node::equals(a(), b()), c()).negated());
    }

    #[test]
    fn test_as_clause_rejects_nested() {
        assert_eq!(Node::and([a()]).as_clause(), None);
        assert_eq!(Node::or([a(), Node::and([b()])]).as_clause(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", Node::implies(a(), Node::or([b(), c().negated()]))),
            "(x_0 -> (x_1 | !x_2))"
        );
        assert_eq!(format!("{}", Node::and([a(), b()]).negated()), "!(x_0 & x_1)");
        assert_eq!(format!("{}", Node::or([])), "false");
    }
}
