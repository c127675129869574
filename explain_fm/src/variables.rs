use fm_explanations::{Explanation, Node, Reason};
use indexmap::IndexSet;

use crate::read_model::Formula;

/// 機能名と変数番号の対応表
///
/// 変数番号は名前が初めて現れた順に割り当てる
#[derive(Clone, Default, Debug)]
pub struct Variables {
    names: IndexSet<String>,
}

impl Variables {
    #[inline(always)]
    pub fn len(&self) -> usize {
        return self.names.len();
    }

    pub fn index_of(&mut self, name: &str) -> usize {
        if let Some(index) = self.names.get_index_of(name) {
            return index;
        }
        return self.names.insert_full(name.to_string()).0;
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        return self.names.get_index(index).map(String::as_str);
    }

    pub fn to_node(&mut self, formula: &Formula) -> Node {
        return match formula {
            Formula::Variable(name) => Node::variable(self.index_of(name)),
            Formula::Not(child) => Node::Not(Box::new(self.to_node(child))),
            Formula::And(children) => {
                Node::And(children.iter().map(|child| self.to_node(child)).collect())
            }
            Formula::Or(children) => {
                Node::Or(children.iter().map(|child| self.to_node(child)).collect())
            }
            Formula::Implies(premise, conclusion) => {
                Node::implies(self.to_node(premise), self.to_node(conclusion))
            }
            Formula::Equals(left, right) => Node::equals(self.to_node(left), self.to_node(right)),
        };
    }

    /// 変数番号を機能名に置き換えて式を書き出す
    pub fn render(&self, node: &Node) -> String {
        return match node {
            Node::Literal(literal) => {
                let name = match self.name(literal.index()) {
                    Some(name) => name.to_string(),
                    None => format!("x_{}", literal.index()),
                };
                if literal.is_positive() {
                    name
                } else {
                    format!("!{}", name)
                }
            }
            Node::Not(child) => format!("!{}", self.render_operand(child)),
            Node::And(children) if children.is_empty() => "true".to_string(),
            Node::Or(children) if children.is_empty() => "false".to_string(),
            Node::And(children) => self.render_joined(children, " & "),
            Node::Or(children) => self.render_joined(children, " | "),
            Node::Implies(premise, conclusion) => format!(
                "{} -> {}",
                self.render_operand(premise),
                self.render_operand(conclusion)
            ),
            Node::Equals(left, right) => format!(
                "{} <-> {}",
                self.render_operand(left),
                self.render_operand(right)
            ),
        };
    }

    pub fn render_explanation(&self, explanation: &Explanation) -> String {
        let mut text = format!(
            "{} is always {} because of:\n",
            self.render(explanation.subject()),
            if explanation.is_tautology() { "true" } else { "false" }
        );
        for reason in explanation.reasons() {
            let line = match reason {
                Reason::Constraint(constraint) => format!(
                    "  {}: {}\n",
                    constraint.name(),
                    self.render(constraint.expression())
                ),
                Reason::Expression(expression) => {
                    format!("  assumed: {}\n", self.render(expression))
                }
            };
            text.push_str(&line);
        }
        return text;
    }

    fn render_joined(&self, children: &[Node], separator: &str) -> String {
        return children
            .iter()
            .map(|child| self.render_operand(child))
            .collect::<Vec<_>>()
            .join(separator);
    }

    fn render_operand(&self, node: &Node) -> String {
        return match node {
            Node::Literal(_) | Node::Not(_) => self.render(node),
            Node::And(children) | Node::Or(children) if children.is_empty() => self.render(node),
            _ => format!("({})", self.render(node)),
        };
    }
}
