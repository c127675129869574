use crate::types::Literal;

/// 節 (リテラルの選言)
///
/// リテラルは整列・重複除去して保持するので，同じ集合を表す節は等しくなる
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_unstable();
        literals.dedup();
        return Self { literals };
    }

    #[inline(always)]
    pub fn unit(literal: Literal) -> Self {
        return Self {
            literals: vec![literal],
        };
    }

    /// 空節 (常に偽)
    #[inline(always)]
    pub fn empty() -> Self {
        return Self {
            literals: Vec::default(),
        };
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        return self.literals.len();
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        return self.literals.is_empty();
    }

    #[inline(always)]
    pub fn unit_literal(&self) -> Option<Literal> {
        return if self.literals.len() == 1 {
            Some(self.literals[0])
        } else {
            None
        };
    }

    /// x と !x を両方含む (常に真)
    pub fn is_tautological(&self) -> bool {
        // 整列済みなので相補リテラルは隣接する
        return self
            .literals
            .windows(2)
            .any(|window| window[0].index() == window[1].index());
    }

    pub fn max_index(&self) -> Option<usize> {
        return self.literals.iter().map(|literal| literal.index()).max();
    }

    #[inline(always)]
    pub fn iter_literals(&self) -> impl Iterator<Item = Literal> + Clone + '_ {
        return self.literals.iter().copied();
    }

    pub fn evaluate(&self, values: &[bool]) -> bool {
        return self.literals.iter().any(|literal| literal.evaluate(values));
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.literals.is_empty() {
            return write!(f, "false");
        }
        write!(f, "(")?;
        let mut first = true;
        for literal in self.literals.iter() {
            if first {
                first = false;
            } else {
                write!(f, " | ")?
            }
            write!(f, "{}", literal)?
        }
        write!(f, ")")?;
        return Ok(());
    }
}

impl std::fmt::Debug for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::Clause;
    use crate::types::Literal;

    #[test]
    fn test_new_sorts_and_dedups() {
        let clause = Clause::new([
            Literal::positive(3),
            Literal::negative(1),
            Literal::positive(3),
        ]);
        assert_eq!(clause.len(), 2);
        assert_eq!(
            clause,
            Clause::new([Literal::negative(1), Literal::positive(3)])
        );
        assert_eq!(format!("{}", clause), "(!x_1 | x_3)");
        assert_eq!(clause.max_index(), Some(3));
    }

    #[test]
    fn test_tautological() {
        assert!(Clause::new([Literal::positive(2), Literal::negative(2)]).is_tautological());
        assert!(!Clause::new([Literal::positive(2), Literal::negative(1)]).is_tautological());
        assert!(!Clause::empty().is_tautological());
    }

    #[test]
    fn test_unit_and_empty() {
        let literal = Literal::negative(0);
        assert_eq!(Clause::unit(literal).unit_literal(), Some(literal));
        assert_eq!(Clause::empty().unit_literal(), None);
        assert!(Clause::empty().is_empty());
        assert!(!Clause::empty().evaluate(&[true]));
        assert_eq!(format!("{}", Clause::empty()), "false");
    }
}
