use std::ops::Not;

use super::boolean::Boolean;

/// 変数番号と極性の組
///
/// 下位 1 bit が極性 (1 が肯定)，残りが変数番号
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    bits: usize,
}

impl Literal {
    #[inline(always)]
    pub fn new(index: usize, value: Boolean) -> Self {
        debug_assert!(((index << 1) >> 1) == index);
        return Self {
            bits: (index << 1) | value as usize,
        };
    }

    #[inline(always)]
    pub fn positive(index: usize) -> Self {
        return Self::new(index, Boolean::TRUE);
    }

    #[inline(always)]
    pub fn negative(index: usize) -> Self {
        return Self::new(index, Boolean::FALSE);
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        return self.bits >> 1;
    }

    #[inline(always)]
    pub fn value(&self) -> Boolean {
        return if self.bits & 1 == 1 {
            Boolean::TRUE
        } else {
            Boolean::FALSE
        };
    }

    #[inline(always)]
    pub fn is_positive(&self) -> bool {
        return self.bits & 1 == 1;
    }

    /// 変数の値が `values[index]` のときにこのリテラルが真になるか
    #[inline(always)]
    pub fn evaluate(&self, values: &[bool]) -> bool {
        return values[self.index()] == self.is_positive();
    }
}

impl Not for Literal {
    type Output = Literal;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Literal {
            bits: self.bits ^ 1,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x_{}",
            if self.value() == Boolean::FALSE {
                "!"
            } else {
                ""
            },
            self.index()
        )
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}
