use std::ops::Not;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Boolean {
    FALSE = 0,
    TRUE = 1,
}

impl Not for Boolean {
    type Output = Boolean;
    #[inline(always)]
    fn not(self) -> Self::Output {
        return match self {
            Boolean::FALSE => Boolean::TRUE,
            Boolean::TRUE => Boolean::FALSE,
        };
    }
}
