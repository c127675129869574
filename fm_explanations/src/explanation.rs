use indexmap::IndexSet;
use prop_logic::Node;

use crate::reason::Reason;

/// 説明対象がなぜ常に真 (または常に偽) なのかの説明
///
/// 原因は見つかった順に重複なく保持する
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Explanation {
    subject: Node,
    tautology: bool,
    reasons: IndexSet<Reason>,
}

impl Explanation {
    pub(crate) fn new(subject: Node, tautology: bool) -> Self {
        Self {
            subject,
            tautology,
            reasons: IndexSet::default(),
        }
    }

    /// 新しい原因なら true
    pub(crate) fn add_reason(&mut self, reason: Reason) -> bool {
        return self.reasons.insert(reason);
    }

    pub fn subject(&self) -> &Node {
        return &self.subject;
    }

    /// true なら常に真であることの説明，false なら常に偽であることの説明
    pub fn is_tautology(&self) -> bool {
        return self.tautology;
    }

    pub fn reasons(&self) -> impl Iterator<Item = &Reason> + Clone + '_ {
        return self.reasons.iter();
    }

    pub fn number_of_reasons(&self) -> usize {
        return self.reasons.len();
    }

    pub fn contains(&self, reason: &Reason) -> bool {
        return self.reasons.contains(reason);
    }
}

impl std::fmt::Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} is always {} because of:",
            self.subject,
            if self.tautology { "true" } else { "false" }
        )?;
        for reason in self.reasons.iter() {
            writeln!(f, "  {}", reason)?;
        }
        return Ok(());
    }
}
