use std::ops::Range;

use prop_logic::Node;

/// 節番号の持ち主
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ClauseOwner<'a> {
    /// `[0, trace_count)` の基礎式の節
    Trace,
    /// 説明対象自身の仮定．原因には含めない
    Suppressed,
    /// push した補助式の節
    Expression(&'a Node),
    /// どの範囲にも属さない
    Unknown,
}

/// push した式ごとの節番号の割り当て
///
/// 基礎式の `[0, trace_count)` の直後から，式ごとに隙間なく範囲を割り当てる
pub(crate) struct ClauseIndexSpace<'a> {
    trace_count: usize,
    ranges: Vec<OwnedRange<'a>>,
}

struct OwnedRange<'a> {
    range: Range<usize>,
    expression: &'a Node,
    suppressed: bool,
}

impl<'a> ClauseIndexSpace<'a> {
    pub fn new(trace_count: usize) -> Self {
        Self {
            trace_count,
            ranges: Vec::default(),
        }
    }

    pub fn next_index(&self) -> usize {
        return self
            .ranges
            .last()
            .map_or(self.trace_count, |owned| owned.range.end);
    }

    pub fn number_of_local_clauses(&self) -> usize {
        return self.next_index() - self.trace_count;
    }

    pub fn allocate(
        &mut self,
        expression: &'a Node,
        number_of_clauses: usize,
        suppressed: bool,
    ) -> Range<usize> {
        let start = self.next_index();
        let range = start..start + number_of_clauses;
        self.ranges.push(OwnedRange {
            range: range.clone(),
            expression,
            suppressed,
        });
        return range;
    }

    pub fn resolve(&self, index: usize) -> ClauseOwner<'a> {
        if index < self.trace_count {
            return ClauseOwner::Trace;
        }
        let position = self.ranges.partition_point(|owned| owned.range.end <= index);
        return match self.ranges.get(position) {
            Some(owned) if owned.range.contains(&index) => {
                if owned.suppressed {
                    ClauseOwner::Suppressed
                } else {
                    ClauseOwner::Expression(owned.expression)
                }
            }
            _ => ClauseOwner::Unknown,
        };
    }
}
