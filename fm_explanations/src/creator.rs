use mus_oracle::{DefaultOracleFactory, MusOracle, OracleFactory};
use tracing::debug;

use crate::{
    error::ExplanationError,
    reason::Reason,
    trace_model::{TraceIndexOutOfRange, TraceModel},
};

/// 説明の生成アルゴリズム
pub trait ExplanationAlgorithm {
    type Subject;
    type Explanation;

    fn subject(&self) -> Option<&Self::Subject>;

    fn set_subject(&mut self, subject: Option<Self::Subject>);

    /// `oracle` はトレースモデルの節だけを持つ状態で渡される．返す前に同じ状態へ戻すこと
    fn explain(
        &self,
        oracle: &mut dyn MusOracle,
        trace_model: &TraceModel,
    ) -> Result<Option<Self::Explanation>, ExplanationError>;
}

/// oracle の生成・キャッシュと説明アルゴリズムの呼び出しを受け持つ
///
/// oracle は最初に必要になったときにトレースモデルの CNF から作り，`reset` するまで使い回す
pub struct ExplanationCreator<'a, AlgorithmT, FactoryT = DefaultOracleFactory> {
    trace_model: &'a TraceModel,
    factory: FactoryT,
    algorithm: AlgorithmT,
    oracle: Option<Box<dyn MusOracle>>,
}

impl<'a, AlgorithmT> ExplanationCreator<'a, AlgorithmT, DefaultOracleFactory>
where
    AlgorithmT: ExplanationAlgorithm,
{
    pub fn new(trace_model: &'a TraceModel, algorithm: AlgorithmT) -> Self {
        return Self::with_factory(trace_model, algorithm, DefaultOracleFactory::default());
    }
}

impl<'a, AlgorithmT, FactoryT> ExplanationCreator<'a, AlgorithmT, FactoryT>
where
    AlgorithmT: ExplanationAlgorithm,
    FactoryT: OracleFactory,
{
    pub fn with_factory(
        trace_model: &'a TraceModel,
        algorithm: AlgorithmT,
        factory: FactoryT,
    ) -> Self {
        Self {
            trace_model,
            factory,
            algorithm,
            oracle: None,
        }
    }

    pub fn algorithm(&self) -> &AlgorithmT {
        return &self.algorithm;
    }

    pub fn algorithm_mut(&mut self) -> &mut AlgorithmT {
        return &mut self.algorithm;
    }

    pub fn subject(&self) -> Option<&AlgorithmT::Subject> {
        return self.algorithm.subject();
    }

    /// キャッシュ済みの oracle はそのまま使い続ける
    pub fn set_subject(&mut self, subject: Option<AlgorithmT::Subject>) {
        self.algorithm.set_subject(subject);
    }

    pub fn has_oracle(&self) -> bool {
        return self.oracle.is_some();
    }

    pub fn oracle(&mut self) -> &mut dyn MusOracle {
        let trace_model = self.trace_model;
        let factory = &self.factory;
        let oracle = self
            .oracle
            .get_or_insert_with(|| create_oracle(factory, trace_model));
        return &mut **oracle;
    }

    /// キャッシュ済みの oracle を捨てる
    pub fn reset(&mut self) {
        if self.oracle.take().is_some() {
            debug!("dropped cached oracle");
        }
    }

    /// 基礎式の節番号に対応する原因
    pub fn reason(&self, clause_index: usize) -> Result<Reason, TraceIndexOutOfRange> {
        return self.trace_model.reason_for(clause_index);
    }

    /// 説明対象がなければ `Ok(None)`
    ///
    /// push の途中で矛盾が確定した場合も説明なしとして `Ok(None)` を返す
    pub fn explanation(&mut self) -> Result<Option<AlgorithmT::Explanation>, ExplanationError> {
        if self.algorithm.subject().is_none() {
            return Ok(None);
        }
        let trace_model = self.trace_model;
        let factory = &self.factory;
        let oracle = self
            .oracle
            .get_or_insert_with(|| create_oracle(factory, trace_model));
        return match self.algorithm.explain(&mut **oracle, trace_model) {
            Err(ExplanationError::Contradiction(error)) => {
                debug!(%error, "contradiction while pushing, no explanation");
                Ok(None)
            }
            result => result,
        };
    }
}

fn create_oracle(factory: &impl OracleFactory, trace_model: &TraceModel) -> Box<dyn MusOracle> {
    debug!(trace_count = trace_model.trace_count(), "creating oracle");
    return factory.create_oracle(trace_model.cnf());
}
