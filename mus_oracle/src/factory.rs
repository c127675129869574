use prop_logic::Clause;
use tracing::debug;

use crate::{mus_extractor::DpllMusExtractor, oracle::MusOracle};

#[derive(Clone, Debug)]
pub struct OracleConfig {
    /// `all_minimal_unsatisfiable_subset_indexes` で列挙する MUS の上限
    pub max_subsets: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { max_subsets: 32 }
    }
}

/// 基礎式から oracle を作る
pub trait OracleFactory {
    fn create_oracle(&self, clauses: &[Clause]) -> Box<dyn MusOracle>;
}

/// `DpllMusExtractor` を作る既定の factory
#[derive(Clone, Default, Debug)]
pub struct DefaultOracleFactory {
    config: OracleConfig,
}

impl DefaultOracleFactory {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OracleConfig {
        return &self.config;
    }
}

impl OracleFactory for DefaultOracleFactory {
    fn create_oracle(&self, clauses: &[Clause]) -> Box<dyn MusOracle> {
        debug!(
            number_of_clauses = clauses.len(),
            max_subsets = self.config.max_subsets,
            "creating DPLL MUS extractor"
        );
        return Box::new(DpllMusExtractor::new(clauses.to_vec(), &self.config));
    }
}

#[cfg(test)]
mod test {
    use prop_logic::{Clause, Literal};

    use super::{DefaultOracleFactory, OracleConfig, OracleFactory};

    #[test]
    fn test_default_factory_seeds_base_clauses() {
        let factory = DefaultOracleFactory::default();
        assert_eq!(factory.config().max_subsets, 32);

        let clauses = [
            Clause::unit(Literal::positive(0)),
            Clause::new([Literal::negative(0), Literal::positive(1)]),
        ];
        let mut oracle = factory.create_oracle(&clauses);
        assert_eq!(oracle.number_of_clauses(), 2);
        assert!(oracle.is_satisfiable());
        // 基礎式は pop できない
        assert!(oracle.pop(1).is_err());
    }

    #[test]
    fn test_config_is_carried() {
        let factory = DefaultOracleFactory::new(OracleConfig { max_subsets: 1 });
        let clauses = [
            Clause::unit(Literal::positive(0)),
            Clause::unit(Literal::negative(0)),
            Clause::unit(Literal::positive(1)),
            Clause::unit(Literal::negative(1)),
        ];
        let mut oracle = factory.create_oracle(&clauses);
        assert_eq!(
            oracle.all_minimal_unsatisfiable_subset_indexes().map(|indexes| indexes.len()),
            Ok(2)
        );
    }
}
