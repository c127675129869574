mod decision_stack;
mod error;
mod factory;
mod mus_extractor;
mod oracle;

pub use error::{ContradictionError, OracleError};
pub use factory::{DefaultOracleFactory, OracleConfig, OracleFactory};
pub use mus_extractor::DpllMusExtractor;
pub use oracle::MusOracle;
