use std::{fs::File, io::BufReader, path::PathBuf, process::ExitCode};

use clap::Parser;
use fm_explanations::{
    DefaultOracleFactory, ExplanationError, InvariantPresenceCondition,
    MusInvariantPresenceConditionExplanationCreator, OracleConfig, OracleError, TraceModel,
};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    read_model::{NamedConstraint, ReadModelError, parse_formula, read_model},
    variables::Variables,
};

mod read_model;
mod variables;

/// 特徴モデルの制約から，式が常に真 (偽) になる理由を説明する
#[derive(Parser, Debug)]
#[command(name = "explain_fm", version)]
struct Cli {
    /// Constraint file (`name : expression ;` per line). Reads stdin when omitted.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Expression to explain
    #[arg(long)]
    subject: String,

    /// Additional expression assumed to hold (repeatable)
    #[arg(long = "support")]
    supports: Vec<String>,

    /// Explain why the subject is never true instead of always true
    #[arg(long)]
    contradiction: bool,

    /// Maximum number of minimal unsatisfiable subsets to enumerate
    #[arg(long, default_value_t = OracleConfig::default().max_subsets)]
    max_subsets: usize,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    ReadModel(#[from] ReadModelError),
    #[error(transparent)]
    Explanation(#[from] ExplanationError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    debug!(?cli, "arguments");

    return match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    };
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let constraints = match &cli.model {
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::Open {
                path: path.clone(),
                source,
            })?;
            read_model(&mut BufReader::new(file))?
        }
        None => read_model(&mut BufReader::new(std::io::stdin()))?,
    };
    print!("{}", explain_model(cli, &constraints)?);
    return Ok(());
}

/// 読み込んだ制約に対する説明を文字列にする
fn explain_model(cli: &Cli, constraints: &[NamedConstraint]) -> Result<String, CliError> {
    let mut variables = Variables::default();
    let mut trace_model = TraceModel::new();
    for constraint in constraints.iter() {
        let expression = variables.to_node(&constraint.formula);
        trace_model.add_constraint(constraint.name.as_str(), expression);
    }
    info!(
        number_of_constraints = trace_model.number_of_constraints(),
        trace_count = trace_model.trace_count(),
        number_of_features = variables.len(),
        "read feature model"
    );

    let mut expression_stack = vec![variables.to_node(&parse_formula(&cli.subject)?)];
    for support in cli.supports.iter() {
        expression_stack.push(variables.to_node(&parse_formula(support)?));
    }
    let subject = variables.render(&expression_stack[0]);

    let algorithm = InvariantPresenceCondition::new(expression_stack, !cli.contradiction)?;
    let factory = DefaultOracleFactory::new(OracleConfig {
        max_subsets: cli.max_subsets,
    });
    let mut creator = MusInvariantPresenceConditionExplanationCreator::with_factory(
        &trace_model,
        algorithm,
        factory,
    );

    return match creator.explanation() {
        Ok(Some(explanation)) => Ok(variables.render_explanation(&explanation)),
        Ok(None) => Ok("no explanation\n".to_string()),
        Err(ExplanationError::Oracle(OracleError::Satisfiable { .. })) => Ok(format!(
            "{} is not always {}\n",
            subject,
            if cli.contradiction { "false" } else { "true" }
        )),
        Err(error) => Err(error.into()),
    };
}
