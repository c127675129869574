use std::io::BufRead;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, not_line_ending, space0},
    combinator::{all_consuming, map, opt, recognize},
    multi::many0,
    sequence::{delimited, preceded},
};
use thiserror::Error;

/// 機能名で書かれた式
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Formula {
    Variable(String),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Equals(Box<Formula>, Box<Formula>),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NamedConstraint {
    pub name: String,
    pub formula: Formula,
}

#[derive(Clone, Debug)]
pub enum CommentOrConstraint {
    Comment(String),
    Constraint(NamedConstraint),
}

#[derive(Debug, Error)]
pub enum ReadModelError {
    #[error("cannot read line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: expected `<name> : <expression> ;` or a comment, found `{text}`")]
    Syntax { line: usize, text: String },
    #[error("cannot parse expression `{text}`")]
    InvalidExpression { text: String },
}

pub fn read_model(
    input: &mut std::io::BufReader<impl std::io::Read>,
) -> Result<Vec<NamedConstraint>, ReadModelError> {
    let mut constraints = Vec::default();

    let mut line = String::default();
    let mut line_number = 0;
    loop {
        line.clear();
        line_number += 1;
        let bytes = input
            .read_line(&mut line)
            .map_err(|source| ReadModelError::Io {
                line: line_number,
                source,
            })?;
        if bytes == 0 {
            break;
        }
        let text = line.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            continue;
        }
        let Ok((residual, comment_or_constraint)) = comment_or_constraint(text) else {
            return Err(ReadModelError::Syntax {
                line: line_number,
                text: text.to_string(),
            });
        };
        if residual != "" {
            return Err(ReadModelError::Syntax {
                line: line_number,
                text: text.to_string(),
            });
        }

        if let CommentOrConstraint::Constraint(constraint) = comment_or_constraint {
            constraints.push(constraint);
        }
    }

    return Ok(constraints);
}

pub fn parse_formula(text: &str) -> Result<Formula, ReadModelError> {
    return all_consuming(delimited(space0, expression, space0))
        .parse(text)
        .map(|(_, formula)| formula)
        .map_err(|_| ReadModelError::InvalidExpression {
            text: text.to_string(),
        });
}

fn comment_or_constraint(input: &str) -> IResult<&str, CommentOrConstraint> {
    // <comment_or_constraint> ::= <comment> | <constraint>
    alt((
        map(comment, CommentOrConstraint::Comment),
        map(constraint, CommentOrConstraint::Constraint),
    ))
    .parse(input)
}

fn comment(input: &str) -> IResult<&str, String> {
    // <comment> ::= "*" <any_sequence_of_characters_other_than_EOL>
    map((space0, tag("*"), not_line_ending), |(_, _, comment)| {
        str::to_string(comment)
    })
    .parse(input)
}

fn constraint(input: &str) -> IResult<&str, NamedConstraint> {
    // <constraint> ::= <identifier> ":" <expression> ";"
    map(
        (
            delimited(space0, identifier, space0),
            tag(":"),
            expression,
            token(";"),
        ),
        |(name, _, formula, _)| NamedConstraint { name, formula },
    )
    .parse(input)
}

fn expression(input: &str) -> IResult<&str, Formula> {
    equivalence(input)
}

fn equivalence(input: &str) -> IResult<&str, Formula> {
    // <equivalence> ::= <implication> ["<->" <implication>]
    map(
        (implication, opt(preceded(token("<->"), implication))),
        |(left, right)| match right {
            Some(right) => Formula::Equals(Box::new(left), Box::new(right)),
            None => left,
        },
    )
    .parse(input)
}

fn implication(input: &str) -> IResult<&str, Formula> {
    // <implication> ::= <disjunction> ["->" <implication>]
    map(
        (disjunction, opt(preceded(token("->"), implication))),
        |(premise, conclusion)| match conclusion {
            Some(conclusion) => Formula::Implies(Box::new(premise), Box::new(conclusion)),
            None => premise,
        },
    )
    .parse(input)
}

fn disjunction(input: &str) -> IResult<&str, Formula> {
    // <disjunction> ::= <conjunction> {"|" <conjunction>}
    map(
        (conjunction, many0(preceded(token("|"), conjunction))),
        |(first, rest)| {
            if rest.is_empty() {
                first
            } else {
                Formula::Or(std::iter::once(first).chain(rest).collect())
            }
        },
    )
    .parse(input)
}

fn conjunction(input: &str) -> IResult<&str, Formula> {
    // <conjunction> ::= <negation> {"&" <negation>}
    map(
        (negation, many0(preceded(token("&"), negation))),
        |(first, rest)| {
            if rest.is_empty() {
                first
            } else {
                Formula::And(std::iter::once(first).chain(rest).collect())
            }
        },
    )
    .parse(input)
}

fn negation(input: &str) -> IResult<&str, Formula> {
    // <negation> ::= "!" <negation> | <atom>
    alt((
        map(preceded(token("!"), negation), |formula| {
            Formula::Not(Box::new(formula))
        }),
        atom,
    ))
    .parse(input)
}

fn atom(input: &str) -> IResult<&str, Formula> {
    // <atom> ::= <identifier> | "(" <expression> ")"
    alt((
        map(delimited(space0, identifier, space0), Formula::Variable),
        delimited(token("("), expression, token(")")),
    ))
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, String> {
    // <identifier> ::= (<letter> | "_") {<letter> | <digit> | "_"}
    map(
        recognize((
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        str::to_string,
    )
    .parse(input)
}

fn token<'a>(
    text: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    delimited(space0, tag(text), space0)
}

#[cfg(test)]
mod test {
    use std::io::BufReader;

    use super::{Formula, NamedConstraint, ReadModelError, identifier, parse_formula, read_model};

    fn variable(name: &str) -> Formula {
        Formula::Variable(name.to_string())
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("Base"), Ok(("", "Base".to_string())));
        assert_eq!(identifier("_a1 b"), Ok((" b", "_a1".to_string())));
        assert_eq!(identifier("x_2&y"), Ok(("&y", "x_2".to_string())));
        assert!(identifier("").is_err());
        assert!(identifier("1a").is_err());
        assert!(identifier("!a").is_err());
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse_formula("a | b & !c").unwrap(),
            Formula::Or(vec![
                variable("a"),
                Formula::And(vec![variable("b"), Formula::Not(Box::new(variable("c")))])
            ])
        );
        let formula = parse_formula(" a -> b -> c ").unwrap();
        assert_eq!(
            formula,
            Formula::Implies(
                Box::new(variable("a")),
                Box::new(Formula::Implies(
                    Box::new(variable("b")),
                    Box::new(variable("c"))
                ))
            )
        );
        let formula = parse_formula("(a<->b)&c").unwrap();
        assert_eq!(
            formula,
            Formula::And(vec![
                Formula::Equals(Box::new(variable("a")), Box::new(variable("b"))),
                variable("c")
            ])
        );
        assert_eq!(
            parse_formula("!!a").unwrap(),
            Formula::Not(Box::new(Formula::Not(Box::new(variable("a")))))
        );
    }

    #[test]
    fn test_invalid_formula() {
        assert!(parse_formula("").is_err());
        assert!(parse_formula("a |").is_err());
        assert!(parse_formula("(a & b").is_err());
        assert!(parse_formula("a b").is_err());
        assert!(parse_formula("a <- b").is_err());
    }

    #[test]
    fn test_read_model() {
        let input = "* feature model\n\
                     root : Car ;\n\
                     \n\
                     engine: Car <-> Engine;\n\
                     \t* indented comment\n\
                     excludes : !(Electric & Diesel) ;\n";
        let constraints = read_model(&mut BufReader::new(input.as_bytes())).unwrap();
        assert_eq!(constraints.len(), 3);
        assert_eq!(
            constraints[0],
            NamedConstraint {
                name: "root".to_string(),
                formula: variable("Car")
            }
        );
        assert_eq!(constraints[1].name, "engine");
        assert_eq!(constraints[2].name, "excludes");
    }

    #[test]
    fn test_read_model_reports_line() {
        let input = "root : Car ;\nbroken Car ;\n";
        let error = read_model(&mut BufReader::new(input.as_bytes())).unwrap_err();
        assert!(matches!(error, ReadModelError::Syntax { line: 2, .. }));

        let input = "root : Car\n";
        assert!(read_model(&mut BufReader::new(input.as_bytes())).is_err());
    }
}
