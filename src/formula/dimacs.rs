//! Reading and writing the DIMACS CNF dialect
//!
//! - `c ...` lines are comments and blank lines are skipped
//! - exactly one `p ...` line, whose last two tokens are the variable and
//!   clause counts
//! - every other line is one clause of signed integers terminated by `0`
//! - a `%` line ends the clause section, as in the SATLIB benchmark files

use super::{check_variables, Clause, Formula};
use crate::{
    error::{Error, FormatError},
    Literal, Variable,
};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::warn;

struct Header {
    num_variables: Variable,
    num_clauses: usize,
}

impl Formula {
    pub fn parse(lines: impl IntoIterator<Item = impl AsRef<str>>) -> Result<Self, FormatError> {
        let mut header: Option<Header> = None;
        let mut clauses = Vec::new();

        for (idx, line) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let line = line.as_ref().trim();

            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            if line.starts_with('%') {
                break;
            }
            if line.starts_with('p') {
                if header.is_some() {
                    return Err(FormatError::DuplicateHeader { line: line_no });
                }
                header = Some(parse_header(line, line_no)?);
                continue;
            }

            let num_variables = match &header {
                Some(header) => header.num_variables,
                None => return Err(FormatError::MissingHeader { line: line_no }),
            };
            let literals = parse_clause(line, line_no, num_variables)?;
            if literals.is_empty() {
                return Err(FormatError::EmptyClause {
                    clause: clauses.len(),
                }
                .at(line_no));
            }
            clauses.push(Clause::new(literals));
        }

        let header = header.ok_or(FormatError::NoHeader)?;
        check_variables(header.num_variables)?;
        if header.num_clauses != clauses.len() {
            warn!(
                declared = header.num_clauses,
                found = clauses.len(),
                "clause count in problem line does not match the clauses read"
            );
        }

        Ok(Formula::from_clauses(header.num_variables, clauses))
    }

    pub fn parse_str(input: &str) -> Result<Self, FormatError> {
        Self::parse(input.lines())
    }

    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::io(path, e))?;
        Ok(Self::parse(lines)?)
    }
}

fn parse_header(line: &str, line_no: usize) -> Result<Header, FormatError> {
    let invalid = || FormatError::InvalidHeader {
        line: line_no,
        content: line.to_string(),
    };

    let tokens = line.split_whitespace().collect::<Vec<_>>();
    match tokens.as_slice() {
        [_, .., vars, clauses] => Ok(Header {
            num_variables: vars.parse().map_err(|_| invalid())?,
            num_clauses: clauses.parse().map_err(|_| invalid())?,
        }),
        _ => Err(invalid()),
    }
}

fn parse_clause(
    line: &str,
    line_no: usize,
    num_variables: Variable,
) -> Result<Vec<Literal>, FormatError> {
    let tokens = line
        .split_whitespace()
        .map(|token| {
            token.parse::<isize>().map_err(|_| FormatError::InvalidToken {
                line: line_no,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    match tokens.split_last() {
        Some((0, literals)) => literals
            .iter()
            .map(|x| Literal::from_dimacs(*x, num_variables).map_err(|e| e.at(line_no)))
            .collect(),
        _ => Err(FormatError::MissingTerminator { line: line_no }),
    }
}

/// Writes the formula back out as DIMACS
impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_variables(), self.num_clauses())?;
        for clause in self.clauses() {
            writeln!(f, "{}", clause)?;
        }
        Ok(())
    }
}

#[test]
fn parse_example() -> Result<(), FormatError> {
    let formula = Formula::parse_str(
        "c an example\n\
         c with two comments\n\
         p cnf 3 3\n\
         1 2 0\n\
         \n\
         -1 3 0\n\
         -2 -3 0\n",
    )?;
    assert_eq!(formula.num_variables(), 3);
    assert_eq!(formula.num_clauses(), 3);
    assert_eq!(
        formula
            .clauses()
            .iter()
            .map(|clause| clause.literals().iter().map(|l| l.to_dimacs()).collect())
            .collect::<Vec<Vec<_>>>(),
        vec![vec![1, 2], vec![-1, 3], vec![-2, -3]]
    );
    Ok(())
}

#[test]
fn header_uses_last_two_tokens() -> Result<(), FormatError> {
    let formula = Formula::parse_str("p cnf extra 4 1\n1 -4 0\n")?;
    assert_eq!(formula.num_variables(), 4);
    assert_eq!(formula.num_clauses(), 1);
    Ok(())
}

#[test]
fn satlib_trailer_ends_clauses() -> Result<(), FormatError> {
    let formula = Formula::parse_str("p cnf 2 2\n1 2 0\n-1 0\n%\n0\n\n")?;
    assert_eq!(formula.num_clauses(), 2);
    Ok(())
}

#[test]
fn clause_count_mismatch_is_tolerated() -> Result<(), FormatError> {
    let formula = Formula::parse_str("p cnf 2 5\n1 2 0\n")?;
    assert_eq!(formula.num_clauses(), 1);
    Ok(())
}

#[test]
fn malformed_input() {
    let parse = |input: &str| Formula::parse_str(input).err();

    assert_eq!(parse("1 2 0\n"), Some(FormatError::MissingHeader { line: 1 }));
    assert_eq!(parse("c nothing\n"), Some(FormatError::NoHeader));
    assert_eq!(
        parse("p cnf 2\n"),
        Some(FormatError::InvalidHeader {
            line: 1,
            content: "p cnf 2".to_string()
        })
    );
    assert_eq!(
        parse("p cnf 2 1\np cnf 2 1\n"),
        Some(FormatError::DuplicateHeader { line: 2 })
    );
    assert_eq!(
        parse("p cnf 2 1\n1 x 0\n"),
        Some(FormatError::InvalidToken {
            line: 2,
            token: "x".to_string()
        })
    );
    assert_eq!(
        parse("p cnf 2 1\n1 2\n"),
        Some(FormatError::MissingTerminator { line: 2 })
    );
    assert_eq!(
        parse("p cnf 2 1\n1 3 0\n"),
        Some(
            FormatError::LiteralOutOfRange {
                literal: 3,
                num_variables: 2
            }
            .at(2)
        )
    );
    assert_eq!(parse("p cnf 2 1\n1 0 2 0\n"), Some(FormatError::ZeroLiteral.at(2)));
    assert_eq!(
        parse("p cnf 2 1\n0\n"),
        Some(FormatError::EmptyClause { clause: 0 }.at(2))
    );
    assert_eq!(parse("p cnf 0 0\n"), Some(FormatError::NoVariables));
    assert_eq!(
        parse("p cnf 99999999999999 1\n1 0\n"),
        Some(FormatError::TooManyVariables {
            num_variables: 99_999_999_999_999,
            max: Formula::MAX_VARIABLES
        })
    );
}

#[test]
fn parse_file_reports_missing_file() {
    let err = Formula::parse_file("does/not/exist.cnf").err();
    assert!(matches!(err, Some(Error::Io { .. })));
}

#[cfg(test)]
mod properties {
    use crate::{arbitrary::Instance, Formula};
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn display_round_trips(instance: Instance) -> bool {
        let formula = instance.formula;
        match Formula::parse_str(&formula.to_string()) {
            Ok(reparsed) => {
                reparsed.num_variables() == formula.num_variables()
                    && reparsed.clauses() == formula.clauses()
            }
            Err(_) => false,
        }
    }
}
