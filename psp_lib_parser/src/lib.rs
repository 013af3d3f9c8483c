// The file is tokenised into rows with chumsky, then rows are grouped into the
// `*`-separated blocks of the PSPLIB layout and interpreted by their heading.

use std::collections::HashMap;

use chumsky::{prelude::*, Parser};
use structs::{
    PspLibPrecedenceRelation, PspLibProblem, PspLibProblemResources, PspLibProjectInformation,
    PspLibRequestDuration,
};
use thiserror::Error;

pub mod structs;

#[derive(Debug, Error)]
pub enum PspLibParseError {
    #[error("ParseError occurred ({} errors)", .0.len())]
    ParseError(Vec<Simple<char>>),
    #[error("Project info incomplete")]
    ProjectInfoIncomplete,
    #[error("section `{0}` is missing")]
    MissingSection(&'static str),
    #[error("header value `{0}` is missing")]
    MissingValue(&'static str),
    #[error("header value `{key}` is not a number: `{value}`")]
    InvalidValue { key: &'static str, value: String },
    #[error("row {row} of section `{section}` is malformed: {reason}")]
    MalformedRow {
        section: &'static str,
        row: usize,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line {
    Numbers(Vec<usize>),
    Text(String),
    Blank,
}

type Block = Vec<Line>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Section {
    ProjectInformation,
    PrecedenceRelations,
    RequestsDurations,
    ResourceAvailabilities,
}

impl Section {
    fn from_heading(heading: &str) -> Option<Self> {
        match heading.trim().trim_end_matches(':').trim() {
            "PROJECT INFORMATION" => Some(Self::ProjectInformation),
            "PRECEDENCE RELATIONS" => Some(Self::PrecedenceRelations),
            "REQUESTS/DURATIONS" => Some(Self::RequestsDurations),
            "RESOURCEAVAILABILITIES" => Some(Self::ResourceAvailabilities),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::ProjectInformation => "PROJECT INFORMATION",
            Self::PrecedenceRelations => "PRECEDENCE RELATIONS",
            Self::RequestsDurations => "REQUESTS/DURATIONS",
            Self::ResourceAvailabilities => "RESOURCEAVAILABILITIES",
        }
    }
}

pub fn parse_psp_lib(content: &str) -> Result<PspLibProblem, PspLibParseError> {
    let blocks = blocks_parser()
        .parse(content)
        .map_err(PspLibParseError::ParseError)?;

    let mut header: Vec<(String, String)> = vec![];
    let mut sections: HashMap<Section, Vec<Vec<usize>>> = HashMap::new();

    for block in blocks {
        let section = match block.first() {
            Some(Line::Text(heading)) => Section::from_heading(heading),
            _ => None,
        };

        match section {
            // Column headers and dashed rulers are text rows, only numeric rows carry data
            Some(section) => {
                let rows = block
                    .into_iter()
                    .filter_map(|line| match line {
                        Line::Numbers(numbers) => Some(numbers),
                        _ => None,
                    })
                    .collect();
                sections.insert(section, rows);
            }
            None => {
                for line in block {
                    if let Line::Text(line) = line {
                        if let Some((key, value)) = line.split_once(':') {
                            header.push((key.trim().to_lowercase(), value.trim().to_owned()));
                        }
                    }
                }
            }
        }
    }

    let resources = PspLibProblemResources {
        renewable: header_number(&header, "- renewable")?,
        nonrenewable: header_number(&header, "- nonrenewable")?,
        doubly_constrained: header_number(&header, "- doubly constrained")?,
    };
    let resource_count =
        resources.renewable + resources.nonrenewable + resources.doubly_constrained;

    let project_info = section_rows(&sections, Section::ProjectInformation)?
        .iter()
        .map(|row| match row.as_slice() {
            [number, jobs, relative_date, due_date, tard_cost, mpm_time, ..] => {
                Ok(PspLibProjectInformation {
                    number: *number,
                    jobs: *jobs,
                    relative_date: *relative_date,
                    due_date: *due_date,
                    tard_cost: *tard_cost,
                    mpm_time: *mpm_time,
                })
            }
            _ => Err(PspLibParseError::ProjectInfoIncomplete),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let precedence_relations = section_rows(&sections, Section::PrecedenceRelations)?
        .iter()
        .enumerate()
        .map(|(index, row)| parse_precedence_relation(index, row))
        .collect::<Result<Vec<_>, _>>()?;

    let request_durations = section_rows(&sections, Section::RequestsDurations)?
        .iter()
        .enumerate()
        .map(|(index, row)| parse_request_duration(index, row, resource_count))
        .collect::<Result<Vec<_>, _>>()?;

    let resource_availabilities = section_rows(&sections, Section::ResourceAvailabilities)?
        .first()
        .cloned()
        .unwrap_or_default();
    if resource_availabilities.len() != resource_count {
        return Err(PspLibParseError::MalformedRow {
            section: Section::ResourceAvailabilities.name(),
            row: 1,
            reason: format!(
                "expected {resource_count} availabilities, found {}",
                resource_availabilities.len()
            ),
        });
    }

    Ok(PspLibProblem {
        file_with_basedata: header_value(&header, "file with basedata")?.to_owned(),
        initial_rng: header_number(&header, "initial value random generator")?,
        projects: header_number(&header, "projects")?,
        jobs: header_number(&header, "jobs")?,
        horizon: header_number(&header, "horizon")?,
        resources,
        project_info,
        precedence_relations,
        request_durations,
        resource_availabilities,
    })
}

fn section_rows(
    sections: &HashMap<Section, Vec<Vec<usize>>>,
    section: Section,
) -> Result<&Vec<Vec<usize>>, PspLibParseError> {
    sections
        .get(&section)
        .ok_or(PspLibParseError::MissingSection(section.name()))
}

fn header_value<'a>(
    header: &'a [(String, String)],
    key: &'static str,
) -> Result<&'a str, PspLibParseError> {
    header
        .iter()
        .find(|(name, _)| name.starts_with(key))
        .map(|(_, value)| value.as_str())
        .ok_or(PspLibParseError::MissingValue(key))
}

/// Values such as `4   R` carry a unit marker after the number.
fn header_number(header: &[(String, String)], key: &'static str) -> Result<usize, PspLibParseError> {
    let value = header_value(header, key)?;

    value
        .split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| PspLibParseError::InvalidValue {
            key,
            value: value.to_owned(),
        })
}

fn parse_precedence_relation(
    index: usize,
    row: &[usize],
) -> Result<PspLibPrecedenceRelation, PspLibParseError> {
    let malformed = |reason: String| PspLibParseError::MalformedRow {
        section: Section::PrecedenceRelations.name(),
        row: index + 1,
        reason,
    };

    match row {
        [job_number, mode_count, successor_count, successors @ ..] => {
            if successors.len() != *successor_count {
                return Err(malformed(format!(
                    "declares {successor_count} successors but lists {}",
                    successors.len()
                )));
            }

            Ok(PspLibPrecedenceRelation {
                job_number: *job_number,
                mode_count: *mode_count,
                successor_count: *successor_count,
                successors: successors.to_vec(),
            })
        }
        _ => Err(malformed(format!("expected at least 3 columns, found {}", row.len()))),
    }
}

fn parse_request_duration(
    index: usize,
    row: &[usize],
    resource_count: usize,
) -> Result<PspLibRequestDuration, PspLibParseError> {
    match row {
        [job_number, mode, duration, requests @ ..] if requests.len() == resource_count => {
            Ok(PspLibRequestDuration {
                job_number: *job_number,
                mode: *mode,
                duration: *duration,
                requests: requests.to_vec(),
            })
        }
        _ => Err(PspLibParseError::MalformedRow {
            section: Section::RequestsDurations.name(),
            row: index + 1,
            reason: format!(
                "expected {} columns, found {}",
                resource_count + 3,
                row.len()
            ),
        }),
    }
}

fn inline_whitespace() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    filter(|c: &char| *c == ' ' || *c == '\t')
        .repeated()
        .ignored()
}

fn line_end() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    inline_whitespace().then_ignore(text::newline().or(end()))
}

pub(crate) fn separator_parser() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    just('*')
        .repeated()
        .at_least(1)
        .ignore_then(line_end())
        .labelled("separator")
}

fn number() -> impl Parser<char, usize, Error = Simple<char>> + Clone {
    text::digits(10)
        .try_map(|digits: String, span| {
            digits
                .parse::<usize>()
                .map_err(|err| Simple::custom(span, err.to_string()))
        })
        .labelled("number")
}

pub(crate) fn number_row_parser() -> impl Parser<char, Line, Error = Simple<char>> + Clone {
    let gap = filter(|c: &char| *c == ' ' || *c == '\t')
        .repeated()
        .at_least(1);

    inline_whitespace()
        .ignore_then(number().separated_by(gap).allow_trailing().at_least(1))
        .then_ignore(line_end())
        .map(Line::Numbers)
        .labelled("number row")
}

fn blank_row_parser() -> impl Parser<char, Line, Error = Simple<char>> + Clone {
    inline_whitespace()
        .then_ignore(text::newline())
        .to(Line::Blank)
}

pub(crate) fn text_row_parser() -> impl Parser<char, Line, Error = Simple<char>> + Clone {
    none_of("*\r\n")
        .chain(none_of("\r\n").repeated())
        .collect::<String>()
        .then_ignore(text::newline().or(end()))
        .map(|line| match line.trim() {
            "" => Line::Blank,
            line => Line::Text(line.to_owned()),
        })
        .labelled("text row")
}

fn row_parser() -> impl Parser<char, Line, Error = Simple<char>> + Clone {
    number_row_parser()
        .or(blank_row_parser())
        .or(text_row_parser())
}

pub(crate) fn blocks_parser() -> impl Parser<char, Vec<Block>, Error = Simple<char>> {
    let block = row_parser().repeated().map(|rows| {
        rows.into_iter()
            .filter(|row| *row != Line::Blank)
            .collect::<Block>()
    });

    separator_parser()
        .repeated()
        .ignore_then(
            block
                .clone()
                .then_ignore(separator_parser().repeated().at_least(1))
                .repeated(),
        )
        .then(block)
        .then_ignore(end())
        .map(|(mut blocks, trailing)| {
            blocks.push(trailing);
            blocks.retain(|block| !block.is_empty());
            blocks
        })
}
