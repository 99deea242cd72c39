//! Research questions of the study and the order their checks run in

use super::association::{run_association, AssociationError, Method, INVALID_METHOD_MESSAGE};
use super::homoscedasticity::test_homoscedasticity;
use super::linearity::test_linearity;
use super::normality::{test_normality, test_normality_by_group, NormalityTest};
use super::{CheckError, Outputs};
use crate::common::Dataset;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while answering a research question
#[derive(Error, Debug)]
pub enum ResearchQuestionError {
    #[error("Assumption check failed for {question}: {source}")]
    Check {
        question: String,
        source: CheckError,
    },

    #[error("Association test failed for {question}: {source}")]
    Association {
        question: String,
        source: AssociationError,
    },
}

type Result<T> = core::result::Result<T, ResearchQuestionError>;

/// Assumption checks run before the association test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assumptions {
    /// Association test only
    #[default]
    Skip,
    /// Linearity, Levene, then Shapiro-Wilk on the dependent and independent columns
    Standard,
    /// Linearity, Levene, then Jarque-Bera on the dependent column within each independent group
    PerGroup,
    /// Linearity, Levene with both columns as the grouping column, Shapiro-Wilk on both
    Bidirectional,
}

impl FromStr for Assumptions {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Assumptions::Skip),
            "standard" => Ok(Assumptions::Standard),
            "per-group" => Ok(Assumptions::PerGroup),
            "bidirectional" => Ok(Assumptions::Bidirectional),
            other => Err(format!(
                "unknown assumption suite '{}', expected one of: skip, standard, per-group, bidirectional",
                other
            )),
        }
    }
}

impl fmt::Display for Assumptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Assumptions::Skip => "skip",
            Assumptions::Standard => "standard",
            Assumptions::PerGroup => "per-group",
            Assumptions::Bidirectional => "bidirectional",
        })
    }
}

/// A pair of columns and the test relating them
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchQuestion<'a> {
    /// Heading the question is printed under, e.g. `RQ2`
    pub section: &'a str,
    pub independent: &'a str,
    pub dependent: &'a str,
    /// Method selector, parsed when the question runs
    pub method: &'a str,
    pub assumptions: Assumptions,
}

impl ResearchQuestion<'_> {
    pub fn title(&self) -> String {
        format!("{} vs. {}", self.independent, self.dependent)
    }
}

/// The research questions answered by a default run.
pub const RESEARCH_QUESTIONS: &[ResearchQuestion<'static>] = &[
    ResearchQuestion {
        section: "RQ2",
        independent: "PROG_EXP_COMP",
        dependent: "MOT_MEAN_NORM",
        method: "pearson",
        assumptions: Assumptions::Skip,
    },
    ResearchQuestion {
        section: "RQ2",
        independent: "GAME_EXP_COMP",
        dependent: "MOT_MEAN_NORM",
        method: "pearson",
        assumptions: Assumptions::Skip,
    },
    ResearchQuestion {
        section: "RQ4",
        independent: "USE_FREQ",
        dependent: "CONTRIB_DIFF",
        method: "kendall",
        assumptions: Assumptions::Skip,
    },
    ResearchQuestion {
        section: "RQ5",
        independent: "STATEMENT",
        dependent: "MOT_MEAN",
        method: "mann_whitney",
        assumptions: Assumptions::Skip,
    },
];

/// Runs the configured assumption suite, then the association test.
///
/// Returns the method that ran, or `None` when the selector was not recognised.
pub fn run_research_question(
    dataset: &Dataset,
    question: &ResearchQuestion<'_>,
    outputs: &mut Outputs,
) -> Result<Option<Method>> {
    outputs.report.set_section(question.section);

    run_assumptions(dataset, question, outputs).map_err(|source| {
        ResearchQuestionError::Check {
            question: question.title(),
            source,
        }
    })?;

    let Ok(method) = question.method.parse::<Method>() else {
        println!("{}", INVALID_METHOD_MESSAGE);
        tracing::warn!(method = question.method, "Unknown association method");
        return Ok(None);
    };

    run_association(
        dataset,
        method,
        question.independent,
        question.dependent,
        outputs,
    )
    .map_err(|source| ResearchQuestionError::Association {
        question: question.title(),
        source,
    })?;

    Ok(Some(method))
}

fn run_assumptions(
    dataset: &Dataset,
    question: &ResearchQuestion<'_>,
    outputs: &mut Outputs,
) -> core::result::Result<(), CheckError> {
    let x = question.independent;
    let y = question.dependent;

    match question.assumptions {
        Assumptions::Skip => return Ok(()),
        Assumptions::Standard => {
            println!("Testing for linearity ...");
            test_linearity(dataset, x, y, outputs)?;
            println!("Testing for homoscedasticity ...");
            test_homoscedasticity(dataset, x, y, outputs)?;
            println!("Testing for normality ...");
            test_normality(dataset, y, NormalityTest::ShapiroWilk, outputs)?;
            test_normality(dataset, x, NormalityTest::ShapiroWilk, outputs)?;
        }
        Assumptions::PerGroup => {
            println!("Testing for linearity ...");
            test_linearity(dataset, x, y, outputs)?;
            println!("Testing for homoscedasticity ...");
            test_homoscedasticity(dataset, x, y, outputs)?;
            test_normality_by_group(dataset, y, x, NormalityTest::JarqueBera, outputs)?;
        }
        Assumptions::Bidirectional => {
            println!("Testing for linearity ...");
            test_linearity(dataset, x, y, outputs)?;
            println!(
                "Testing for homoscedasticity with dependent variable as independent variable ..."
            );
            test_homoscedasticity(dataset, y, x, outputs)?;
            println!("Testing for homoscedasticity as normal ...");
            test_homoscedasticity(dataset, x, y, outputs)?;
            println!("Testing for normality ...");
            test_normality(dataset, y, NormalityTest::ShapiroWilk, outputs)?;
            test_normality(dataset, x, NormalityTest::ShapiroWilk, outputs)?;
        }
    }

    println!("Testing for correlation ...");
    Ok(())
}

/// Runs `questions` in order, printing a heading whenever the section changes.
///
/// Sections holding several questions also print each question's title.
pub fn run_research_questions(
    dataset: &Dataset,
    questions: &[ResearchQuestion<'_>],
    outputs: &mut Outputs,
) -> Result<()> {
    let mut previous_section = None;

    for question in questions {
        let first_in_section = previous_section != Some(question.section);
        if first_in_section {
            println!("\n############ {} ############", question.section);
        }

        let shared = questions
            .iter()
            .filter(|other| other.section == question.section)
            .count()
            > 1;
        if shared {
            let separator = if first_in_section { "" } else { "\n" };
            println!("{}***** {} *****", separator, question.title());
        }

        tracing::info!(
            section = question.section,
            method = question.method,
            assumptions = %question.assumptions,
            "Running {}",
            question.title()
        );
        run_research_question(dataset, question, outputs)?;
        previous_section = Some(question.section);
    }

    Ok(())
}
