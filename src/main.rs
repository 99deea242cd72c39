use argh::FromArgs;
use std::path::PathBuf;
use survey_eda::analysis::constants::{DEFAULT_INPUT, DEFAULT_OUTPUT_DIR};
use survey_eda::analysis::{Assumptions, Outputs, ResearchQuestion, RESEARCH_QUESTIONS};
use survey_eda::common::PlotSink;
use survey_eda::{run_analysis, AnalysisError};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "survey_eda=info";

/// Section heading of a research question given on the command line
const AD_HOC_SECTION: &str = "Ad hoc";

/// Exploratory analysis of the contributor survey
#[derive(FromArgs, Debug)]
struct Args {
    /// dataset to analyze, `.zst` files are decompressed (default: dataset.csv)
    #[argh(option, short = 'i', default = "PathBuf::from(DEFAULT_INPUT)")]
    input: PathBuf,

    /// directory receiving the plots and results.json (default: plots)
    #[argh(option, short = 'o', default = "PathBuf::from(DEFAULT_OUTPUT_DIR)")]
    output: PathBuf,

    /// do not render plots
    #[argh(switch)]
    no_plots: bool,

    /// independent column of a research question to run instead of the built-in ones
    #[argh(option)]
    independent: Option<String>,

    /// dependent column of a research question to run instead of the built-in ones
    #[argh(option)]
    dependent: Option<String>,

    /// association test of that question: pearson, kendall, spearman or mann_whitney (default: pearson)
    #[argh(option, default = "String::from(\"pearson\")")]
    method: String,

    /// assumption checks to run first: skip, standard, per-group or bidirectional
    #[argh(option)]
    assumptions: Option<Assumptions>,
}

type Result<T> = core::result::Result<T, AnalysisError>;

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Args = argh::from_env();

    let questions: Vec<ResearchQuestion<'_>> = match (&args.independent, &args.dependent) {
        (Some(independent), Some(dependent)) => vec![ResearchQuestion {
            section: AD_HOC_SECTION,
            independent,
            dependent,
            method: &args.method,
            assumptions: args.assumptions.unwrap_or_default(),
        }],
        (None, None) => RESEARCH_QUESTIONS
            .iter()
            .map(|question| ResearchQuestion {
                assumptions: args.assumptions.unwrap_or(question.assumptions),
                ..question.clone()
            })
            .collect(),
        _ => {
            return Err(AnalysisError::InvalidArguments(
                "--independent and --dependent must be given together".to_string(),
            ))
        }
    };

    let plots = if args.no_plots {
        PlotSink::disabled()
    } else {
        PlotSink::new(&args.output)
    };
    let mut outputs = Outputs::new(plots);

    run_analysis(&args.input, &questions, &mut outputs)?;

    if !outputs.report.is_empty() {
        let path = outputs.report.write(&args.output)?;
        tracing::info!(path = %path.display(), "Wrote results report");
    }
    tracing::info!(plots = outputs.plots.count(), "Analysis complete");

    Ok(())
}
