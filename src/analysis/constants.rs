//! Fixed parameters of the study
//!
//! The composite definitions and normalization list describe how the raw
//! survey columns become the variables used by the research questions.

use super::transform::{Composite, Normalization};

/// Significance level used by every verdict.
pub const ALPHA: f64 = 0.05;

/// Groups whose sample variance is not above this are left out of Levene's test.
pub const VARIANCE_TOLERANCE: f64 = 1e-10;

/// Allowed deviation of a composite's weights from a sum of 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Equal-width bins per histogram.
pub const HISTOGRAM_BINS: usize = 10;

/// Dataset read when no input is given on the command line.
pub const DEFAULT_INPUT: &str = "dataset.csv";

/// Directory receiving plots and the results report by default.
pub const DEFAULT_OUTPUT_DIR: &str = "plots";

/// Grouping values compared by the Mann-Whitney U test.
pub const MANN_WHITNEY_GROUPS: (f64, f64) = (1.0, 2.0);

/// Composite experience variables, derived in this order.
pub const COMPOSITES: &[Composite] = &[
    Composite {
        target: "GAME_EXP_COMP",
        terms: &[("GAME_EXP", 0.75), ("GAME_EXP_HOUR", 0.25)],
    },
    Composite {
        target: "PROG_EXP_COMP",
        terms: &[
            ("PROG_EXP", 0.5),
            ("PROG_EXP_YEAR", 0.25),
            ("PROG_EXP_HOUR", 0.25),
        ],
    },
];

/// Columns min-max normalized after the composites are derived.
pub const NORMALIZATIONS: &[Normalization] = &[
    Normalization {
        source: "MOT_MEAN",
        target: "MOT_MEAN_NORM",
    },
    Normalization::in_place("PROG_EXP_COMP"),
    Normalization::in_place("GAME_EXP_COMP"),
    Normalization::in_place("USE_FREQ"),
    Normalization::in_place("CONTRIB_DIFF"),
];
