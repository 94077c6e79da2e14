// Statistical primitives for the cutover comparison
//
// - Shapiro-Wilk normality test (Royston's AS R94 approximation)
// - Student's / Welch's two-sample t-test via aprender's `ttest_ind`
// - Two-sided Mann-Whitney U (exact for small tie-free samples,
//   tie-corrected normal approximation otherwise)
// - Quartiles via aprender's DescriptiveStats over trueno vectors (R-7
//   interpolation), means via statrs

mod comparison;
mod descriptive;
mod normality;

pub use comparison::{mann_whitney_u, t_test, ComparisonTest, TestMethod};
pub use descriptive::{five_number_summary, mean, quartiles, round_to, FiveNumberSummary};
pub use normality::{shapiro_wilk, NormalityTest};
