pub mod category;
pub mod types;
pub mod verdict;

pub use category::{MaterialType, UnknownVariant, ViolationCategory};
pub use types::{
    AnalysisResult, CategoryMatches, DisclaimerLocation, DisclaimerStatus, MatchEvidence,
    SizeCheck, Visibility,
};
pub use verdict::Verdict;
