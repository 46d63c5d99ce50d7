//! Application services

pub mod analysis_dispatcher;
pub mod analysis_service;
pub mod architecture_extractor;
pub mod category_analyzer;
pub mod completeness_checker;
pub mod stride_coordinator;
pub mod whitebox_scanner;

pub use analysis_dispatcher::AnalysisDispatcher;
pub use analysis_service::AnalysisService;
pub use architecture_extractor::ArchitectureExtractor;
pub use category_analyzer::CategoryAnalyzer;
pub use completeness_checker::{CompletenessChecker, CompletenessReport, Feedback};
pub use stride_coordinator::{StrideCoordinator, DEFAULT_MAX_CONCURRENCY};
pub use whitebox_scanner::{WhiteboxScanner, CHUNK_SIZE, MAX_FILES};
