pub mod analyzer;
pub mod build_info;
pub mod config;
pub mod graph;
pub mod init;
pub mod license;
pub mod output;
pub mod pom;
pub mod resolve;
pub mod store;

// Re-export main types for easy access
pub use analyzer::{analyze_module, AnalysisOptions, ModuleAnalyzer, ModuleReport};
pub use license::{LicenseReport, LicenseSummary, LicenseCompliance, LicenseWarning};
pub use pom::{Coordinate, Manifest, ManifestError, PomParser};
pub use resolve::{EffectiveManifest, ResolverContext};
pub use store::ManifestStore;
