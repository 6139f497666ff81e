//! Mapper - screen resolution engine
//!
//! Scans a project's PSC screen corpus, indexes which screens reference which
//! object instances, ranks candidates, and computes the minimal set of DMS
//! writes that brings the stored alarm-screen mappings up to date.

pub mod backup;
pub mod candidates;
pub mod datapoints;
pub mod error;
pub mod keypath;
pub mod keystats;
pub mod resolver;
pub mod scanner;

pub use backup::BackupRecord;
pub use candidates::CandidateIndex;
pub use datapoints::AlarmRegistry;
pub use error::{MapperError, Result};
pub use keystats::KeyStats;
pub use resolver::{ChangeSet, RankingMode, Resolution, ScreenResolver};
pub use scanner::{ScanStats, ScreenCorpus, ScreenScanner};
