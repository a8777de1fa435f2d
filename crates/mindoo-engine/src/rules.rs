//! Rule files loaded from the rules directory.

use std::path::{Path, PathBuf};

use crate::errors::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFile {
    /// `configuration.asp`
    Configuration,
    /// `anycfg.asp`
    AnyConfiguration,
    /// `cut.asp`
    Cut,
    /// `get_event_poset.asp`
    EventPoset,
    /// `findglue.asp`
    FindGlue,
    /// `f0.asp`: minimal configurations reaching a bad marking.
    MinimalBad,
    /// `viable.asp`
    Viable,
    /// `draw.asp`, only needed for DOT export.
    Draw,
}

impl RuleFile {
    /// Files every doom search loads.
    pub const REQUIRED: [RuleFile; 7] = [
        RuleFile::Configuration,
        RuleFile::AnyConfiguration,
        RuleFile::Cut,
        RuleFile::EventPoset,
        RuleFile::FindGlue,
        RuleFile::MinimalBad,
        RuleFile::Viable,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            RuleFile::Configuration => "configuration.asp",
            RuleFile::AnyConfiguration => "anycfg.asp",
            RuleFile::Cut => "cut.asp",
            RuleFile::EventPoset => "get_event_poset.asp",
            RuleFile::FindGlue => "findglue.asp",
            RuleFile::MinimalBad => "f0.asp",
            RuleFile::Viable => "viable.asp",
            RuleFile::Draw => "draw.asp",
        }
    }
}

/// A directory of rule files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    dir: PathBuf,
}

impl RuleSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: RuleFile) -> PathBuf {
        self.dir.join(file.file_name())
    }

    /// Fail on the first missing file among `files`.
    pub fn require(&self, files: &[RuleFile]) -> Result<(), EngineError> {
        for file in files {
            let path = self.path(*file);
            if !path.is_file() {
                return Err(EngineError::MissingRules(path));
            }
        }
        Ok(())
    }

    /// Check every file of [`RuleFile::REQUIRED`].
    pub fn check(&self) -> Result<(), EngineError> {
        self.require(&RuleFile::REQUIRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_reports_first_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let rules = RuleSet::new(dir.path());
        for file in &RuleFile::REQUIRED[..3] {
            std::fs::write(rules.path(*file), "").unwrap();
        }
        match rules.check() {
            Err(EngineError::MissingRules(path)) => {
                assert_eq!(path, dir.path().join("get_event_poset.asp"))
            }
            other => panic!("expected missing rules, got {other:?}"),
        }
    }

    #[test]
    fn complete_directory_passes_and_draw_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let rules = RuleSet::new(dir.path());
        for file in RuleFile::REQUIRED {
            std::fs::write(rules.path(file), "").unwrap();
        }
        assert!(rules.check().is_ok());
        assert!(rules.require(&[RuleFile::Draw]).is_err());
    }
}
