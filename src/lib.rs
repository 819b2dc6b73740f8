//! Wraps the JSX element found at a source position in a report component
//! and makes sure the component is imported.
//!
//! ```text
//! <div><Card /></div>     --(Card at 1:5)-->     import BuriedReport from "buried-component-report";
//!                                                <div>
//!                                                 <BuriedReport type="area"><Card/></BuriedReport>
//!                                                 </div>
//! ```

use std::path::Path;

pub mod cli;
pub mod config;
pub mod error;
pub mod imports;
pub mod inputs;
pub mod locate;
pub mod rewrite;
pub mod source;

pub use config::{ReportConfig, SOURCE_NAME, TAG_DEFAULT_NAME};
pub use error::{LoaderError, Result};
pub use inputs::{ReportInputs, ReportValue};
pub use locate::{ElementMatch, MatchSlot, SourcePosition};

// -----------------------------------------------------------------------------
// Results
// -----------------------------------------------------------------------------

/// Output of a text-to-text transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub code: String,
    pub wrapped: bool,
    pub import_added: bool,
}

/// Result of [`buried_loader`]. A file that cannot be read is reported here
/// as a value; malformed source is an `Err` from the call itself.
#[derive(Debug)]
pub enum LoaderOutput {
    Code(String),
    ReadFailed(std::io::Error),
}

impl LoaderOutput {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Code(code) => Some(code),
            Self::ReadFailed(_) => None,
        }
    }

    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::ReadFailed(_))
    }

    pub fn into_code(self) -> std::result::Result<String, std::io::Error> {
        match self {
            Self::Code(code) => Ok(code),
            Self::ReadFailed(e) => Err(e),
        }
    }
}

// -----------------------------------------------------------------------------
// Pipeline
// -----------------------------------------------------------------------------

/// Parse, wrap the element at `position` (if any), ensure the import, print.
pub fn transform_source(
    file_name: &str,
    code: &str,
    position: Option<SourcePosition>,
    inputs: &ReportInputs,
    config: &ReportConfig,
) -> Result<Transformed> {
    let mut parsed = source::parse_module(file_name, code)?;

    let wrapped = match position.and_then(|pos| locate::find_element(&parsed, pos)) {
        Some(target) => rewrite::wrap_element(&mut parsed.module, &target, inputs, config),
        None => false,
    };
    let import_added = imports::ensure_import(&mut parsed.module, config);

    let code = source::print_module(&parsed)?;
    tracing::debug!(file = file_name, wrapped, import_added, "transformed");
    Ok(Transformed {
        code,
        wrapped,
        import_added,
    })
}

/// Read `filepath` and transform it with the default report names.
pub fn buried_loader(
    filepath: impl AsRef<Path>,
    source: Option<SourcePosition>,
    inputs: &ReportInputs,
) -> Result<LoaderOutput> {
    buried_loader_with_config(filepath, source, inputs, &ReportConfig::default())
}

pub fn buried_loader_with_config(
    filepath: impl AsRef<Path>,
    source: Option<SourcePosition>,
    inputs: &ReportInputs,
    config: &ReportConfig,
) -> Result<LoaderOutput> {
    let path = filepath.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not read source file");
            return Ok(LoaderOutput::ReadFailed(e));
        }
    };
    let file_name = path.to_string_lossy();
    let out = transform_source(&file_name, &content, source, inputs, config)?;
    Ok(LoaderOutput::Code(out.code))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = "import React from 'react';\n\nexport const Card = () => (\n  <div className=\"card\">\n    <Title />\n    <Body />\n  </div>\n);\n";

    #[test]
    fn no_position_only_adds_the_import() {
        let out = transform_source("Card.tsx", CARD, None, &ReportInputs::new(), &ReportConfig::default()).unwrap();
        assert!(!out.wrapped);
        assert!(out.import_added);
        assert!(!out.code.contains("<BuriedReport"));
        assert!(out.code.contains("import BuriedReport from \"buried-component-report\";"));
    }

    #[test]
    fn unmatched_position_equals_import_only_output() {
        let config = ReportConfig::default();
        let inputs: ReportInputs = [("type", "area")].into_iter().collect();
        let missed = transform_source("Card.tsx", CARD, Some(SourcePosition::new(5, 3)), &inputs, &config).unwrap();
        let plain = transform_source("Card.tsx", CARD, None, &inputs, &config).unwrap();
        assert!(!missed.wrapped);
        assert_eq!(missed.code, plain.code);
    }

    #[test]
    fn matched_position_wraps_and_imports() {
        let inputs: ReportInputs = [("type", "area")].into_iter().collect();
        let out = transform_source(
            "Card.tsx",
            CARD,
            Some(SourcePosition::new(5, 4)),
            &inputs,
            &ReportConfig::default(),
        )
        .unwrap();
        assert!(out.wrapped);
        assert!(out.import_added);
        assert!(out.code.contains("<BuriedReport type=\"area\"><Title/></BuriedReport>"), "{}", out.code);
        assert!(!out.code.contains("<Body"));
    }

    #[test]
    fn output_accessors() {
        let ok = LoaderOutput::Code("x".into());
        assert_eq!(ok.code(), Some("x"));
        assert!(!ok.is_read_failure());
        let failed = LoaderOutput::ReadFailed(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(failed.code().is_none());
        assert_eq!(failed.into_code().unwrap_err().kind(), std::io::ErrorKind::NotFound);
    }
}
