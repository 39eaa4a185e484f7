//! Error adapter for converting PentimentoError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error
//! types and miette's rich diagnostic formatting used in the CLI.

use std::{error::Error as _, fmt};

use miette::Diagnostic as MietteDiagnostic;

use pentimento::PentimentoError;

/// Adapter wrapping a [`PentimentoError`] for miette rendering.
pub struct ErrorAdapter<'a>(pub &'a PentimentoError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PentimentoError::Io(_) => "pentimento::io",
            PentimentoError::Identity(_) => "pentimento::identity",
            PentimentoError::Model(_) => "pentimento::model",
            PentimentoError::Diff(_) => "pentimento::diff",
            PentimentoError::Definition(_) => "pentimento::definition",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            PentimentoError::Identity(_) => Some(Box::new(
                "element identity is derived from (kind, name, ancestors); \
                 check the definition for missing or duplicated declarations",
            )),
            _ => None,
        }
    }
}

/// Convert a [`PentimentoError`] into a list of reportable errors.
///
/// Every current variant renders as a single report; the list shape keeps
/// the call site stable if multi-diagnostic errors appear later.
pub fn to_reportables(err: &PentimentoError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_by_variant() {
        let err = PentimentoError::Definition("bad json".to_string());
        let adapter = ErrorAdapter(&err);
        assert_eq!(
            adapter.code().expect("code").to_string(),
            "pentimento::definition"
        );

        let err = PentimentoError::Io(std::io::Error::other("nope"));
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().expect("code").to_string(), "pentimento::io");
    }

    #[test]
    fn test_identity_errors_carry_help() {
        let err = PentimentoError::Identity(pentimento::IdentityError::NoneStaged);
        let adapter = ErrorAdapter(&err);
        assert!(adapter.help().is_some());
    }

    #[test]
    fn test_display_matches_source_error() {
        let err = PentimentoError::Definition("bad json".to_string());
        assert_eq!(
            ErrorAdapter(&err).to_string(),
            "Definition error: bad json"
        );
    }
}
