use thiserror::Error;

/// Errors surfaced by the fallible helpers around the compiler.
///
/// The compiler itself never fails; see [`ParseDiagnostics`].
#[derive(Debug, Error)]
pub enum Error {
    /// Block tree serialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-fatal degradations recorded while compiling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// Code fence opened but never closed; the rest of the input became code.
    #[error("unclosed code fence ({language}) consumed the remaining input")]
    UnclosedCodeFence {
        /// Language of the unclosed fence.
        language: String,
    },
    /// Directive section without a balanced `:::` terminator.
    #[error("unclosed :::{name} section consumed the remaining input")]
    UnclosedDirective {
        /// Directive name.
        name: String,
    },
    /// Directive requiring a label or URL was given none and was dropped.
    #[error(":::{name} requires an argument; directive dropped")]
    MissingDirectiveArgument {
        /// Directive name.
        name: String,
    },
    /// Directive nested deeper than the configured limit was dropped.
    #[error(":::{name} nested deeper than {limit} levels; section dropped")]
    NestingTooDeep {
        /// Directive name.
        name: String,
        /// Configured nesting limit.
        limit: usize,
    },
    /// Lines of a column list outside any `:::column` section.
    #[error("{lines} line(s) outside :::column sections ignored")]
    IgnoredColumnListContent {
        /// Number of non-blank lines ignored.
        lines: usize,
    },
    /// Frontmatter block present but not a valid YAML mapping.
    #[error("frontmatter ignored: {message}")]
    InvalidFrontmatter {
        /// Underlying parse error.
        message: String,
    },
}

/// Collection of warnings gathered during one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseDiagnostics {
    /// Warnings in the order they were recorded.
    pub warnings: Vec<ParseWarning>,
}

impl ParseDiagnostics {
    /// Create an empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn add_warning(&mut self, warning: ParseWarning) {
        log::debug!("{warning}");
        self.warnings.push(warning);
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of recorded warnings.
    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Iterate over the recorded warnings.
    pub fn iter(&self) -> impl Iterator<Item = &ParseWarning> {
        self.warnings.iter()
    }
}

impl IntoIterator for ParseDiagnostics {
    type Item = ParseWarning;
    type IntoIter = std::vec::IntoIter<ParseWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.into_iter()
    }
}
