//! CLI configuration, populated from environment variables.

/// Defaults for the `opengraph` CLI.
///
/// Command-line flags override these values.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `OPENGRAPH_INDENT` | `2` | Indent width for pretty-printed output |
/// | `OPENGRAPH_MERGE` | `false` | Merge nodes with duplicate ids instead of rejecting them |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Spaces per indentation level when pretty-printing.
    pub indent: usize,

    /// Whether duplicate node ids in an input document are merged.
    pub merge: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            merge: false,
        }
    }
}

impl CliConfig {
    /// Populate config from the process environment, applying defaults where absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary variable lookup. Unparsable values
    /// fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let indent = lookup("OPENGRAPH_INDENT")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(defaults.indent);
        let merge = lookup("OPENGRAPH_MERGE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.merge);
        Self { indent, merge }
    }
}

// --- tests -------------------------------------------------------------------
