//! Reporter configuration, read from the environment.

/// How the console reporter renders failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Emit ANSI colors.
    pub color: bool,
    /// Show the source lines around the failing call.
    pub excerpt: bool,
    /// Lines of context on each side of the failing line.
    pub context_lines: usize,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig {
            color: false,
            excerpt: true,
            context_lines: 1,
        }
    }
}

impl ReporterConfig {
    /// Read from the process environment.
    ///
    /// - `NO_COLOR` (any value) or a non-terminal stdout disables colors
    /// - `PLACID_EXCERPT=0|false` disables source excerpts
    /// - `PLACID_CONTEXT_LINES=<n>` sets the excerpt context (default 1)
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|name| std::env::var(name).ok());
        if config.color {
            config.color = std::io::IsTerminal::is_terminal(&std::io::stdout());
        }
        config
    }

    /// Build from an arbitrary variable lookup. Colors are on unless `NO_COLOR` is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ReporterConfig::default();
        ReporterConfig {
            // Respect NO_COLOR (https://no-color.org/)
            color: lookup("NO_COLOR").is_none(),
            excerpt: match lookup("PLACID_EXCERPT") {
                Some(val) => !(val == "0" || val.eq_ignore_ascii_case("false")),
                None => defaults.excerpt,
            },
            context_lines: lookup("PLACID_CONTEXT_LINES")
                .and_then(|val| val.trim().parse().ok())
                .unwrap_or(defaults.context_lines),
        }
    }
}
