//! crates/logging/src/config.rs
//! Verbosity configuration mapping `-v` counts and `--debug` flags to
//! per-subsystem levels.

use std::fmt;

/// Diagnostic level assigned to a subsystem.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Level {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Run summaries and lifecycle milestones.
    Info,
    /// Per-round detail.
    Debug,
    /// Per-block detail.
    Trace,
}

impl Level {
    /// Returns the filter directive spelling of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    const fn from_verbose_level(level: u8) -> Self {
        match level {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subsystems that emit diagnostics, one tracing target each.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Subsystem {
    /// Engine construction, run summary and teardown.
    Engine,
    /// Window reads and block dispatch for each round.
    Round,
    /// Worker thread lifecycle and per-block hashing.
    Worker,
    /// Byte source open/map/read operations.
    Source,
    /// Command-line front end.
    Cli,
}

impl Subsystem {
    /// Every subsystem in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Engine,
        Self::Round,
        Self::Worker,
        Self::Source,
        Self::Cli,
    ];

    /// Returns the tracing target used by this subsystem.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Engine => "blocksig::engine",
            Self::Round => "blocksig::round",
            Self::Worker => "blocksig::worker",
            Self::Source => "blocksig::source",
            Self::Cli => "blocksig::cli",
        }
    }

    /// Returns the `--debug` flag name of this subsystem.
    #[must_use]
    pub const fn flag_name(self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::Round => "round",
            Self::Worker => "worker",
            Self::Source => "source",
            Self::Cli => "cli",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Engine => 0,
            Self::Round => 1,
            Self::Worker => 2,
            Self::Source => 3,
            Self::Cli => 4,
        }
    }
}

/// Per-subsystem verbosity derived from command-line flags.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VerbosityConfig {
    levels: [Level; 5],
}

impl VerbosityConfig {
    /// Create a configuration from a `-v` repetition count.
    ///
    /// 0 shows warnings, 1 adds run summaries, 2 adds per-round detail and 3
    /// or more enables per-block tracing.
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        Self {
            levels: [Level::from_verbose_level(level); 5],
        }
    }

    /// Returns the level configured for `subsystem`.
    #[must_use]
    pub const fn level_for(&self, subsystem: Subsystem) -> Level {
        self.levels[subsystem.index()]
    }

    /// Sets the level for `subsystem`.
    pub fn set(&mut self, subsystem: Subsystem, level: Level) {
        self.levels[subsystem.index()] = level;
    }

    /// Apply a single debug flag token such as `round`, `worker2` or `all`.
    ///
    /// Level 1 (the default when no digits follow) selects debug output and
    /// level 2 or higher selects trace output. Level 0 resets the subsystem to
    /// warnings.
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;
        let level = match level {
            0 => Level::Warn,
            1 => Level::Debug,
            _ => Level::Trace,
        };

        if name == "all" {
            for subsystem in Subsystem::ALL {
                self.set(subsystem, level);
            }
            return Ok(());
        }

        let subsystem = Subsystem::ALL
            .into_iter()
            .find(|subsystem| subsystem.flag_name() == name)
            .ok_or_else(|| format!("unknown debug flag: {name}"))?;
        self.set(subsystem, level);
        Ok(())
    }

    /// Apply a comma separated list of debug flag tokens.
    pub fn apply_debug_flags(&mut self, list: &str) -> Result<(), String> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_for_each(|token| self.apply_debug_flag(token))
    }

    /// Renders the configuration as an `EnvFilter` directive string.
    #[must_use]
    pub fn to_directive(&self) -> String {
        let mut directive = String::from("warn");
        for subsystem in Subsystem::ALL {
            directive.push(',');
            directive.push_str(subsystem.target());
            directive.push('=');
            directive.push_str(self.level_for(subsystem).as_str());
        }
        directive
    }
}

/// Parse a flag token like "round2" into ("round", 2) or "worker" into ("worker", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(0) => Err(format!("missing flag name in: {token}")),
        Some(pos) => {
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((&token[..pos], level))
        }
        None => Ok((token, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_warn_everywhere() {
        let config = VerbosityConfig::default();
        for subsystem in Subsystem::ALL {
            assert_eq!(config.level_for(subsystem), Level::Warn);
        }
    }

    #[test]
    fn verbose_levels_map_monotonically() {
        let levels: Vec<_> = (0..=4)
            .map(|v| VerbosityConfig::from_verbose_level(v).level_for(Subsystem::Engine))
            .collect();
        assert_eq!(
            levels,
            [
                Level::Warn,
                Level::Info,
                Level::Debug,
                Level::Trace,
                Level::Trace
            ]
        );
    }

    #[test]
    fn parse_flag_token_defaults_to_level_one() {
        assert_eq!(parse_flag_token("round"), Ok(("round", 1)));
        assert_eq!(parse_flag_token("worker2"), Ok(("worker", 2)));
        assert!(parse_flag_token("").is_err());
        assert!(parse_flag_token("3").is_err());
        assert!(parse_flag_token("round999").is_err());
    }

    #[test]
    fn apply_all_sets_every_subsystem() {
        let mut config = VerbosityConfig::default();
        config.apply_debug_flag("all2").unwrap();
        for subsystem in Subsystem::ALL {
            assert_eq!(config.level_for(subsystem), Level::Trace);
        }
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let mut config = VerbosityConfig::default();
        let error = config.apply_debug_flag("recv").unwrap_err();
        assert!(error.contains("recv"));
    }

    #[test]
    fn directive_lists_each_target() {
        let mut config = VerbosityConfig::from_verbose_level(1);
        config.set(Subsystem::Worker, Level::Trace);
        let directive = config.to_directive();
        assert!(directive.starts_with("warn,"));
        assert!(directive.contains("blocksig::engine=info"));
        assert!(directive.contains("blocksig::worker=trace"));
    }
}
