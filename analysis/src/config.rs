//! Per-pass analyzer configuration.
//!
//! A fresh value is constructed for every pass; nothing here is shared or
//! mutated across passes. The `MTLOG_SUPPRESS` environment variable is read
//! once, when the configuration is built.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticId;

/// Environment variable holding comma-separated diagnostic ids to suppress.
pub const SUPPRESS_ENV_VAR: &str = "MTLOG_SUPPRESS";

/// Default context keys that trigger the "consider a constant" suggestion.
pub const DEFAULT_COMMON_KEYS: &[&str] = &["user_id", "request_id", "trace_id", "span_id"];

/// Default reserved property names for the With() reserved-property check.
pub const DEFAULT_RESERVED_PROPERTIES: &[&str] = &[
    "Timestamp",
    "Level",
    "Message",
    "MessageTemplate",
    "Exception",
    "SourceContext",
];

/// Check categories accepted by the `disable` flag.
pub const CHECK_CATEGORIES: &[&str] = &[
    "template",
    "duplicate",
    "naming",
    "capturing",
    "error",
    "context",
    "with-odd",
    "with-nonstring",
    "with-empty",
    "with-cross-call",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Treat unknown format specifiers as errors.
    pub strict: bool,

    /// Context keys (defaults plus `common-keys` additions) that trigger
    /// MTLOG007.
    pub common_keys: Vec<String>,

    /// Lower-cased check categories to skip.
    pub disabled_checks: HashSet<String>,

    /// Suppress the dynamic-template warning (MTLOG008).
    pub ignore_dynamic_templates: bool,

    /// Only accept receivers whose type resolves to the mtlog package path.
    pub strict_logger_types: bool,

    /// Rewrite error severity to warning (CI migrations).
    pub downgrade_errors: bool,

    /// Global kill switch.
    pub disable_all: bool,

    /// Diagnostic ids dropped unconditionally.
    pub suppressed: HashSet<DiagnosticId>,

    /// Enable the With() reserved-property check (MTLOG012).
    pub check_reserved: bool,

    /// Reserved property names; empty means use the defaults.
    pub reserved_properties: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            strict: false,
            common_keys: DEFAULT_COMMON_KEYS.iter().map(|s| s.to_string()).collect(),
            disabled_checks: HashSet::new(),
            ignore_dynamic_templates: false,
            strict_logger_types: false,
            downgrade_errors: false,
            disable_all: false,
            suppressed: HashSet::new(),
            check_reserved: false,
            reserved_properties: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Build a configuration from flag values, merging `MTLOG_SUPPRESS` from
    /// the environment. CSV values are trimmed; unknown check categories and
    /// malformed diagnostic ids are ignored.
    pub fn from_flags(flags: &AnalyzerFlags) -> Self {
        let mut config = AnalyzerConfig {
            strict: flags.strict,
            ignore_dynamic_templates: flags.ignore_dynamic_templates,
            strict_logger_types: flags.strict_logger_types,
            downgrade_errors: flags.downgrade_errors,
            disable_all: flags.disable_all,
            check_reserved: flags.check_reserved,
            ..AnalyzerConfig::default()
        };

        if let Some(keys) = &flags.common_keys {
            config
                .common_keys
                .extend(split_csv(keys).map(str::to_string));
        }

        if let Some(disable) = &flags.disable {
            for check in split_csv(disable) {
                config.disabled_checks.insert(check.to_lowercase());
            }
        }

        if let Some(reserved) = &flags.reserved_props {
            config.reserved_properties = split_csv(reserved).map(str::to_string).collect();
        }

        if let Some(suppress) = &flags.suppress {
            config.merge_suppressed(suppress);
        }
        if let Ok(env_suppress) = std::env::var(SUPPRESS_ENV_VAR) {
            config.merge_suppressed(&env_suppress);
        }

        config
    }

    fn merge_suppressed(&mut self, csv: &str) {
        for code in split_csv(csv) {
            if let Some(id) = DiagnosticId::from_code(code) {
                self.suppressed.insert(id);
            } else {
                log::debug!("ignoring unknown diagnostic id in suppress list: {code}");
            }
        }
    }

    /// Whether a check category was disabled via the `disable` flag.
    pub fn is_disabled(&self, category: &str) -> bool {
        self.disabled_checks.contains(category)
    }

    /// The effective reserved property list.
    pub fn reserved_properties(&self) -> Vec<&str> {
        if self.reserved_properties.is_empty() {
            DEFAULT_RESERVED_PROPERTIES.to_vec()
        } else {
            self.reserved_properties.iter().map(String::as_str).collect()
        }
    }
}

/// Raw flag values, as declared on the analyzer handle (spec'd flag names).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerFlags {
    pub strict: bool,
    pub common_keys: Option<String>,
    pub disable: Option<String>,
    pub ignore_dynamic_templates: bool,
    pub strict_logger_types: bool,
    pub downgrade_errors: bool,
    pub disable_all: bool,
    pub suppress: Option<String>,
    pub reserved_props: Option<String>,
    pub check_reserved: bool,
}

fn split_csv(s: &str) -> impl Iterator<Item = &str> {
    s.split(',').map(str::trim).filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_common_keys() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.common_keys, DEFAULT_COMMON_KEYS);
        assert!(!config.strict);
        assert!(config.suppressed.is_empty());
    }

    #[test]
    fn common_keys_append_to_defaults() {
        let flags = AnalyzerFlags {
            common_keys: Some("tenant_id, session_id".to_string()),
            ..AnalyzerFlags::default()
        };
        let config = AnalyzerConfig::from_flags(&flags);
        assert!(config.common_keys.iter().any(|k| k == "user_id"));
        assert!(config.common_keys.iter().any(|k| k == "tenant_id"));
        assert!(config.common_keys.iter().any(|k| k == "session_id"));
    }

    #[test]
    fn disable_normalizes_case_and_whitespace() {
        let flags = AnalyzerFlags {
            disable: Some(" Template , WITH-ODD ".to_string()),
            ..AnalyzerFlags::default()
        };
        let config = AnalyzerConfig::from_flags(&flags);
        assert!(config.is_disabled("template"));
        assert!(config.is_disabled("with-odd"));
        assert!(!config.is_disabled("naming"));
    }

    #[test]
    fn unknown_disable_entries_are_noops() {
        let flags = AnalyzerFlags {
            disable: Some("no-such-check".to_string()),
            ..AnalyzerFlags::default()
        };
        let config = AnalyzerConfig::from_flags(&flags);
        // Stored but harmless: nothing consults that category.
        assert!(config.is_disabled("no-such-check"));
        for cat in CHECK_CATEGORIES {
            assert!(!config.is_disabled(cat));
        }
    }

    #[test]
    fn suppress_flag_parses_ids() {
        let flags = AnalyzerFlags {
            suppress: Some("MTLOG001,mtlog004,bogus".to_string()),
            ..AnalyzerFlags::default()
        };
        let config = AnalyzerConfig::from_flags(&flags);
        assert!(config.suppressed.contains(&DiagnosticId::TemplateMismatch));
        assert!(config.suppressed.contains(&DiagnosticId::PropertyNaming));
        assert_eq!(config.suppressed.len(), 2);
    }

    #[test]
    fn reserved_props_override_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.reserved_properties(), DEFAULT_RESERVED_PROPERTIES);

        let flags = AnalyzerFlags {
            reserved_props: Some("Foo,Bar".to_string()),
            ..AnalyzerFlags::default()
        };
        let config = AnalyzerConfig::from_flags(&flags);
        assert_eq!(config.reserved_properties(), vec!["Foo", "Bar"]);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = AnalyzerConfig {
            strict: true,
            ..AnalyzerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalyzerConfig = serde_json::from_str(&json).unwrap();
        assert!(back.strict);
        assert_eq!(back.common_keys, config.common_keys);
    }
}
