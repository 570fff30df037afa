//! Cross-call property provenance: which `With`/`ForContext` keys a logger
//! variable already carries, and which later calls override them.
//!
//! Tracking is per file and purely name-based. Keys enter the map only as
//! string literals; anything else yields no provenance conclusion. Collected
//! overrides are flushed after the traversal, sorted by source position, so
//! output stays deterministic regardless of map iteration order.

use std::collections::{HashMap, HashSet};

use crate::diagnostics::{DiagnosticId, Reporter, Severity};
use crate::semantics::model::{Assignment, MethodCall, ReceiverKind};

const TRACKED_METHODS: &[&str] = &["With", "ForContext"];

/// Where a property key was last set.
#[derive(Debug, Clone, Copy)]
struct PropertySite {
    start_byte: usize,
    end_byte: usize,
    line: u32,
    column: u32,
}

#[derive(Debug)]
struct Override {
    key: String,
    site: PropertySite,
    method: String,
}

#[derive(Debug, Default)]
pub struct CrossCallTracker {
    /// Accumulated property map per logger variable.
    logger_props: HashMap<String, HashMap<String, PropertySite>>,
    overrides: Vec<Override>,
    /// Call end bytes already checked; an assignment's right side shows up
    /// again as its own call event.
    checked: HashSet<usize>,
}

impl CrossCallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `name := base.With(...)`: fold the chain's accumulated map and
    /// store it under the assigned name.
    pub fn record_assignment(&mut self, assign: &Assignment) {
        if !is_tracked(&assign.call.method) {
            return;
        }
        let props = self.accumulated_including(&assign.call);
        self.logger_props.insert(assign.name.clone(), props);
    }

    /// Compare a call's keys against the receiver's accumulated map and
    /// collect overrides.
    pub fn check_call(&mut self, call: &MethodCall) {
        if !is_tracked(&call.method) {
            return;
        }
        if !self.checked.insert(call.end_byte) {
            return;
        }

        let accumulated = match &call.receiver {
            ReceiverKind::Ident(name) => self.logger_props.get(name).cloned().unwrap_or_default(),
            ReceiverKind::Call(inner) => self.accumulated_including(inner),
            _ => HashMap::new(),
        };

        for (key, site) in extract_keys(call) {
            if accumulated.contains_key(&key) {
                self.overrides.push(Override {
                    key,
                    site,
                    method: call.method.clone(),
                });
            }
        }
    }

    /// The property map after `call` has run, folding the whole chain down
    /// to its base identifier.
    fn accumulated_including(&self, call: &MethodCall) -> HashMap<String, PropertySite> {
        let mut props = match &call.receiver {
            ReceiverKind::Call(inner) => self.accumulated_including(inner),
            ReceiverKind::Ident(name) => {
                self.logger_props.get(name).cloned().unwrap_or_default()
            }
            _ => HashMap::new(),
        };
        if is_tracked(&call.method) {
            props.extend(extract_keys(call));
        }
        props
    }

    /// Report all collected overrides in source-position order.
    pub fn flush(&mut self, reporter: &mut Reporter) {
        self.overrides.sort_by_key(|o| o.site.start_byte);
        for o in self.overrides.drain(..) {
            reporter.report(
                DiagnosticId::DuplicateProperty,
                Severity::Warning,
                (o.site.start_byte, o.site.end_byte),
                (o.site.line, o.site.column),
                format!(
                    "{}() overrides property '{}' set in previous call",
                    o.method, o.key
                ),
                vec![],
            );
        }
    }
}

fn is_tracked(method: &str) -> bool {
    TRACKED_METHODS.contains(&method)
}

/// String-literal keys set by one call: every even argument for `With`,
/// argument 0 for `ForContext`.
fn extract_keys(call: &MethodCall) -> Vec<(String, PropertySite)> {
    let mut keys = Vec::new();
    let mut push = |index: usize| {
        let arg = &call.args[index];
        if let Some(value) = arg.string_value() {
            if !value.is_empty() {
                keys.push((
                    value.to_string(),
                    PropertySite {
                        start_byte: arg.start_byte,
                        end_byte: arg.end_byte,
                        line: arg.line,
                        column: arg.column,
                    },
                ));
            }
        }
    };

    match call.method.as_str() {
        "With" => {
            let mut i = 0;
            while i + 1 < call.args.len() {
                push(i);
                i += 2;
            }
        }
        "ForContext" if !call.args.is_empty() => push(0),
        _ => {}
    }
    keys
}
