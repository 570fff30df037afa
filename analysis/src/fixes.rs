//! Shared fix-construction helpers: the line index for indentation
//! introspection, TODO comment placement, and context-key constant
//! extraction.

use std::collections::HashSet;

use crate::diagnostics::{SuggestedFix, TextEdit};
use crate::idents::{context_key_const_name, unique_const_name};
use crate::semantics::model::{GoFileSemantics, MethodCall};

/// Lazily computed line table over one file's source.
///
/// Line numbers are 1-based. Byte offsets exclude the trailing newline.
#[derive(Debug)]
pub struct LineIndex<'a> {
    source: &'a str,
    /// (start, end) byte offsets per line; built on first use.
    lines: Vec<(usize, usize)>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: Vec::new(),
        }
    }

    fn ensure_built(&mut self) {
        if !self.lines.is_empty() || self.source.is_empty() {
            return;
        }
        let mut start = 0;
        for (i, b) in self.source.bytes().enumerate() {
            if b == b'\n' {
                self.lines.push((start, i));
                start = i + 1;
            }
        }
        if start <= self.source.len() {
            self.lines.push((start, self.source.len()));
        }
    }

    pub fn line_text(&mut self, line: u32) -> Option<&'a str> {
        self.ensure_built();
        let (start, end) = *self.lines.get(line.checked_sub(1)? as usize)?;
        Some(&self.source[start..end])
    }

    /// Byte offset of the end of a line, before its newline.
    pub fn line_end_byte(&mut self, line: u32) -> Option<usize> {
        self.ensure_built();
        self.lines
            .get(line.checked_sub(1)? as usize)
            .map(|&(_, end)| end)
    }
}

/// Leading run of tabs and spaces.
pub fn extract_indentation(line: &str) -> &str {
    let end = line
        .find(|c| c != '\t' && c != ' ')
        .unwrap_or(line.len());
    &line[..end]
}

/// Whether an indentation byte count suggests mixed tabs and spaces
/// (tab plus 2, 4, 5, or 6 spaces). Tab-aligned counts synthesize tabs
/// without reading the source line.
pub fn contains_mixed_indent(bytes: usize) -> bool {
    matches!(bytes, 3 | 5 | 6 | 7)
}

/// Indentation string for a continuation line under `call`.
fn indent_for_call(call: &MethodCall, lines: &mut LineIndex) -> String {
    let indent_bytes = call.column.saturating_sub(1) as usize;
    if indent_bytes > 0 && contains_mixed_indent(indent_bytes) {
        if let Some(line) = lines.line_text(call.line) {
            return extract_indentation(line).to_string();
        }
    }
    "\t".repeat(indent_bytes)
}

/// Build the insertion edit for a trailing `// TODO: ...` comment.
///
/// If the call's line already carries a comment after the call, the TODO
/// goes on the next line with the call's indentation; otherwise it is
/// appended at `same_line_at`.
pub fn todo_comment_edit(
    sem: &GoFileSemantics,
    call: &MethodCall,
    lines: &mut LineIndex,
    same_line_at: usize,
    text: &str,
) -> TextEdit {
    let end_line = call.line + count_newlines_between(lines, call);
    let trailing_comment = sem
        .comments_by_line
        .get(&end_line)
        .copied()
        .filter(|&end| end > call.end_byte);

    match trailing_comment {
        Some(comment_end) => {
            let indent = indent_for_call(call, lines);
            TextEdit::insert(comment_end, format!("\n{indent}// {text}"))
        }
        None => TextEdit::insert(same_line_at, format!(" // {text}")),
    }
}

/// Lines spanned by the call body beyond its first line.
fn count_newlines_between(lines: &mut LineIndex, call: &MethodCall) -> u32 {
    let mut extra = 0;
    let mut line = call.line;
    while let Some(end) = lines.line_end_byte(line) {
        if end >= call.end_byte {
            break;
        }
        line += 1;
        extra += 1;
    }
    extra
}

/// Byte offset where an appended argument goes, just inside the closing
/// paren. Multiline calls may end in `,\n\t)`; the insert steps back over
/// that whitespace and trailing comma so the new argument joins the list.
pub fn argument_insert_point(source: &str, call_end: usize) -> usize {
    let bytes = source.as_bytes();
    let mut at = call_end.saturating_sub(1);
    while at > 0 && bytes[at - 1].is_ascii_whitespace() {
        at -= 1;
    }
    if at > 0 && bytes[at - 1] == b',' {
        at -= 1;
    }
    at
}

/// One string-literal site to be replaced by a constant name.
#[derive(Debug, Clone, Copy)]
pub struct KeyOccurrence {
    pub start_byte: usize,
    pub end_byte: usize,
}

/// Build the MTLOG007 fix for a common context key.
///
/// With fewer than two occurrences this returns the trivial single-site
/// replacement. Otherwise it reuses an existing constant bound to the same
/// string, or synthesizes a new `const` with a unique generated name,
/// inserted at the best position the file offers.
pub fn context_key_fix(
    sem: &GoFileSemantics,
    key: &str,
    site: KeyOccurrence,
    occurrences: &[KeyOccurrence],
) -> SuggestedFix {
    if occurrences.len() < 2 {
        let name = context_key_const_name(key);
        return SuggestedFix {
            title: format!("Replace with constant {name}"),
            edits: vec![TextEdit::replace(site.start_byte, site.end_byte, name)],
        };
    }

    if let Some(existing) = sem.constant_for_value(key) {
        let edits = occurrences
            .iter()
            .map(|occ| TextEdit::replace(occ.start_byte, occ.end_byte, existing.name.clone()))
            .collect();
        return SuggestedFix {
            title: format!("Use existing constant {}", existing.name),
            edits,
        };
    }

    let taken: HashSet<String> = sem.scope_names.iter().cloned().collect();
    let name = unique_const_name(&context_key_const_name(key), &taken);

    let mut edits = vec![const_decl_edit(sem, &name, key)];
    for occ in occurrences {
        edits.push(TextEdit::replace(occ.start_byte, occ.end_byte, name.clone()));
    }

    SuggestedFix {
        title: format!("Extract \"{key}\" to constant {name}"),
        edits,
    }
}

/// Insertion edit for a new string constant. Preference order: inside an
/// existing context-key const block, after the last const declaration,
/// after the last import, after the package clause.
fn const_decl_edit(sem: &GoFileSemantics, name: &str, value: &str) -> TextEdit {
    if let Some(block) = sem
        .const_blocks
        .iter()
        .find(|b| b.looks_like_key_block())
    {
        return TextEdit::insert(
            block.last_spec_end,
            format!("\n\t{name} = \"{value}\""),
        );
    }

    let decl = format!("\n\nconst {name} = \"{value}\"");
    let at = sem
        .last_const_end
        .or(sem.last_import_end)
        .unwrap_or(sem.package_clause_end);
    TextEdit::insert(at, decl)
}

/// Apply a set of non-overlapping edits to a source string.
///
/// Used by tests and the diff preview; the analyzer itself never rewrites
/// files.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.start));

    let mut result = source.to_string();
    for edit in sorted {
        result.replace_range(edit.start..edit.end, &edit.replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ast::FileId;
    use crate::parse::go::parse_go_file;
    use crate::semantics::extract_semantics;
    use crate::semantics::model::SemanticEvent;

    fn semantics_of(source: &str) -> GoFileSemantics {
        let parsed = parse_go_file(FileId(0), "test.go", source).unwrap();
        extract_semantics(&parsed)
    }

    fn first_call<'a>(sem: &'a GoFileSemantics, method: &str) -> &'a MethodCall {
        sem.events
            .iter()
            .find_map(|e| match e {
                SemanticEvent::Call(c) if c.method == method => Some(c),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn line_index_lookups() {
        let mut lines = LineIndex::new("first\nsecond\nthird");
        assert_eq!(lines.line_text(1), Some("first"));
        assert_eq!(lines.line_text(2), Some("second"));
        assert_eq!(lines.line_end_byte(1), Some(5));
        assert_eq!(lines.line_end_byte(3), Some(18));
        assert_eq!(lines.line_text(4), None);
    }

    #[test]
    fn indentation_extraction() {
        assert_eq!(extract_indentation("\t\tx := 1"), "\t\t");
        assert_eq!(extract_indentation("\t  mixed"), "\t  ");
        assert_eq!(extract_indentation("plain"), "");
        assert_eq!(extract_indentation("   "), "   ");
    }

    #[test]
    fn mixed_indent_byte_counts() {
        for n in [3, 5, 6, 7] {
            assert!(contains_mixed_indent(n), "{n}");
        }
        for n in [0, 1, 2, 4, 8] {
            assert!(!contains_mixed_indent(n), "{n}");
        }
    }

    #[test]
    fn insert_point_steps_back_over_trailing_comma() {
        let single = "log.Error(\"x {A}\")";
        assert_eq!(argument_insert_point(single, single.len()), single.len() - 1);

        let multiline = "log.Information(\n\t\"x {A}\",\n\t1,\n)";
        let at = argument_insert_point(multiline, multiline.len());
        // Just before the trailing comma, after the `1`.
        assert_eq!(&multiline[..at], "log.Information(\n\t\"x {A}\",\n\t1");

        let no_comma = "log.Information(\n\t\"x {A}\",\n\t1\n)";
        let at = argument_insert_point(no_comma, no_comma.len());
        assert_eq!(&no_comma[..at], "log.Information(\n\t\"x {A}\",\n\t1");
    }

    #[test]
    fn todo_lands_on_same_line_without_comment() {
        let source = "package main\n\nfunc f(log Logger) {\n\tlog.Error(\"x {A}\")\n}\n";
        let sem = semantics_of(source);
        let call = first_call(&sem, "Error");
        let mut lines = LineIndex::new(source);
        let edit = todo_comment_edit(&sem, call, &mut lines, call.end_byte, "TODO: provide value for A");
        assert_eq!(edit.start, call.end_byte);
        assert_eq!(edit.replacement, " // TODO: provide value for A");
    }

    #[test]
    fn todo_moves_below_existing_comment() {
        let source = "package main\n\nfunc f(log Logger) {\n\tlog.Error(\"x {A}\") // note\n}\n";
        let sem = semantics_of(source);
        let call = first_call(&sem, "Error");
        let mut lines = LineIndex::new(source);
        let edit = todo_comment_edit(&sem, call, &mut lines, call.end_byte, "TODO: provide value for A");
        // After the trailing comment, on its own line.
        assert!(edit.start > call.end_byte);
        assert!(edit.replacement.starts_with('\n'));
        assert!(edit.replacement.contains("// TODO: provide value for A"));
    }

    #[test]
    fn extraction_fix_creates_const_and_replaces_all() {
        let source = r#"package main

import "github.com/willibrandon/mtlog"

func f(log Logger) {
    log.ForContext("user_id", 1).Information("a")
    log.ForContext("user_id", 2).Information("b")
}
"#;
        let sem = semantics_of(source);
        let occurrences: Vec<KeyOccurrence> = sem
            .events
            .iter()
            .filter_map(|e| match e {
                SemanticEvent::Call(c) if c.method == "ForContext" => {
                    let arg = &c.args[0];
                    Some(KeyOccurrence {
                        start_byte: arg.start_byte,
                        end_byte: arg.end_byte,
                    })
                }
                _ => None,
            })
            .collect();
        assert_eq!(occurrences.len(), 2);

        let fix = context_key_fix(&sem, "user_id", occurrences[0], &occurrences);
        assert_eq!(fix.title, "Extract \"user_id\" to constant userIdContextKey");
        assert_eq!(fix.edits.len(), 3);

        let fixed = apply_edits(source, &fix.edits);
        assert!(fixed.contains("const userIdContextKey = \"user_id\""));
        assert!(!fixed.contains("ForContext(\"user_id\""));
        assert_eq!(fixed.matches("ForContext(userIdContextKey").count(), 2);
    }

    #[test]
    fn extraction_fix_reuses_existing_constant() {
        let source = r#"package main

const otherKey = "user_id"

func f(log Logger) {
    log.ForContext("user_id", 1).Information("a")
    log.ForContext("user_id", 2).Information("b")
}
"#;
        let sem = semantics_of(source);
        let occurrences: Vec<KeyOccurrence> = sem
            .events
            .iter()
            .filter_map(|e| match e {
                SemanticEvent::Call(c) if c.method == "ForContext" => Some(KeyOccurrence {
                    start_byte: c.args[0].start_byte,
                    end_byte: c.args[0].end_byte,
                }),
                _ => None,
            })
            .collect();

        let fix = context_key_fix(&sem, "user_id", occurrences[0], &occurrences);
        assert_eq!(fix.title, "Use existing constant otherKey");
        // Replacements only, no new declaration.
        assert_eq!(fix.edits.len(), 2);
        let fixed = apply_edits(source, &fix.edits);
        assert_eq!(fixed.matches("const otherKey").count(), 1);
    }

    #[test]
    fn single_occurrence_gets_trivial_replacement() {
        let source = r#"package main

func f(log Logger) {
    log.ForContext("user_id", 1).Information("a")
}
"#;
        let sem = semantics_of(source);
        let occ = KeyOccurrence {
            start_byte: 0,
            end_byte: 0,
        };
        let fix = context_key_fix(&sem, "user_id", occ, &[occ]);
        assert_eq!(fix.title, "Replace with constant userIdContextKey");
        assert_eq!(fix.edits.len(), 1);
    }

    #[test]
    fn new_const_joins_existing_key_block() {
        let source = r#"package main

const (
    traceIdContextKey = "trace_id"
)

func f(log Logger) {
    log.ForContext("user_id", 1).Information("a")
    log.ForContext("user_id", 2).Information("b")
}
"#;
        let sem = semantics_of(source);
        let occurrences: Vec<KeyOccurrence> = sem
            .events
            .iter()
            .filter_map(|e| match e {
                SemanticEvent::Call(c) if c.method == "ForContext" => Some(KeyOccurrence {
                    start_byte: c.args[0].start_byte,
                    end_byte: c.args[0].end_byte,
                }),
                _ => None,
            })
            .collect();

        let fix = context_key_fix(&sem, "user_id", occurrences[0], &occurrences);
        let fixed = apply_edits(source, &fix.edits);
        // The new entry is inside the existing block, not a standalone decl.
        assert!(fixed.contains("traceIdContextKey = \"trace_id\"\n\tuserIdContextKey = \"user_id\""));
        assert!(!fixed.contains("\n\nconst userIdContextKey"));
    }

    #[test]
    fn generated_name_avoids_collisions() {
        let source = r#"package main

var userIdContextKey = 1

func f(log Logger) {
    log.ForContext("user_id", 1).Information("a")
    log.ForContext("user_id", 2).Information("b")
}
"#;
        let sem = semantics_of(source);
        let occ = KeyOccurrence { start_byte: 0, end_byte: 0 };
        let fix = context_key_fix(&sem, "user_id", occ, &[occ, occ]);
        assert!(fix.title.contains("userIdContextKey2"));
    }

    #[test]
    fn apply_edits_is_order_independent() {
        let source = "abcdef";
        let edits = vec![
            TextEdit::replace(0, 1, "X".to_string()),
            TextEdit::replace(3, 4, "Y".to_string()),
        ];
        let mut reversed = edits.clone();
        reversed.reverse();
        assert_eq!(apply_edits(source, &edits), apply_edits(source, &reversed));
        assert_eq!(apply_edits(source, &edits), "XbcYef");
    }
}
