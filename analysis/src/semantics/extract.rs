//! Single-pass tree-sitter walk that fills in [`GoFileSemantics`].

use tree_sitter::Node;

use crate::parse::ast::ParsedFile;

use super::model::{
    ArgKind, Assignment, CallArg, ConstBlock, ConstDecl, GoFileSemantics, GoFunctionScope,
    GoImport, MethodCall, ReceiverKind, SemanticEvent, VarDefine,
};

/// Build the semantic model from a parsed Go file.
pub fn extract_semantics(parsed: &ParsedFile) -> GoFileSemantics {
    let mut sem = GoFileSemantics::new(parsed.file_id, parsed.path.clone());
    let root = parsed.tree.root_node();
    walk(root, parsed, &mut sem, None);
    sem
}

/// Walk nodes in pre-order; `current_fn` indexes into `sem.functions`.
fn walk(node: Node, parsed: &ParsedFile, sem: &mut GoFileSemantics, current_fn: Option<usize>) {
    let mut fn_idx = current_fn;

    match node.kind() {
        "package_clause" => {
            for i in 0..node.child_count() {
                if let Some(child) = node.child(i) {
                    if child.kind() == "package_identifier" {
                        sem.package_name = parsed.text_for_node(&child).to_string();
                    }
                }
            }
            sem.package_clause_end = node.end_byte();
        }
        "import_declaration" => {
            collect_imports(parsed, &node, sem);
            let end = node.end_byte();
            if sem.last_import_end.is_none_or(|prev| end > prev) {
                sem.last_import_end = Some(end);
            }
        }
        "const_declaration" => {
            collect_consts(parsed, &node, sem);
        }
        "var_declaration" => {
            collect_var_names(parsed, &node, sem);
        }
        "type_declaration" => {
            for i in 0..node.named_child_count() {
                if let Some(spec) = node.named_child(i) {
                    if let Some(name) = spec.child_by_field_name("name") {
                        sem.scope_names
                            .insert(parsed.text_for_node(&name).to_string());
                    }
                }
            }
        }
        "function_declaration" | "method_declaration" => {
            if let Some(scope) = build_function_scope(parsed, &node) {
                sem.scope_names.insert(scope.name.clone());
                sem.functions.push(scope);
                fn_idx = Some(sem.functions.len() - 1);
            }
        }
        "if_statement" => {
            if let Some(idx) = fn_idx {
                sem.functions[idx]
                    .if_spans
                    .push((node.start_byte(), node.end_byte()));
            }
        }
        "short_var_declaration" | "assignment_statement" => {
            collect_assignment(parsed, &node, sem, fn_idx);
        }
        "call_expression" => {
            if let Some(call) = build_method_call(parsed, &node) {
                sem.events.push(SemanticEvent::Call(call));
            }
        }
        "comment" => {
            let line = node.start_position().row as u32 + 1;
            let end = node.end_byte();
            let entry = sem.comments_by_line.entry(line).or_insert(end);
            if end > *entry {
                *entry = end;
            }
        }
        _ => {}
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            walk(child, parsed, sem, fn_idx);
        }
    }
}

fn collect_imports(parsed: &ParsedFile, node: &Node, sem: &mut GoFileSemantics) {
    fn process_spec(parsed: &ParsedFile, spec: Node, sem: &mut GoFileSemantics) {
        let mut path = String::new();
        let mut alias = None;

        for i in 0..spec.child_count() {
            if let Some(child) = spec.child(i) {
                match child.kind() {
                    "interpreted_string_literal" | "raw_string_literal" => {
                        path = unquote_go_string(parsed.text_for_node(&child));
                    }
                    "package_identifier" | "identifier" => {
                        let name = parsed.text_for_node(&child);
                        if name != "_" && name != "." {
                            alias = Some(name.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        if !path.is_empty() {
            if let Some(a) = &alias {
                sem.scope_names.insert(a.clone());
            }
            sem.imports.push(GoImport {
                path,
                alias,
                start_byte: spec.start_byte(),
                end_byte: spec.end_byte(),
            });
        }
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            match child.kind() {
                "import_spec" => process_spec(parsed, child, sem),
                "import_spec_list" => {
                    for j in 0..child.child_count() {
                        if let Some(spec) = child.child(j) {
                            if spec.kind() == "import_spec" {
                                process_spec(parsed, spec, sem);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn collect_consts(parsed: &ParsedFile, node: &Node, sem: &mut GoFileSemantics) {
    let top_level = node
        .parent()
        .is_some_and(|p| p.kind() == "source_file");
    let mut block_names = Vec::new();
    let mut last_spec_end = 0usize;
    let mut is_block = false;

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == "(" {
                is_block = true;
            }
            if child.kind() == "const_spec" {
                last_spec_end = child.end_byte();
                collect_const_spec(parsed, &child, sem, top_level, &mut block_names);
            }
        }
    }

    if top_level {
        let end = node.end_byte();
        if sem.last_const_end.is_none_or(|prev| end > prev) {
            sem.last_const_end = Some(end);
        }
        if is_block {
            sem.const_blocks.push(ConstBlock {
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                names: block_names,
                last_spec_end,
            });
        }
    }
}

fn collect_const_spec(
    parsed: &ParsedFile,
    spec: &Node,
    sem: &mut GoFileSemantics,
    top_level: bool,
    block_names: &mut Vec<String>,
) {
    let mut names = Vec::new();
    let mut string_value = None;

    for i in 0..spec.child_count() {
        if let Some(child) = spec.child(i) {
            match child.kind() {
                "identifier" => names.push(parsed.text_for_node(&child).to_string()),
                "expression_list" => {
                    for j in 0..child.named_child_count() {
                        if let Some(expr) = child.named_child(j) {
                            if matches!(
                                expr.kind(),
                                "interpreted_string_literal" | "raw_string_literal"
                            ) {
                                string_value =
                                    Some(unquote_go_string(parsed.text_for_node(&expr)));
                            }
                            break; // one value per tracked spec
                        }
                    }
                }
                _ => {}
            }
        }
    }

    for name in names {
        sem.scope_names.insert(name.clone());
        block_names.push(name.clone());
        sem.consts.push(ConstDecl {
            name,
            string_value: string_value.clone(),
            start_byte: spec.start_byte(),
            end_byte: spec.end_byte(),
            top_level,
        });
    }
}

fn collect_var_names(parsed: &ParsedFile, node: &Node, sem: &mut GoFileSemantics) {
    for i in 0..node.named_child_count() {
        if let Some(spec) = node.named_child(i) {
            if spec.kind() != "var_spec" {
                continue;
            }
            for j in 0..spec.child_count() {
                if let Some(child) = spec.child(j) {
                    if child.kind() == "identifier" {
                        sem.scope_names
                            .insert(parsed.text_for_node(&child).to_string());
                    }
                }
            }
        }
    }
}

fn build_function_scope(parsed: &ParsedFile, node: &Node) -> Option<GoFunctionScope> {
    let name_node = node.child_by_field_name("name")?;
    let mut error_params = Vec::new();

    if let Some(params) = node.child_by_field_name("parameters") {
        collect_error_names(parsed, &params, &mut error_params);
    }
    if let Some(result) = node.child_by_field_name("result") {
        if result.kind() == "parameter_list" {
            collect_error_names(parsed, &result, &mut error_params);
        }
    }

    Some(GoFunctionScope {
        name: parsed.text_for_node(&name_node).to_string(),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        error_params,
        defines: Vec::new(),
        if_spans: Vec::new(),
    })
}

/// Collect identifiers declared with type `error` in a parameter list.
fn collect_error_names(parsed: &ParsedFile, params: &Node, out: &mut Vec<String>) {
    for i in 0..params.named_child_count() {
        if let Some(decl) = params.named_child(i) {
            if decl.kind() != "parameter_declaration" {
                continue;
            }
            let is_error = decl
                .child_by_field_name("type")
                .is_some_and(|t| parsed.text_for_node(&t) == "error");
            if !is_error {
                continue;
            }
            for j in 0..decl.child_count() {
                if let Some(child) = decl.child(j) {
                    if child.kind() == "identifier" {
                        out.push(parsed.text_for_node(&child).to_string());
                    }
                }
            }
        }
    }
}

fn collect_assignment(
    parsed: &ParsedFile,
    node: &Node,
    sem: &mut GoFileSemantics,
    fn_idx: Option<usize>,
) {
    let left = node.child_by_field_name("left");
    let right = node.child_by_field_name("right");
    let (Some(left), Some(right)) = (left, right) else {
        return;
    };

    let lhs: Vec<Node> = named_children(&left);
    let rhs: Vec<Node> = named_children(&right);

    for (i, lhs_node) in lhs.iter().enumerate() {
        if lhs_node.kind() != "identifier" {
            continue;
        }
        let name = parsed.text_for_node(lhs_node).to_string();

        if node.kind() == "short_var_declaration" {
            sem.scope_names.insert(name.clone());
            if let Some(idx) = fn_idx {
                sem.functions[idx].defines.push(VarDefine {
                    name: name.clone(),
                    line: lhs_node.start_position().row as u32 + 1,
                });
            }
        }

        let Some(rhs_node) = rhs.get(i) else { continue };
        if rhs_node.kind() != "call_expression" {
            continue;
        }
        if let Some(call) = build_method_call(parsed, rhs_node) {
            sem.events.push(SemanticEvent::Assign(Assignment {
                name,
                call,
                start_byte: node.start_byte(),
            }));
        }
    }
}

fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .collect()
}

/// Build a [`MethodCall`] for a `recv.Method(args)` expression; returns None
/// for plain function calls like `f(x)`.
fn build_method_call(parsed: &ParsedFile, node: &Node) -> Option<MethodCall> {
    let func = node.child_by_field_name("function")?;
    if func.kind() != "selector_expression" {
        return None;
    }

    let field = func.child_by_field_name("field")?;
    let operand = func.child_by_field_name("operand")?;

    let receiver = match operand.kind() {
        "identifier" => ReceiverKind::Ident(parsed.text_for_node(&operand).to_string()),
        "call_expression" => match build_method_call(parsed, &operand) {
            Some(inner) => ReceiverKind::Call(Box::new(inner)),
            None => ReceiverKind::Other,
        },
        "selector_expression" => {
            ReceiverKind::Selector(parsed.text_for_node(&operand).to_string())
        }
        _ => ReceiverKind::Other,
    };

    let args = node
        .child_by_field_name("arguments")
        .map(|args_node| {
            named_children(&args_node)
                .iter()
                .map(|arg| build_call_arg(parsed, arg))
                .collect()
        })
        .unwrap_or_default();

    let start = node.start_position();
    Some(MethodCall {
        method: parsed.text_for_node(&field).to_string(),
        receiver_text: parsed.text_for_node(&operand).to_string(),
        receiver,
        args,
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        line: start.row as u32 + 1,
        column: start.column as u32 + 1,
    })
}

fn build_call_arg(parsed: &ParsedFile, node: &Node) -> CallArg {
    let kind = classify_arg(parsed, node);
    let start = node.start_position();
    CallArg {
        text: parsed.text_for_node(node).to_string(),
        kind,
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        line: start.row as u32 + 1,
        column: start.column as u32 + 1,
    }
}

fn classify_arg(parsed: &ParsedFile, node: &Node) -> ArgKind {
    match node.kind() {
        "interpreted_string_literal" | "raw_string_literal" => ArgKind::StringLit {
            value: unquote_go_string(parsed.text_for_node(node)),
        },
        "int_literal" => ArgKind::IntLit,
        "float_literal" => ArgKind::FloatLit,
        "true" | "false" => ArgKind::BoolLit,
        "nil" => ArgKind::NilLit,
        "identifier" => ArgKind::Ident(parsed.text_for_node(node).to_string()),
        "selector_expression" => ArgKind::Selector,
        "call_expression" => {
            let callee = node
                .child_by_field_name("function")
                .map(|f| parsed.text_for_node(&f).to_string())
                .unwrap_or_default();
            ArgKind::FuncCall { callee }
        }
        "composite_literal" => ArgKind::Composite {
            type_name: node
                .child_by_field_name("type")
                .map(|t| parsed.text_for_node(&t).to_string()),
        },
        "func_literal" | "slice_expression" => ArgKind::Composite { type_name: None },
        "unary_expression" => {
            // &T{...} is a composite under an address-of
            let inner = node.named_child(0);
            match inner {
                Some(n) if n.kind() == "composite_literal" => ArgKind::Composite {
                    type_name: n
                        .child_by_field_name("type")
                        .map(|t| format!("*{}", parsed.text_for_node(&t))),
                },
                _ => ArgKind::Other,
            }
        }
        _ => ArgKind::Other,
    }
}

/// Strip quotes and resolve the simple escapes; raw strings pass through.
fn unquote_go_string(text: &str) -> String {
    if let Some(raw) = text.strip_prefix('`') {
        return raw.strip_suffix('`').unwrap_or(raw).to_string();
    }
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
