//! Benchmarks for cursor-to-node lookups and the punctuation guard
//!
//! Run with: cargo bench --bench locate

use brick::engine::{CharEdit, StructuralEditor};
use brick::guard::spans_protected_punctuation;
use brick::locate::{closest_deletable_block, closest_parent, previous_sibling};
use brick::syntax::{JavaScriptSyntax, KindSet, SyntaxService, SyntaxTree};
use brick::{Position, TextRange};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// `functions` functions, each with a loop and a conditional
fn generate_javascript(functions: usize) -> String {
    let mut out = String::new();
    for i in 0..functions {
        out.push_str(&format!("function handler{}(event, index) {{\n", i));
        out.push_str("    var total = 0;\n");
        out.push_str("    for (var i = 0; i < index; i++) {\n");
        out.push_str("        if (event.values[i] > 0) {\n");
        out.push_str("            total += event.values[i];\n");
        out.push_str("        }\n");
        out.push_str("    }\n");
        out.push_str("    return total;\n");
        out.push_str("}\n\n");
    }
    out
}

fn parse(source: &str) -> SyntaxTree {
    JavaScriptSyntax::new().unwrap().parse(source).unwrap()
}

/// A position deep inside the last function
fn deep_position(functions: usize) -> Position {
    Position::new((functions - 1) * 10 + 5, 16).unwrap()
}

#[divan::bench(args = [10, 100, 1000])]
fn parse_generated(bencher: divan::Bencher, functions: usize) {
    let source = generate_javascript(functions);
    let mut syntax = JavaScriptSyntax::new().unwrap();
    bencher.bench_local(|| divan::black_box(syntax.parse(&source)));
}

#[divan::bench(args = [10, 100, 1000])]
fn closest_container(bencher: divan::Bencher, functions: usize) {
    let tree = parse(&generate_javascript(functions));
    let containers = KindSet::containers();
    let pos = deep_position(functions);
    bencher.bench_local(|| divan::black_box(closest_parent(&tree, pos, &containers)));
}

#[divan::bench(args = [10, 100, 1000])]
fn closest_deletable(bencher: divan::Bencher, functions: usize) {
    let tree = parse(&generate_javascript(functions));
    let deletable = KindSet::deletable();
    let pos = deep_position(functions);
    bencher.bench_local(|| divan::black_box(closest_deletable_block(&tree, pos, &deletable)));
}

#[divan::bench(args = [10, 100, 1000])]
fn sibling(bencher: divan::Bencher, functions: usize) {
    let tree = parse(&generate_javascript(functions));
    let pos = deep_position(functions);
    bencher.bench_local(|| divan::black_box(previous_sibling(&tree, pos)));
}

#[divan::bench(args = [10, 100, 1000])]
fn guard_check(bencher: divan::Bencher, functions: usize) {
    let tree = parse(&generate_javascript(functions));
    let start = deep_position(functions);
    let range = TextRange::new(start, start.offset_column(1));
    bencher.bench_local(|| divan::black_box(spans_protected_punctuation(&tree, range)));
}

/// Full guarded backspace: locate, guard, apply and reparse
#[divan::bench(args = [10, 100])]
fn guarded_backspace(bencher: divan::Bencher, functions: usize) {
    let mut editor = StructuralEditor::new(JavaScriptSyntax::new().unwrap());
    let state = editor.load(&generate_javascript(functions));
    let pos = deep_position(functions);
    bencher.bench_local(|| {
        divan::black_box(editor.guarded_char_edit(&state, pos, None, CharEdit::Backspace))
    });
}
