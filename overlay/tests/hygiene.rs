//! Hygiene: coding standards enforced at test time.
//!
//! These tests scan the overlay crate's production sources for antipatterns.
//! Each pattern has a budget, ideally zero. The budgets only ratchet down.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
}

const BUDGETS: &[Budget] = &[
    // Panics.
    Budget { pattern: ".unwrap()", max: 0 },
    Budget { pattern: ".expect(", max: 0 },
    Budget { pattern: "panic!(", max: 0 },
    Budget { pattern: "unreachable!(", max: 0 },
    Budget { pattern: "todo!(", max: 0 },
    Budget { pattern: "unimplemented!(", max: 0 },
    // Errors dropped without inspection.
    Budget { pattern: "let _ =", max: 0 },
    Budget { pattern: ".ok()", max: 0 },
    // Structure.
    Budget { pattern: "#[allow(dead_code)]", max: 0 },
];

/// Modules allowed to touch the DOM. Everything else must build natively.
const DOM_MODULES: &[&str] = &["bindings.rs", "engine.rs", "render.rs"];

struct SourceFile {
    path: String,
    content: String,
}

impl SourceFile {
    fn file_name(&self) -> &str {
        Path::new(&self.path).file_name().and_then(|n| n.to_str()).unwrap_or_default()
    }

    fn count(&self, pattern: &str) -> usize {
        self.content.lines().filter(|line| line.contains(pattern)).count()
    }
}

/// Production `.rs` files under `overlay/src/`, excluding `*_test.rs`.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.file_name() == "lib.rs"), "run from the overlay crate root");
}

#[test]
fn antipattern_budgets() {
    let files = source_files();
    let mut report = Vec::new();
    for budget in BUDGETS {
        let hits: Vec<(&str, usize)> =
            files.iter().map(|f| (f.path.as_str(), f.count(budget.pattern))).filter(|(_, n)| *n > 0).collect();
        let total: usize = hits.iter().map(|(_, n)| n).sum();
        if total > budget.max {
            report.push(format!("`{}`: found {total}, max {}", budget.pattern, budget.max));
            report.extend(hits.iter().map(|(path, n)| format!("  {path}: {n}")));
        }
    }
    assert!(report.is_empty(), "hygiene budgets exceeded:\n{}", report.join("\n"));
}

#[test]
fn dom_access_is_confined() {
    let offenders: Vec<String> = source_files()
        .into_iter()
        .filter(|f| !DOM_MODULES.contains(&f.file_name()) && f.count("web_sys") > 0)
        .map(|f| f.path)
        .collect();
    assert!(offenders.is_empty(), "web_sys used outside {DOM_MODULES:?}: {offenders:?}");
}

#[test]
fn canvas_context_only_in_render() {
    for file in source_files() {
        if file.file_name() != "render.rs" {
            assert_eq!(file.count("CanvasRenderingContext2d"), 0, "{} touches the 2D context", file.path);
        }
    }
}
