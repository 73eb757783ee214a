use std::fs;
use std::path::{Path, PathBuf};

/// a line of source that should not ship
struct Finding {
    path: PathBuf,
    line: usize,
    text: String,
}

fn rust_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            rust_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

fn scan(check: impl Fn(&str) -> bool) -> Vec<Finding> {
    let mut sources = Vec::new();
    rust_sources(Path::new("src"), &mut sources);
    sources.sort();

    let mut findings = Vec::new();
    for path in sources {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, text) in content.lines().enumerate() {
            if check(text) {
                findings.push(Finding {
                    path: path.clone(),
                    line: idx + 1,
                    text: text.trim().to_string(),
                });
            }
        }
    }
    findings
}

fn report(what: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    eprintln!("\n{} {what}:", findings.len());
    for f in findings {
        eprintln!("  {}:{}: {}", f.path.display(), f.line, f.text);
    }
    panic!("remove every {what} before merging");
}

/// comment text of a line: after `//`, after `/*`, or a `*` continuation line
fn comment_part(line: &str) -> Option<&str> {
    if let Some(pos) = line.find("//").or_else(|| line.find("/*")) {
        return Some(&line[pos..]);
    }
    let trimmed = line.trim_start();
    (trimmed.starts_with('*') && !trimmed.starts_with("*/")).then_some(trimmed)
}

#[test]
fn no_todo_comments() {
    let findings = scan(|line| {
        comment_part(line).is_some_and(|c| c.to_uppercase().contains("TODO"))
    });
    report("TODO comment(s)", &findings);
}

#[test]
fn no_leftover_dbg_calls() {
    let findings = scan(|line| {
        let code = line.split("//").next().unwrap_or(line);
        code.contains("dbg!(")
    });
    report("dbg! call(s)", &findings);
}

#[test]
fn comment_detection() {
    assert!(comment_part("let a = 1; // note").is_some());
    assert!(comment_part("   * continued").is_some());
    assert!(comment_part("   */").is_none());
    assert!(comment_part("let todo = 1;").is_none());
}
