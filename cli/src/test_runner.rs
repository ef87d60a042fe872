use std::path::{Path, PathBuf};

use serde::Deserialize;

use stackscript::Stack;
use stackscript::block::BlockInstance;
use stackscript::parser::Transpiler;
use stackscript::registry::Registry;
use stackscript::writer;

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// If true, the test expects transpilation to fail.
    #[serde(default)]
    pub expect_parse_error: bool,

    /// Expected error: the error's Display string must contain this
    /// substring. Implies a transpile failure.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// If set, the error must cite this 1-based source line.
    /// Line numbers are relative to the script body below the frontmatter.
    #[serde(default)]
    pub error_line: Option<usize>,

    /// Expected stack shape: one entry per block, either a block-type
    /// identifier or "raw".
    #[serde(default)]
    pub expect_stack: Option<Vec<String>>,

    /// Serialize the stack and transpile it again, expecting an
    /// equivalent result. Defaults to true for passing scripts.
    #[serde(default = "default_roundtrip")]
    pub roundtrip: bool,
}

fn default_roundtrip() -> bool {
    true
}

/// Parse a `.test.script` file into its TOML config and script source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn fail(path: &Path, description: Option<String>, reason: String) -> TestResult {
    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    }
}

/// One entry of the expected/actual stack shape: the type identifier for
/// structured blocks, "raw" for raw ones.
fn shape_of(block: &BlockInstance) -> String {
    match block.type_id() {
        Some(id) => id.to_string(),
        None => "raw".to_string(),
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(path, None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(path, None, format!("frontmatter error: {}", e)),
    };

    let description = config.description.clone();

    let registry = Registry::standard();
    let transpiler = Transpiler::new(source.to_string(), 0, &registry);
    let result = transpiler.transpile();

    // Failure expectations
    if config.expect_parse_error || config.expect_error.is_some() {
        let error = match result {
            Err(e) => e,
            Ok(_) => {
                return fail(
                    path,
                    description,
                    "expected a transpile error, but transpilation succeeded".into(),
                );
            }
        };
        if let Some(expected) = &config.expect_error {
            let message = error.to_string();
            if !message.contains(expected.as_str()) {
                return fail(
                    path,
                    description,
                    format!(
                        "expected error containing \"{}\", got: {}",
                        expected, message
                    ),
                );
            }
        }
        if let Some(expected_line) = config.error_line {
            if error.line != expected_line {
                return fail(
                    path,
                    description,
                    format!(
                        "expected error on line {}, got line {}",
                        expected_line, error.line
                    ),
                );
            }
        }
        return TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Pass,
        };
    }

    let stack = match result {
        Ok(stack) => stack,
        Err(e) => return fail(path, description, format!("unexpected transpile error: {}", e)),
    };

    if let Some(expected) = &config.expect_stack {
        let actual: Vec<String> = stack.blocks.iter().map(shape_of).collect();
        if &actual != expected {
            return fail(
                path,
                description,
                format!(
                    "stack mismatch\n  expected: {:?}\n  actual:   {:?}",
                    expected, actual
                ),
            );
        }
    }

    if config.roundtrip {
        if let Some(reason) = check_roundtrip(&stack, &registry) {
            return fail(path, description, reason);
        }
    }

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Pass,
    }
}

/// Serialize the stack and transpile the result, expecting the same block
/// sequence back. Returns `Some(reason)` on mismatch.
fn check_roundtrip(stack: &Stack, registry: &Registry) -> Option<String> {
    let script = writer::write_stack(&stack.blocks);
    let transpiler = Transpiler::new(script, 0, registry);
    let reparsed = match transpiler.transpile() {
        Ok(stack) => stack,
        Err(e) => return Some(format!("roundtrip transpile failed: {}", e)),
    };

    if reparsed.blocks.len() != stack.blocks.len() {
        return Some(format!(
            "roundtrip length mismatch: {} blocks became {}",
            stack.blocks.len(),
            reparsed.blocks.len()
        ));
    }

    for (index, (before, after)) in stack.blocks.iter().zip(&reparsed.blocks).enumerate() {
        let matches = match (before, after) {
            (BlockInstance::Structured(a), BlockInstance::Structured(b)) => {
                a.id() == b.id() && a.options == b.options
            }
            (BlockInstance::Raw(a), BlockInstance::Raw(b)) => a.script == b.script,
            _ => false,
        };
        if !matches {
            return Some(format!(
                "roundtrip mismatch at block {}: {:?} became {:?}",
                index, before, after
            ));
        }
    }

    None
}

/// Discover `.test.script` files under `root`, sorted by path.
fn discover_tests(root: &Path) -> Vec<PathBuf> {
    let mut tests = Vec::new();
    collect_tests(root, &mut tests);
    tests.sort();
    tests
}

fn collect_tests(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.script") {
                out.push(path);
            }
        }
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn report(result: &TestResult, no_color: bool) -> bool {
    let label = result
        .description
        .clone()
        .unwrap_or_else(|| result.path.display().to_string());

    match &result.outcome {
        TestOutcome::Pass => {
            eprintln!("{} {}", pass_label(no_color), label);
            true
        }
        TestOutcome::Fail(reason) => {
            eprintln!("{} {}", fail_label(no_color), label);
            for line in reason.lines() {
                eprintln!("    {}", line);
            }
            false
        }
    }
}

/// Run all `.test.script` files under `path` (or a single file).
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool) -> i32 {
    let tests = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        discover_tests(path)
    };

    if tests.is_empty() {
        eprintln!("no .test.script files found in {}", path.display());
        return 1;
    }

    let mut passed = 0;
    let mut failed = 0;

    for test in &tests {
        let result = run_single_test(test);
        if report(&result, no_color) {
            passed += 1;
        } else {
            failed += 1;
        }
    }

    eprintln!();
    eprintln!("{} passed, {} failed, {} total", passed, failed, tests.len());

    if failed > 0 { 1 } else { 0 }
}
