// crates/meshdoc-docs/src/diff.rs
// ============================================================================
// Module: Line Diff
// Description: Minimal line-oriented diff between golden and rendered docs.
// Purpose: Explain documentation drift in test failures.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Produces hunks of removed (`-`, golden) and added (`+`, rendered) lines.
//! The common prefix and suffix are trimmed before a longest-common-subsequence
//! pass over the remaining window. Windows larger than [`MAX_DIFF_CELLS`]
//! degrade to a whole-window replacement.

use std::fmt::Write;

/// Largest LCS table evaluated before falling back to a replacement hunk.
pub const MAX_DIFF_CELLS: usize = 1_000_000;

/// A single diff operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op<'a> {
    /// Line present in both documents.
    Keep,
    /// Line only in the golden document.
    Remove(&'a str),
    /// Line only in the rendered document.
    Add(&'a str),
}

/// Returns a line diff from `golden` to `rendered`, or `None` when equal.
#[must_use]
pub fn line_diff(golden: &str, rendered: &str) -> Option<String> {
    if golden == rendered {
        return None;
    }
    let old: Vec<&str> = golden.lines().collect();
    let new: Vec<&str> = rendered.lines().collect();
    if old == new {
        return Some(String::from("@@ line endings or trailing newline differ @@\n"));
    }

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix ..]
        .iter()
        .rev()
        .zip(new[prefix ..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_window = &old[prefix .. old.len() - suffix];
    let new_window = &new[prefix .. new.len() - suffix];

    let ops = window_ops(old_window, new_window);
    Some(format_hunks(&ops, prefix))
}

/// Computes operations for the differing window.
fn window_ops<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<Op<'a>> {
    let rows = old.len() + 1;
    let cols = new.len() + 1;
    if rows.saturating_mul(cols) > MAX_DIFF_CELLS {
        let mut ops: Vec<Op<'a>> = old.iter().map(|line| Op::Remove(line)).collect();
        ops.extend(new.iter().map(|line| Op::Add(line)));
        return ops;
    }

    // table[i * cols + j] = LCS length of old[i..] and new[j..].
    let mut table = vec![0_usize; rows * cols];
    for i in (0 .. old.len()).rev() {
        for j in (0 .. new.len()).rev() {
            table[i * cols + j] = if old[i] == new[j] {
                table[(i + 1) * cols + j + 1] + 1
            } else {
                table[(i + 1) * cols + j].max(table[i * cols + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(old.len() + new.len());
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            ops.push(Op::Keep);
            i += 1;
            j += 1;
        } else if table[(i + 1) * cols + j] >= table[i * cols + j + 1] {
            ops.push(Op::Remove(old[i]));
            i += 1;
        } else {
            ops.push(Op::Add(new[j]));
            j += 1;
        }
    }
    ops.extend(old[i ..].iter().map(|line| Op::Remove(line)));
    ops.extend(new[j ..].iter().map(|line| Op::Add(line)));
    ops
}

/// Groups consecutive changes into `@@ -old +new @@` hunks with 1-based lines.
fn format_hunks(ops: &[Op<'_>], offset: usize) -> String {
    let mut out = String::new();
    let (mut old_line, mut new_line) = (offset + 1, offset + 1);
    let mut in_hunk = false;
    for op in ops {
        match op {
            Op::Keep => {
                in_hunk = false;
                old_line += 1;
                new_line += 1;
            }
            Op::Remove(line) => {
                if !in_hunk {
                    let _ = writeln!(out, "@@ -{old_line} +{new_line} @@");
                    in_hunk = true;
                }
                let _ = writeln!(out, "-{line}");
                old_line += 1;
            }
            Op::Add(line) => {
                if !in_hunk {
                    let _ = writeln!(out, "@@ -{old_line} +{new_line} @@");
                    in_hunk = true;
                }
                let _ = writeln!(out, "+{line}");
                new_line += 1;
            }
        }
    }
    out
}
