//! File operation utilities for working with files and directories.

use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::hub::function::{UtilityFunction, UtilityModule};
use crate::types::{FunctionSpec, ParamKind, ParamSpec, Value};

pub const NAME: &str = "util_file_operations";

const DESCRIPTION: &str = "File operation utilities for working with files and directories.\n\n\
This module provides common file operations like listing files, \
counting lines in files, and searching for text in files.";

/// Translate a shell wildcard (`*`, `?`, `[...]`) into an anchored regex
fn wildcard_regex(pattern: &str) -> Result<Regex> {
    let mut re = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '[' => {
                let negated = chars.peek() == Some(&'!');
                if negated {
                    chars.next();
                }
                // a `]` right after the opening bracket is a member, not the end
                let mut members = String::new();
                if chars.peek() == Some(&']') {
                    chars.next();
                    members.push(']');
                }
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    members.push(c);
                }
                if closed && !members.is_empty() {
                    re.push('[');
                    if negated {
                        re.push('^');
                    }
                    for c in members.chars() {
                        if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
                            re.push('\\');
                        }
                        re.push(c);
                    }
                    re.push(']');
                } else {
                    re.push_str(&regex::escape("["));
                    if negated {
                        re.push('!');
                    }
                    re.push_str(&regex::escape(&members));
                    if closed {
                        re.push_str(&regex::escape("]"));
                    }
                }
            }
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Ok(Regex::new(&re)?)
}

/// Entries of `directory` whose names match `pattern`, sorted.
/// Hidden entries only match patterns that start with a dot.
pub fn list_files(directory: &str, pattern: &str) -> Result<Vec<String>> {
    let base = Path::new(directory);
    let (dir, name_pattern) = match pattern.rsplit_once('/') {
        Some((sub, name)) => (base.join(sub), name),
        None => (base.to_path_buf(), pattern),
    };
    let matcher = wildcard_regex(name_pattern)?;
    let show_hidden = name_pattern.starts_with('.');

    let Ok(entries) = fs::read_dir(&dir) else {
        return Ok(Vec::new());
    };
    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| show_hidden || !name.starts_with('.'))
        .filter(|name| matcher.is_match(name))
        .map(|name| dir.join(name).display().to_string())
        .collect();
    files.sort();
    Ok(files)
}

pub fn count_lines(file_path: &str) -> std::io::Result<usize> {
    Ok(fs::read_to_string(file_path)?.lines().count())
}

/// `(line_number, trimmed_line)` for every line containing `search_term`
pub fn search_text(file_path: &str, search_term: &str, case_sensitive: bool) -> std::io::Result<Vec<(usize, String)>> {
    let contents = fs::read_to_string(file_path)?;
    let needle = if case_sensitive {
        search_term.to_string()
    } else {
        search_term.to_lowercase()
    };
    Ok(contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            if case_sensitive {
                line.contains(&needle)
            } else {
                line.to_lowercase().contains(&needle)
            }
        })
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect())
}

pub fn module() -> UtilityModule {
    let list_files_fn = UtilityFunction::new(
        FunctionSpec::new(
            "list_files",
            "List all files in a directory that match the given pattern.",
        )
        .param(ParamSpec::new("directory", ParamKind::Str).with_default("."))
        .param(ParamSpec::new("pattern", ParamKind::Str).with_default("*.*")),
        |args, console| {
            let directory = args.str("directory")?;
            let pattern = args.str("pattern")?;
            let files = list_files(directory, pattern)?;
            console.println(format!(
                "Found {} files matching '{pattern}' in '{directory}':",
                files.len()
            ));
            for file in &files {
                console.println(format!("- {file}"));
            }
            Ok(Some(Value::List(files.into_iter().map(Value::Str).collect())))
        },
    );

    let count_lines_fn = UtilityFunction::new(
        FunctionSpec::new("count_lines", "Count the number of lines in a text file.")
            .param(ParamSpec::new("file_path", ParamKind::Str)),
        |args, console| {
            let file_path = args.str("file_path")?;
            let count = match count_lines(file_path) {
                Ok(count) => {
                    console.println(format!("File '{file_path}' contains {count} lines."));
                    count as i64
                }
                Err(e) => {
                    console.println(format!("Error counting lines in '{file_path}': {e}"));
                    -1
                }
            };
            Ok(Some(Value::Int(count)))
        },
    );

    let search_text_fn = UtilityFunction::new(
        FunctionSpec::new("search_text", "Search for text in a file and display matching lines.")
            .param(ParamSpec::new("file_path", ParamKind::Str))
            .param(ParamSpec::new("search_term", ParamKind::Str))
            .param(ParamSpec::new("case_sensitive", ParamKind::Bool).with_default(false)),
        |args, console| {
            let file_path = args.str("file_path")?;
            let search_term = args.str("search_term")?;
            let matches = match search_text(file_path, search_term, args.bool("case_sensitive")?) {
                Ok(matches) => {
                    console.println(format!(
                        "Found {} matches for '{search_term}' in '{file_path}':",
                        matches.len()
                    ));
                    for (line_num, line_text) in &matches {
                        console.println(format!("Line {line_num}: {line_text}"));
                    }
                    matches
                }
                Err(e) => {
                    console.println(format!("Error searching text in '{file_path}': {e}"));
                    Vec::new()
                }
            };
            Ok(Some(Value::List(
                matches
                    .into_iter()
                    .map(|(n, text)| Value::Tuple(vec![Value::Int(n as i64), Value::Str(text)]))
                    .collect(),
            )))
        },
    );

    UtilityModule::new(NAME, DESCRIPTION)
        .with_function(list_files_fn)
        .with_function(count_lines_fn)
        .with_function(search_text_fn)
}
