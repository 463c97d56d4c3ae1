//! Text processing utilities for manipulating strings.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::hub::function::{UtilityFunction, UtilityModule};
use crate::types::{FunctionSpec, ParamKind, ParamSpec, Value};

pub const NAME: &str = "util_text_processor";

const DESCRIPTION: &str = "Text processing utilities for manipulating strings.\n\n\
This module provides functions for text transformation, analysis, \
and formatting.";

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex")
});

const MOST_COMMON: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct WordStats {
    pub total_words: usize,
    pub unique_words: usize,
    /// Word counts in first-seen order
    pub frequencies: Vec<(String, usize)>,
    pub most_common: Vec<(String, usize)>,
}

impl WordStats {
    fn into_value(self) -> Value {
        let pair = |(word, count): (String, usize)| (word, Value::Int(count as i64));
        Value::Map(vec![
            ("total_words".to_string(), Value::Int(self.total_words as i64)),
            ("unique_words".to_string(), Value::Int(self.unique_words as i64)),
            (
                "word_frequencies".to_string(),
                Value::Map(self.frequencies.into_iter().map(pair).collect()),
            ),
            (
                "most_common".to_string(),
                Value::List(
                    self.most_common
                        .into_iter()
                        .map(|(word, count)| Value::Tuple(vec![Value::Str(word), Value::Int(count as i64)]))
                        .collect(),
                ),
            ),
        ])
    }
}

pub fn word_count(text: &str) -> WordStats {
    let lowered = text.to_lowercase();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut frequencies: Vec<(String, usize)> = Vec::new();
    let mut total_words = 0;

    for word in WORD.find_iter(&lowered).map(|m| m.as_str()) {
        total_words += 1;
        match index.get(word) {
            Some(&i) => frequencies[i].1 += 1,
            None => {
                index.insert(word, frequencies.len());
                frequencies.push((word.to_string(), 1));
            }
        }
    }

    let mut most_common = frequencies.clone();
    // Stable sort keeps first-seen order among equal counts.
    most_common.sort_by(|a, b| b.1.cmp(&a.1));
    most_common.truncate(MOST_COMMON);

    WordStats {
        total_words,
        unique_words: frequencies.len(),
        frequencies,
        most_common,
    }
}

pub fn format_text(text: &str, case: &str, remove_punctuation: bool, remove_numbers: bool) -> String {
    let mut result = match case {
        "lower" => text.to_lowercase(),
        "upper" => text.to_uppercase(),
        "title" => title_case(text),
        "sentence" => text
            .split('.')
            .map(|s| capitalize(s.trim()))
            .collect::<Vec<_>>()
            .join(". "),
        _ => text.to_string(),
    };

    if remove_punctuation {
        result = PUNCTUATION.replace_all(&result, "").into_owned();
    }
    if remove_numbers {
        result = NUMBER.replace_all(&result, "").into_owned();
    }
    result
}

/// Upper-case the first letter of every run of letters, lower-case the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

pub fn extract_emails(text: &str) -> Vec<String> {
    EMAIL.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

pub fn module() -> UtilityModule {
    let text = || ParamSpec::new("text", ParamKind::Str);

    let word_count_fn = UtilityFunction::new(
        FunctionSpec::new("word_count", "Count the number of words in a text.").param(text()),
        |args, console| {
            let stats = word_count(args.str("text")?);
            console.println(format!("Total words: {}", stats.total_words));
            console.println(format!("Unique words: {}", stats.unique_words));
            console.println("Most common words:");
            for (word, count) in &stats.most_common {
                console.println(format!("- '{word}': {count} occurrences"));
            }
            Ok(Some(stats.into_value()))
        },
    );

    let format_text_fn = UtilityFunction::new(
        FunctionSpec::new("format_text", "Format text according to specified options.")
            .param(text())
            .param(ParamSpec::new("case", ParamKind::Str).with_default("lower"))
            .param(ParamSpec::new("remove_punctuation", ParamKind::Bool).with_default(false))
            .param(ParamSpec::new("remove_numbers", ParamKind::Bool).with_default(false)),
        |args, console| {
            let result = format_text(
                args.str("text")?,
                args.str("case")?,
                args.bool("remove_punctuation")?,
                args.bool("remove_numbers")?,
            );
            console.println("Formatted text:");
            console.println(&result);
            Ok(Some(Value::Str(result)))
        },
    );

    let extract_emails_fn = UtilityFunction::new(
        FunctionSpec::new("extract_emails", "Extract email addresses from text.").param(text()),
        |args, console| {
            let emails = extract_emails(args.str("text")?);
            console.println(format!("Found {} email addresses:", emails.len()));
            for email in &emails {
                console.println(format!("- {email}"));
            }
            Ok(Some(Value::List(emails.into_iter().map(Value::Str).collect())))
        },
    );

    UtilityModule::new(NAME, DESCRIPTION)
        .with_function(word_count_fn)
        .with_function(format_text_fn)
        .with_function(extract_emails_fn)
}
