//! Generic label/value extraction from semi-structured text.
//!
//! Works on OCR output, markdown from document parsers, or plain key/value dumps.
//! Nothing here knows about tax forms; labels come out cleaned but unmapped.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::MAX_AMOUNT;

/// `label: $value` or `label - $value`.
static SEPARATOR_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<label>[A-Za-z0-9#][A-Za-z0-9 \t.,()/#'&\-]*?)(?:\s*:\s*|\s+-\s+)\$?\s*(?P<value>\(?-?\d[\d,]*(?:\.\d+)?\)?)",
    )
    .expect("separator pattern is valid")
});

/// `label    $value`, at least two blanks between the columns.
static COLUMN_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<label>[A-Za-z0-9#][A-Za-z0-9 .,()/#'&\-]*?)[ \t]{2,}\$?\s*(?P<value>\(?-?\d[\d,]*(?:\.\d+)?\)?)",
    )
    .expect("column pattern is valid")
});

/// Nothing but further amounts up to the end of the line.
static TRAILING_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[ \t]+\$?\(?-?\d[\d,]*(?:\.\d+)?\)?)+[ \t]*$")
        .expect("trailing values pattern is valid")
});

static AMOUNT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?-?\d[\d,]*(?:\.\d+)?\)?").expect("amount token pattern is valid")
});

static TABLE_SEPARATOR_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-{2,}:?$").expect("table separator pattern is valid"));

static BOX_NUMBER_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}[a-h]?$").expect("box number pattern is valid"));

static SSN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern is valid"));

static EIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{2}-\d{7}\b").expect("ein pattern is valid"));

const MIN_LABEL_LEN: usize = 3;

/// Extracts `(label, amount)` pairs from free text.
///
/// Runs two passes. The separator pass reads `label: value` and `label - value`
/// lines; the column pass reads `label<2+ blanks>value` and only contributes labels
/// the first pass did not produce. When a column line ends in several amounts the
/// last one is the value (`Wages   2024   50000.00` reads 50000.00). A label
/// repeated within one pass is summed. Markdown table rows are flattened to column
/// form first, with a bare leading box number rewritten as `Box N`.
///
/// Numbers glued to `-`, `/` or letters (SSNs, EINs, dates, street numbers) are not
/// values, and neither is anything larger than [`MAX_AMOUNT`]. Malformed input
/// never panics; it just yields fewer pairs.
///
/// # Example
///
/// ```
/// use tax_engine::extraction::extract_numeric_pairs;
/// use rust_decimal::Decimal;
///
/// let pairs = extract_numeric_pairs(
///     "Box 1 Wages, tips, other comp.    23500.00\nBox 2 - Federal income tax withheld: $1,500.00",
/// );
/// assert_eq!(pairs["box_1_wages_tips_other_comp"], Decimal::new(2350000, 2));
/// assert_eq!(pairs["box_2_federal_income_tax_withheld"], Decimal::new(150000, 2));
/// ```
pub fn extract_numeric_pairs(text: &str) -> BTreeMap<String, Decimal> {
    let mut plain_lines = Vec::new();
    let mut column_lines = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('|') {
            if let Some(flattened) = flatten_table_row(trimmed) {
                column_lines.push(flattened);
            }
        } else if !trimmed.is_empty() {
            plain_lines.push(trimmed.to_string());
            column_lines.push(trimmed.to_string());
        }
    }

    let mut pairs = BTreeMap::new();
    for line in &plain_lines {
        collect_pairs(&SEPARATOR_PAIR, line, false, &mut pairs);
    }

    let mut column_pairs = BTreeMap::new();
    for line in &column_lines {
        collect_pairs(&COLUMN_PAIR, line, true, &mut column_pairs);
    }
    for (label, value) in column_pairs {
        pairs.entry(label).or_insert(value);
    }

    debug!(pairs = pairs.len(), "extracted numeric pairs");
    pairs
}

fn collect_pairs(
    pattern: &Regex,
    line: &str,
    last_amount_wins: bool,
    pairs: &mut BTreeMap<String, Decimal>,
) {
    let mut start = 0;
    while let Some(captures) = pattern.captures_at(line, start) {
        let (Some(label), Some(value)) = (captures.name("label"), captures.name("value")) else {
            break;
        };
        start = value.end();

        // "123-45-6789" must not yield 123
        if line[value.end()..]
            .chars()
            .next()
            .is_some_and(|c| c == '-' || c == '/' || c.is_alphanumeric())
        {
            continue;
        }

        let mut value_text = value.as_str();
        if last_amount_wins && TRAILING_VALUES.is_match(&line[value.end()..]) {
            if let Some(last) = AMOUNT_TOKEN.find_iter(&line[value.end()..]).last() {
                value_text = last.as_str();
            }
            start = line.len();
        }

        let raw_label = label.as_str().trim();
        if raw_label.starts_with('#') {
            continue;
        }
        let label = clean_label(raw_label);
        if label.len() < MIN_LABEL_LEN {
            continue;
        }

        if let Some(amount) = parse_value(value_text) {
            let slot = pairs.entry(label).or_insert(Decimal::ZERO);
            *slot = slot.saturating_add(amount);
        }
    }
}

/// Turns `| 1 | Wages, tips | $23,500.00 |` into `Box 1  Wages, tips  $23,500.00`.
///
/// Separator rows yield `None`.
fn flatten_table_row(row: &str) -> Option<String> {
    let cells: Vec<&str> = row
        .trim_matches('|')
        .split('|')
        .map(str::trim)
        .collect();

    if cells
        .iter()
        .all(|cell| cell.is_empty() || TABLE_SEPARATOR_CELL.is_match(cell))
    {
        return None;
    }

    let mut parts: Vec<String> = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        if cell.is_empty() {
            continue;
        }
        if i == 0 && BOX_NUMBER_CELL.is_match(cell) {
            parts.push(format!("Box {cell}"));
        } else {
            parts.push((*cell).to_string());
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("  "))
    }
}

/// Lower snake case: `"Box 1 Wages, tips"` becomes `"box_1_wages_tips"`.
pub fn clean_label(label: &str) -> String {
    let mut cleaned = String::with_capacity(label.len());
    let mut pending_separator = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !cleaned.is_empty() {
                cleaned.push('_');
            }
            pending_separator = false;
            cleaned.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    cleaned
}

fn parse_value(value: &str) -> Option<Decimal> {
    let (negative, digits) = match value.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, value.trim_matches(|c| c == '(' || c == ')')),
    };
    let digits: String = digits.chars().filter(|c| *c != ',').collect();
    let amount = Decimal::from_str(&digits).ok()?;
    if amount.abs() > MAX_AMOUNT {
        return None;
    }
    Some(if negative { -amount } else { amount })
}

/// Identifier strings found in a document's text, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedIdentifiers {
    /// Social security numbers (`ddd-dd-dddd`).
    pub ssns: Vec<String>,
    /// Employer identification numbers (`dd-ddddddd`).
    pub eins: Vec<String>,
}

/// Finds SSNs and EINs in text. Duplicates are kept once.
///
/// # Example
///
/// ```
/// use tax_engine::extraction::extract_identifiers;
///
/// let ids = extract_identifiers("Employee SSN 123-45-6789, Employer EIN 12-3456789");
/// assert_eq!(ids.ssns, vec!["123-45-6789"]);
/// assert_eq!(ids.eins, vec!["12-3456789"]);
/// ```
pub fn extract_identifiers(text: &str) -> ExtractedIdentifiers {
    let mut identifiers = ExtractedIdentifiers::default();
    for found in SSN.find_iter(text) {
        push_unique(&mut identifiers.ssns, found.as_str());
    }
    for found in EIN.find_iter(text) {
        push_unique(&mut identifiers.eins, found.as_str());
    }
    identifiers
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}
