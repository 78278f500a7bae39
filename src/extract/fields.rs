//! Birthplace and occupation extraction from nested annotation fields

use super::tags::TagKind;
use crate::classify::{normalize_place, normalize_text};
use crate::graph::{Field, Individual, IndividualId};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Deepest sub-field level visited; deeper fields are skipped
pub const MAX_FIELD_DEPTH: usize = 32;

/// Birth events in structural priority order
const BIRTH_EVENTS: [&str; 3] = ["BIRT", "BAPM", "CHR"];

static BIRTHPLACE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:birth\s*place|place\s+of\s+birth)\s*[:=\-]\s*(.+?)\s*$")
        .expect("birthplace label pattern is valid")
});

static BORN_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*born\s+(?:at|in)\s*:?\s*(.+?)[\s.]*$").expect("born-at pattern is valid")
});

/// `Chester, Cheshire, England`: capitalised comma-separated tokens
static PLACE_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Z][A-Za-z'.\- ]*(?:,\s*[A-Z][A-Za-z'.\- ]*)+\s*$")
        .expect("place list pattern is valid")
});

static OCCUPATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:occupation|profession|trade|job|work)\s*[:=\-]\s*(.+?)[\s.]*$")
        .expect("occupation label pattern is valid")
});

static OCCUPATION_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:employed\s+as|worked\s+as|working\s+as|by\s+trade|occupation\s+was)\s+(?:an?\s+)?([a-z][a-z'\- ]*[a-z])",
    )
    .expect("occupation phrase pattern is valid")
});

/// Captures that look like answers but carry no occupation
const OCCUPATION_STOPLIST: &[&str] = &[
    "unknown",
    "not known",
    "not stated",
    "none",
    "nil",
    "n/a",
    "na",
    "illegible",
    "see note",
    "see notes",
    "the same",
];

/// Phrase captures longer than this are prose, not a job title
const MAX_PHRASE_WORDS: usize = 5;

/// Which attribute to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Birthplace,
    Occupation,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Birthplace => write!(f, "birthplace"),
            Self::Occupation => write!(f, "occupation"),
        }
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "birthplace" | "birth" | "place" => Ok(Self::Birthplace),
            "occupation" | "occu" | "job" => Ok(Self::Occupation),
            other => Err(format!("unknown field kind '{}'", other)),
        }
    }
}

/// One extracted value with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub person: IndividualId,
    /// As written in the record
    pub value: String,
    /// Case and whitespace folded; the deduplication key
    pub normalized: String,
    /// Dotted path of source tags, e.g. `BIRT.PLAC` or `CENS.NOTE`
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Result of extracting one attribute from one individual
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub fields: Vec<ExtractedField>,
    /// Some sub-fields lay below the depth cap and were skipped
    pub truncated: bool,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Distinct normalized values, in first-seen order
    pub fn distinct_values(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.fields
            .iter()
            .map(|f| f.normalized.as_str())
            .filter(|value| seen.insert(*value))
            .collect()
    }
}

/// Pending sub-field on the worklist
struct Pending<'a> {
    field: &'a Field,
    depth: usize,
    path: String,
    year: Option<i32>,
    in_birth_event: bool,
}

/// Accumulates fields for one individual, dropping (normalized, tag) repeats
struct Collector<'a> {
    person: &'a IndividualId,
    kind: FieldKind,
    seen: BTreeSet<(String, String)>,
    extraction: Extraction,
}

impl<'a> Collector<'a> {
    fn new(person: &'a IndividualId, kind: FieldKind) -> Self {
        Self {
            person,
            kind,
            seen: BTreeSet::new(),
            extraction: Extraction::default(),
        }
    }

    fn push(&mut self, value: &str, tag: &str, year: Option<i32>) {
        let value = value.trim();
        let normalized = match self.kind {
            FieldKind::Birthplace => normalize_place(value),
            FieldKind::Occupation => normalize_text(value),
        };
        if normalized.is_empty() {
            return;
        }
        if !self.seen.insert((normalized.clone(), tag.to_string())) {
            return;
        }
        self.extraction.fields.push(ExtractedField {
            person: self.person.clone(),
            value: value.to_string(),
            normalized,
            tag: tag.to_string(),
            year,
        });
    }
}

/// Walks an individual's fields and yields birthplace or occupation values.
///
/// Nested sub-fields are visited with an explicit worklist in document
/// order, never by recursion, and never below `max_depth`.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor {
    max_depth: usize,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self {
            max_depth: MAX_FIELD_DEPTH,
        }
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the depth cap
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn extract(&self, individual: &Individual, kind: FieldKind) -> Extraction {
        let mut collector = Collector::new(&individual.id, kind);

        if kind == FieldKind::Birthplace {
            structural_birthplaces(individual, &mut collector);
        }

        let truncated = self.scan(individual, &mut collector);
        if truncated {
            warn!(
                person = %individual.id,
                max_depth = self.max_depth,
                "field nesting exceeds depth cap; deeper fields skipped"
            );
        }

        let mut extraction = collector.extraction;
        extraction.truncated = truncated;
        debug!(
            person = %individual.id,
            %kind,
            found = extraction.fields.len(),
            "extracted fields"
        );
        extraction
    }

    /// Worklist scan over every field; returns whether the depth cap was hit
    fn scan(&self, individual: &Individual, collector: &mut Collector<'_>) -> bool {
        let mut truncated = false;
        let mut stack: Vec<Pending<'_>> = individual
            .fields
            .iter()
            .rev()
            .map(|field| Pending {
                field,
                depth: 1,
                path: field.tag.clone(),
                year: field.year,
                in_birth_event: TagKind::of(&field.tag).is_birth_event(),
            })
            .collect();

        while let Some(item) = stack.pop() {
            let tag = TagKind::of(&item.field.tag);

            match (collector.kind, tag) {
                (_, TagKind::Title) => continue,
                (FieldKind::Birthplace, TagKind::FreeText) => {
                    if let Some(text) = &item.field.value {
                        birthplaces_in_text(text, &item, collector);
                    }
                }
                // `1 RESI Occupation: Coal Miner` carries the job on the event itself
                (FieldKind::Occupation, TagKind::FreeText | TagKind::Event) => {
                    if let Some(text) = &item.field.value {
                        occupations_in_text(text, &item, collector);
                    }
                }
                (FieldKind::Occupation, kind) if kind.is_occupation() => {
                    if let Some(value) = &item.field.value {
                        collector.push(value, &item.path, item.year);
                    }
                }
                // Structural places were taken in priority order up front
                (_, TagKind::Place)
                | (_, TagKind::Birth)
                | (_, TagKind::Baptism)
                | (_, TagKind::Christening)
                | (_, TagKind::Occupation)
                | (_, TagKind::CustomOccupation)
                | (_, TagKind::Event)
                | (_, TagKind::Source)
                | (_, TagKind::Unknown) => {}
            }

            if item.field.children.is_empty() {
                continue;
            }
            if item.depth >= self.max_depth {
                truncated = true;
                continue;
            }
            for child in item.field.children.iter().rev() {
                stack.push(Pending {
                    field: child,
                    depth: item.depth + 1,
                    path: format!("{}.{}", item.path, child.tag),
                    year: child.year.or(item.year),
                    in_birth_event: item.in_birth_event
                        || TagKind::of(&child.tag).is_birth_event(),
                });
            }
        }

        truncated
    }
}

fn structural_birthplaces(individual: &Individual, collector: &mut Collector<'_>) {
    for event in BIRTH_EVENTS {
        for field in individual.fields.iter().filter(|f| f.tag == event) {
            if let Some(place) = field.child_value("PLAC") {
                collector.push(place, &format!("{}.PLAC", event), field.year);
            }
        }
    }
    for field in individual.fields.iter().filter(|f| f.tag == "PLAC") {
        if let Some(place) = &field.value {
            collector.push(place, "PLAC", field.year);
        }
    }
}

fn birthplaces_in_text(text: &str, item: &Pending<'_>, collector: &mut Collector<'_>) {
    for line in text.lines() {
        let labelled = BIRTHPLACE_LABEL
            .captures(line)
            .or_else(|| BORN_AT.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|value| value.chars().any(char::is_alphabetic));

        if let Some(value) = labelled {
            collector.push(value, &item.path, item.year);
        } else if item.in_birth_event && PLACE_LIST.is_match(line) {
            collector.push(line, &item.path, item.year);
        }
    }
}

fn occupations_in_text(text: &str, item: &Pending<'_>, collector: &mut Collector<'_>) {
    for segment in text.lines().flat_map(|line| line.split(';')) {
        let captured = OCCUPATION_LABEL
            .captures(segment)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .or_else(|| {
                OCCUPATION_PHRASE
                    .captures(segment)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str())
                    .filter(|value| value.split_whitespace().count() <= MAX_PHRASE_WORDS)
            });

        let Some(value) = captured else { continue };
        let normalized = normalize_text(value);
        if OCCUPATION_STOPLIST.contains(&normalized.as_str()) {
            debug!(value, "rejected non-occupation capture");
            continue;
        }
        collector.push(value, &item.path, item.year);
    }
}
