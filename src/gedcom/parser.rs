//! Line-oriented GEDCOM reader
//!
//! Each line is `LEVEL [@XREF@] TAG [VALUE]`. Lines are folded into a field
//! tree by level; `CONC`/`CONT` continuation lines are merged into their
//! parent's value. Level-0 `INDI` and `FAM` records become graph nodes, every
//! other record (HEAD, SOUR, NOTE, TRLR, ...) is skipped.

use crate::graph::date::parse_year;
use crate::graph::{Family, Field, GenealogyGraph, GraphError, GraphResult, Individual};
use std::path::Path;

/// A single parsed record line
#[derive(Debug, Clone, PartialEq, Eq)]
struct Line<'a> {
    level: usize,
    xref: Option<&'a str>,
    tag: &'a str,
    value: Option<&'a str>,
}

/// Parse one raw line, or `None` if it does not look like a record line
fn parse_line(raw: &str) -> Option<Line<'_>> {
    let trimmed = raw.trim_start();
    let (level_str, rest) = trimmed.split_once(' ')?;
    let level = level_str.parse::<usize>().ok()?;
    let rest = rest.trim_start();

    let (xref, rest) = if rest.starts_with('@') {
        let (xref, after) = rest.split_once(' ').unwrap_or((rest, ""));
        if xref.len() < 3 || !xref.ends_with('@') {
            return None;
        }
        (Some(xref), after.trim_start())
    } else {
        (None, rest)
    };

    let (tag, value) = match rest.split_once(' ') {
        Some((tag, value)) => (tag, Some(value)),
        None => (rest, None),
    };
    if tag.is_empty() {
        return None;
    }

    Some(Line {
        level,
        xref,
        tag,
        value: value.filter(|v| !v.is_empty()),
    })
}

/// Level-0 record under construction
struct OpenRecord {
    xref: Option<String>,
    /// Field stack; index 0 is the record line itself
    stack: Vec<Field>,
}

impl OpenRecord {
    /// Close fields until the stack depth equals `level`
    fn unwind_to(&mut self, level: usize) {
        while self.stack.len() > level.max(1) {
            let Some(mut done) = self.stack.pop() else {
                break;
            };
            resolve_year(&mut done);
            if let Some(parent) = self.stack.last_mut() {
                parent.children.push(done);
            }
        }
    }

    fn finish(mut self) -> (Option<String>, Field) {
        self.unwind_to(1);
        let mut root = self.stack.pop().unwrap_or_else(|| Field::new(""));
        resolve_year(&mut root);
        (self.xref, root)
    }
}

fn resolve_year(field: &mut Field) {
    if field.year.is_none() {
        field.year = field.child_value("DATE").and_then(parse_year);
    }
}

/// GEDCOM implementation of the record-graph provider
#[derive(Debug, Default, Clone, Copy)]
pub struct GedcomParser;

impl GedcomParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a file
    pub fn parse_file(&self, path: impl AsRef<Path>) -> GraphResult<GenealogyGraph> {
        let bytes = std::fs::read(path.as_ref())?;
        self.parse(&bytes)
    }

    /// Parse raw GEDCOM bytes into a record graph.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Malformed lines are
    /// skipped with a warning; input that contains no record lines at all
    /// is a format error.
    pub fn parse(&self, bytes: &[u8]) -> GraphResult<GenealogyGraph> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = String::from_utf8_lossy(bytes);

        let mut graph = GenealogyGraph::new();
        let mut open: Option<OpenRecord> = None;
        let mut parsed_lines = 0usize;
        let mut skipped_lines = 0usize;
        let mut first_content_line = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            if raw.trim().is_empty() {
                continue;
            }
            first_content_line.get_or_insert(line_no);

            let Some(line) = parse_line(raw) else {
                tracing::warn!(line = line_no, "skipping malformed record line");
                skipped_lines += 1;
                continue;
            };
            parsed_lines += 1;

            if line.level == 0 {
                if let Some(record) = open.take() {
                    add_record(&mut graph, record);
                }
                let mut root = Field::new(line.tag);
                root.value = line.value.map(str::to_string);
                open = Some(OpenRecord {
                    xref: line.xref.map(str::to_string),
                    stack: vec![root],
                });
                continue;
            }

            let Some(record) = open.as_mut() else {
                tracing::warn!(line = line_no, "record line before any level-0 record");
                skipped_lines += 1;
                continue;
            };

            if line.level > record.stack.len() {
                tracing::warn!(
                    line = line_no,
                    level = line.level,
                    "level jumps more than one step; skipping"
                );
                skipped_lines += 1;
                continue;
            }
            record.unwind_to(line.level);

            match line.tag {
                "CONC" | "CONT" => {
                    if let Some(parent) = record.stack.last_mut() {
                        let text = line.value.unwrap_or("");
                        let value = parent.value.get_or_insert_with(String::new);
                        if line.tag == "CONT" {
                            value.push('\n');
                        }
                        value.push_str(text);
                    }
                }
                _ => {
                    let mut field = Field::new(line.tag);
                    field.value = line.value.map(str::to_string);
                    record.stack.push(field);
                }
            }
        }

        if let Some(record) = open.take() {
            add_record(&mut graph, record);
        }

        if parsed_lines == 0 {
            if let Some(line) = first_content_line {
                return Err(GraphError::Format {
                    line,
                    message: "no record lines found".to_string(),
                });
            }
        }

        tracing::debug!(
            individuals = graph.individual_count(),
            families = graph.family_count(),
            skipped_lines,
            "parsed record graph"
        );
        Ok(graph)
    }
}

fn add_record(graph: &mut GenealogyGraph, record: OpenRecord) {
    let (xref, root) = record.finish();
    let Some(xref) = xref else {
        return;
    };

    match root.tag.as_str() {
        "INDI" => {
            graph.add_individual(build_individual(xref, root));
        }
        "FAM" => {
            graph.add_family(build_family(xref, root));
        }
        _ => {}
    }
}

fn build_individual(xref: String, root: Field) -> Individual {
    let mut person = Individual::new(xref);
    for field in &root.children {
        match (field.tag.as_str(), field.value.as_deref()) {
            ("NAME", Some(name)) if person.name.is_none() => {
                person.name = Some(clean_name(name));
            }
            ("FAMC", Some(fam)) => person.parent_families.push(fam.trim().into()),
            ("FAMS", Some(fam)) => person.spouse_families.push(fam.trim().into()),
            _ => {}
        }
    }
    person.fields = root.children;
    person
}

fn build_family(xref: String, root: Field) -> Family {
    let mut family = Family::new(xref);
    for field in &root.children {
        match (field.tag.as_str(), field.value.as_deref()) {
            ("HUSB" | "WIFE", Some(id)) => family.parents.push(id.trim().into()),
            ("CHIL", Some(id)) => family.children.push(id.trim().into()),
            _ => {}
        }
    }
    family
}

/// `John /Smith/` -> `John Smith`
fn clean_name(raw: &str) -> String {
    raw.replace('/', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
