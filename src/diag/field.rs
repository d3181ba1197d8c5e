//! Field scanning inside a single step block.
//!
//! A block body looks like:
//!
//! ```text
//!     Description: Prerequisite step that runs before any
//! deploy operations.
//!     Dependencies: ✓ build-app, ✓ build-frontend
//!     Resource: app (ExecutableContainerResource)
//!     Tags: build-compute
//! ```
//!
//! Labels may come in any order. A value starts right after its label and
//! runs until the next label line, a blank line, or the end of the block.

use crate::diag::block::StepBlock;
use crate::model::Step;

/// Glyphs the diagnostics output puts in front of dependency names.
const DECORATIONS: &[char] = &['✓', '✔', '✗', '✘', '?', '•', '*'];

/// Leftover single-letter level marker from a truncated log prefix.
const PLACEHOLDER: &str = "i";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Description,
    Dependencies,
    Resource,
    Tags,
}

impl Field {
    const ALL: [Field; 4] = [
        Field::Description,
        Field::Dependencies,
        Field::Resource,
        Field::Tags,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Description => "Description:",
            Field::Dependencies => "Dependencies:",
            Field::Resource => "Resource:",
            Field::Tags => "Tags:",
        }
    }

    /// Recognize a label at the start of `line`, returning the text after it.
    fn strip(line: &str) -> Option<(Field, &str)> {
        let trimmed = line.trim_start();
        Field::ALL
            .into_iter()
            .find_map(|f| trimmed.strip_prefix(f.label()).map(|rest| (f, rest)))
    }
}

/// Raw value lines collected for each field, first occurrence wins.
#[derive(Debug, Default)]
struct RawFields<'a> {
    description: Option<Vec<&'a str>>,
    dependencies: Option<Vec<&'a str>>,
    resource: Option<Vec<&'a str>>,
    tags: Option<Vec<&'a str>>,
}

impl<'a> RawFields<'a> {
    fn slot(&mut self, field: Field) -> &mut Option<Vec<&'a str>> {
        match field {
            Field::Description => &mut self.description,
            Field::Dependencies => &mut self.dependencies,
            Field::Resource => &mut self.resource,
            Field::Tags => &mut self.tags,
        }
    }

    fn scan(lines: &[&'a str]) -> Self {
        let mut raw = RawFields::default();
        // Field currently accepting continuation lines.
        let mut open: Option<Field> = None;

        for &line in lines {
            if let Some((field, rest)) = Field::strip(line) {
                let slot = raw.slot(field);
                if slot.is_none() {
                    *slot = Some(vec![rest]);
                    open = Some(field);
                } else {
                    // Repeated label: keep the first value, ignore this one.
                    open = None;
                }
                continue;
            }

            if line.trim().is_empty() {
                open = None;
                continue;
            }

            if let Some(field) = open {
                if let Some(values) = raw.slot(field) {
                    values.push(line);
                }
            }
        }

        raw
    }
}

/// Turn one block into a [`Step`]. Never fails: malformed entries are dropped.
pub fn parse_step(block: &StepBlock<'_>) -> Step {
    let raw = RawFields::scan(&block.lines);

    let mut step = Step::new(block.name);
    step.description = raw.description.and_then(|v| parse_description(&v));
    step.dependencies = raw.dependencies.map(|v| parse_dependencies(&v));
    step.resource = raw.resource.and_then(|v| parse_resource(&v));
    step.tags = raw.tags.map(|v| parse_tags(&v));
    step
}

/// Non-empty trimmed lines joined with single spaces.
fn parse_description(lines: &[&str]) -> Option<String> {
    let text = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// Comma/newline separated ids. `none` means an explicit empty list.
fn parse_dependencies(lines: &[&str]) -> Vec<String> {
    let value = lines.join("\n");
    if value.trim().eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    let mut deps: Vec<String> = Vec::new();
    for entry in value.split([',', '\n']) {
        let name = strip_decorations(entry);
        if name.is_empty() || name == PLACEHOLDER {
            continue;
        }
        if !deps.iter().any(|d| d == name) {
            deps.push(name.to_string());
        }
    }
    deps
}

fn strip_decorations(entry: &str) -> &str {
    entry.trim_matches(|c: char| c.is_whitespace() || DECORATIONS.contains(&c))
}

/// First non-empty line, verbatim apart from surrounding whitespace.
fn parse_resource(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

fn parse_tags(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|l| l.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
