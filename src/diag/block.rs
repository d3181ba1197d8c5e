use log::{debug, trace};

/// Marker line that opens the per-step section of the diagnostics output.
pub const SECTION_START: &str = "DETAILED STEP ANALYSIS";
/// Marker line that closes the per-step section.
pub const SECTION_END: &str = "POTENTIAL ISSUES";

const STEP_LABEL: &str = "Step:";

/// Text belonging to one `Step:` header, up to the next header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepBlock<'a> {
    pub name: &'a str,
    pub lines: Vec<&'a str>,
}

/// Split normalized text into step blocks, in order of appearance.
///
/// When the text contains a `DETAILED STEP ANALYSIS` line, only the lines
/// after it and before the next `POTENTIAL ISSUES` line are scanned.
/// Otherwise the whole text is. Headers with an empty name are skipped
/// together with their body.
pub fn extract_blocks(text: &str) -> Vec<StepBlock<'_>> {
    let mut blocks: Vec<StepBlock<'_>> = Vec::new();
    let mut skipping = false;

    for line in section_lines(text) {
        if let Some(name) = step_header(line) {
            if name.is_empty() {
                debug!("skipping Step: header without a name");
                skipping = true;
                continue;
            }
            skipping = false;
            blocks.push(StepBlock {
                name,
                lines: Vec::new(),
            });
            continue;
        }

        if skipping {
            continue;
        }
        // Lines before the first header are preamble.
        if let Some(block) = blocks.last_mut() {
            block.lines.push(line);
        }
    }

    debug!(blocks = blocks.len(); "extracted step blocks");
    blocks
}

/// Lines inside the marker pair, or every line if the start marker is absent.
fn section_lines(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();

    let Some(start) = lines.iter().position(|l| l.contains(SECTION_START)) else {
        trace!("no section marker, scanning the whole text");
        return lines;
    };

    let body = &lines[start + 1..];
    let end = body
        .iter()
        .position(|l| l.trim_start().starts_with(SECTION_END))
        .unwrap_or(body.len());

    trace!(start = start, len = end; "scanning marked section");
    body[..end].to_vec()
}

/// Name following a `Step:` label, trimmed. `None` if the line is no header.
fn step_header(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(STEP_LABEL)?;
    // "Step:build" is not a header; the label must be followed by whitespace
    // or end the line.
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}
