//! Resource keys, column labels, colors and name wrapping.

/// Grouping key for steps whose resource descriptor has no usable name.
pub const AGGREGATOR_KEY: &str = "_aggregator_";

/// Color used when there is no resource at all.
pub const NEUTRAL_COLOR: &str = "#607d8b";

/// Default line width for [`wrap_step_name`].
pub const DEFAULT_WRAP_WIDTH: usize = 10;

const KNOWN_COLORS: [(&str, &str); 4] = [
    ("app", "#d63031"),
    ("frontend", "#0984e3"),
    ("node", "#27ae60"),
    ("prerequisites", "#e67e22"),
];

const PALETTE: [&str; 4] = ["#7f39fb", "#0891b2", "#6b7280", "#be123c"];

/// First whitespace-delimited token of a resource descriptor, lowercased.
///
/// `"app (ExecutableContainerResource)"` => `"app"`
pub fn resource_key(resource: &str) -> String {
    resource
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
        .unwrap_or_else(|| AGGREGATOR_KEY.to_string())
}

/// Header text for a resource column.
pub fn column_label(key: &str) -> String {
    if key == AGGREGATOR_KEY {
        "Pipeline".to_string()
    } else {
        key.to_uppercase()
    }
}

/// Stable color for a resource descriptor.
///
/// Known resource names map to fixed colors; anything else hashes into a
/// small palette, so the same key always gets the same color.
pub fn resource_color(resource: Option<&str>) -> &'static str {
    let Some(resource) = resource.filter(|r| !r.is_empty()) else {
        return NEUTRAL_COLOR;
    };
    let base = resource
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if let Some(&(_, color)) = KNOWN_COLORS.iter().find(|(name, _)| *name == base) {
        return color;
    }

    let hash = base.encode_utf16().fold(0i32, |hash, unit| {
        i32::from(unit).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });
    PALETTE[hash.unsigned_abs() as usize % PALETTE.len()]
}

/// Split a step name into display lines of at most `max_chars` characters.
///
/// Hyphenated names break at hyphens, packing as many segments per line as
/// fit. Anything still too long is cut every `max_chars` characters, and so is
/// a name whose hyphens would not survive the split (runs, leading, trailing).
pub fn wrap_step_name(name: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    if name.chars().count() <= max {
        return vec![name.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    if name.contains('-') {
        let mut current = String::new();
        for part in name.split('-') {
            let next = if current.is_empty() {
                part.to_string()
            } else {
                format!("{current}-{part}")
            };
            if next.chars().count() <= max {
                current = next;
            } else {
                if !current.is_empty() {
                    lines.push(current);
                }
                current = part.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    } else {
        lines.push(name.to_string());
    }

    // Leading, trailing or doubled hyphens do not survive the split.
    if lines.is_empty() || lines.join("-") != name {
        return hard_wrap(name, max);
    }

    lines.iter().flat_map(|line| hard_wrap(line, max)).collect()
}

fn hard_wrap(line: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(max).map(|chunk| chunk.iter().collect()).collect()
}
