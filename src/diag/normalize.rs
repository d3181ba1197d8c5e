use regex::Regex;
use std::sync::OnceLock;

/// Strip `HH:MM:SS (context) l ` log prefixes from every line.
///
/// Lines without a prefix are kept as-is and line breaks are preserved
/// (`\r\n` collapses to `\n`). Stacked prefixes are removed one after another,
/// so running this on its own output is a no-op.
///
/// Example:
/// `02:04:05 (diagnostics) i Step: build`  =>  `Step: build`
pub fn normalize(text: &str) -> String {
    static PREFIX_RE: OnceLock<Regex> = OnceLock::new();
    // 1) hh:mm:ss
    // 2) (context), anything but a closing paren
    // 3) single lowercase level marker
    // 4) one separator, then the rest of the line with its indentation
    let re = PREFIX_RE.get_or_init(|| {
        Regex::new(r"^\d{2}:\d{2}:\d{2}\s+\([^)]+\)\s+[a-z](?:\s(.*))?$")
            .expect("log prefix regex is valid")
    });

    text.split('\n')
        .map(|line| {
            let mut line = line.strip_suffix('\r').unwrap_or(line);
            while let Some(caps) = re.captures(line) {
                line = caps.get(1).map_or("", |rest| rest.as_str());
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
