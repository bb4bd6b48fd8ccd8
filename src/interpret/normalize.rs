//! Display cleanup for chat replies. Strips markdown the chat view cannot render.

use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:#{1,6}[ \t]+)+").expect("heading regex"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold regex"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic regex"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:[-*+][ \t]+)+").expect("bullet regex"));
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank run regex"));

/// Upper bound on cleanup passes. Each pass strips whole marker runs, so real
/// replies settle in two or three.
const MAX_PASSES: usize = 8;

/// Strip headings and emphasis, unify bullets to `• `, collapse blank runs, trim.
///
/// Passes repeat until the text stops changing, so the result is a fixed point
/// (`normalize(normalize(x)) == normalize(x)`). A pass can only expose new markers
/// by removing emphasis around them, and the pass count is capped.
pub fn normalize(text: &str) -> String {
    let mut current = text.replace("\r\n", "\n");
    for _ in 0..MAX_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_pass(text: &str) -> String {
    let text = HEADING.replace_all(text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = BULLET.replace_all(&text, "• ");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}
