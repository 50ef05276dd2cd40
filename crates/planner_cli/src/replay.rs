//! Recorded tick input
//!
//! Accepts either a JSON array of [`TickContext`] snapshots or one snapshot
//! per line (JSON lines). Blank lines are skipped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use planner_core::TickContext;

pub fn load_ticks(path: &Path) -> Result<Vec<TickContext>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_ticks(&text).with_context(|| format!("parsing ticks from {}", path.display()))
}

pub fn parse_ticks(text: &str) -> Result<Vec<TickContext>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).context("invalid JSON array of ticks");
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid tick on line {}", index + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::GameTime;
    use std::io::Write;

    fn sample() -> Vec<TickContext> {
        (0..3).map(|i| TickContext::at(GameTime::from_millis(i * 16))).collect()
    }

    #[test]
    fn test_parse_array() {
        let text = serde_json::to_string_pretty(&sample()).unwrap();
        assert_eq!(parse_ticks(&text).unwrap(), sample());
    }

    #[test]
    fn test_parse_json_lines_skips_blanks() {
        let mut text = String::new();
        for ctx in sample() {
            text.push_str(&serde_json::to_string(&ctx).unwrap());
            text.push_str("\n\n");
        }
        assert_eq!(parse_ticks(&text).unwrap(), sample());
    }

    #[test]
    fn test_bad_line_names_its_number() {
        let good = serde_json::to_string(&TickContext::default()).unwrap();
        let text = format!("{good}\n{{not json}}\n");
        let err = parse_ticks(&text).unwrap_err();
        assert!(format!("{err}").contains("line 2"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", serde_json::to_string(&sample()).unwrap()).unwrap();
        assert_eq!(load_ticks(file.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_ticks(Path::new("/nonexistent/ticks.jsonl")).is_err());
    }
}
