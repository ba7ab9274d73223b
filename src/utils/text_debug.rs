// src/utils/text_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;
use regex::Regex;
use crate::utils::error::AppError;

/// Saves extracted bulletin text to an HTML file with debug highlights.
/// `highlights` are byte ranges into `text` with a highlight kind.
pub fn save_debug_text(text: &str, path: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), AppError> {
    let mut file = File::create(path)?;

    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str("body { font-family: monospace; white-space: pre; }\n");
    debug_html.push_str(".highlight-station { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-hydro { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-missing { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    for (start, end, highlight_type) in sorted_highlights {
        // Overlapping matches: the earlier one wins
        if start < last_pos {
            continue;
        }
        if start > last_pos {
            debug_html.push_str(&escape_html(&text[last_pos..start]));
        }

        let css_class = match highlight_type {
            "station" => "highlight-station",
            "hydro" => "highlight-hydro",
            "missing" => "highlight-missing",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!("<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type));
        debug_html.push_str(&escape_html(&text[start..end]));
        debug_html.push_str("</span>");

        last_pos = end;
    }

    if last_pos < text.len() {
        debug_html.push_str(&escape_html(&text[last_pos..]));
    }

    debug_html.push_str("\n</body>\n</html>");

    file.write_all(debug_html.as_bytes())?;

    tracing::info!("Saved debug text to {}", path.display());
    Ok(())
}

/// Creates an annotated copy of the bulletin text with every match of the
/// given regex patterns highlighted.
pub fn create_debug_text(text: &str, path: &Path, patterns: &[(String, &str)]) -> Result<(), AppError> {
    let mut highlights = Vec::new();

    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(text) {
            highlights.push((mat.start(), mat.end(), *highlight_type));
        }
    }

    save_debug_text(text, path, &highlights)
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_matches_and_escapes_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.html");
        let text = "Colombo 31.2 24.0 NA\nGalle <missing> tr";
        let patterns = vec![
            (r"(?i)\b(Colombo|Galle)\b".to_string(), "station"),
            (r"\b(NA|tr|TR)\b".to_string(), "missing"),
        ];

        create_debug_text(text, &path, &patterns).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();

        assert!(html.contains("<span class=\"highlight-station\" title=\"Position: 0-7, Type: station\">Colombo</span>"));
        assert!(html.contains("&lt;missing&gt;"));
        assert_eq!(html.matches("highlight-missing\" title").count(), 2);
    }

    #[test]
    fn rejects_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.html");
        let patterns = vec![("(unclosed".to_string(), "station")];
        assert!(matches!(create_debug_text("x", &path, &patterns), Err(AppError::Config(_))));
    }
}
