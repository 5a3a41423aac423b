use crate::services::SearchResponse;

/// Formats a successful search response as a single markdown block for the
/// front-end to display. Error strings from the gateway are passed through
/// by the handlers and never reach this function.
pub fn render_markdown(response: &SearchResponse) -> String {
    let mut output = String::new();

    if let Some(summary) = response
        .summary
        .as_deref()
        .filter(|text| !text.is_empty())
    {
        output.push_str(&format!("## 概要:\n{}\n\n---\n\n", summary));
    }

    output.push_str("## 検索結果:\n");
    if response.results.is_empty() {
        output.push_str("関連する結果は見つかりませんでした。");
        return output;
    }

    for (i, result) in response.results.iter().enumerate() {
        if result.link.is_empty() {
            output.push_str(&format!("### {}. {}\n", i + 1, result.title));
        } else {
            output.push_str(&format!("### {}. [{}]({})\n", i + 1, result.title, result.link));
        }

        if let Some(snippet) = result.snippet.as_deref().filter(|s| !s.is_empty()) {
            output.push_str(&format!("{}\n", convert_emphasis(snippet)));
        }
        output.push('\n');
    }

    output
}

/// Backend snippets mark matched terms with inline `<em>` tags; markdown
/// emphasis is used instead.
fn convert_emphasis(snippet: &str) -> String {
    snippet.replace("<em>", "*").replace("</em>", "*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SearchResult;

    fn result(title: &str, link: &str, snippet: Option<&str>) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            link: link.to_string(),
            snippet: snippet.map(|s| s.to_string()),
        }
    }

    #[test]
    fn empty_results_render_notice() {
        let rendered = render_markdown(&SearchResponse {
            summary: None,
            results: vec![],
        });
        assert_eq!(rendered, "## 検索結果:\n関連する結果は見つかりませんでした。");
    }

    #[test]
    fn summary_renders_first_with_divider() {
        let rendered = render_markdown(&SearchResponse {
            summary: Some("全体の要約です。".to_string()),
            results: vec![result("Case Study A", "https://example.com/a", None)],
        });
        assert!(rendered.starts_with("## 概要:\n全体の要約です。\n\n---\n\n## 検索結果:\n"));
    }

    #[test]
    fn entries_are_one_indexed_headings_with_links() {
        let rendered = render_markdown(&SearchResponse {
            summary: None,
            results: vec![
                result("Case Study A", "https://example.com/a", None),
                result("Case Study B", "", None),
            ],
        });
        assert!(rendered.contains("### 1. [Case Study A](https://example.com/a)\n"));
        assert!(rendered.contains("### 2. Case Study B\n"));
    }

    #[test]
    fn snippet_emphasis_tags_become_markdown() {
        let rendered = render_markdown(&SearchResponse {
            summary: None,
            results: vec![result(
                "Case Study A",
                "https://example.com/a",
                Some("<em>Gemini</em> usage"),
            )],
        });
        assert!(rendered.contains("*Gemini* usage\n"));
        assert!(!rendered.contains("<em>"));
        assert!(!rendered.contains("</em>"));
    }

    #[test]
    fn blank_summary_is_skipped() {
        let rendered = render_markdown(&SearchResponse {
            summary: Some(String::new()),
            results: vec![],
        });
        assert!(!rendered.contains("## 概要:"));
    }
}
