use crate::project::ProjectFile;
use crate::warning;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static JSON_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("valid fence pattern"));

#[derive(Debug, Deserialize)]
struct GeneratedProject {
    #[serde(default)]
    files: Vec<ProjectFile>,
}

/// a parsed model response: the prose plus any generated files
#[derive(Debug, Default)]
pub struct Generation {
    pub explanation: String,
    pub files: Vec<ProjectFile>,
}

/// split a full model response into its explanation and file records
///
/// the files come from the first fenced `json` block shaped like
/// `{"files": [{"name", "content", "language"}]}`; a missing or malformed
/// block yields no files rather than an error
pub fn parse_response(response: &str) -> Generation {
    let Some(captures) = JSON_BLOCK.captures(response) else {
        return Generation {
            explanation: response.trim().to_string(),
            files: Vec::new(),
        };
    };

    let (Some(block), Some(body)) = (captures.get(0), captures.get(1)) else {
        return Generation::default();
    };

    let explanation = format!("{}{}", &response[..block.start()], &response[block.end()..])
        .trim()
        .to_string();

    let files = match serde_json::from_str::<GeneratedProject>(body.as_str()) {
        Ok(project) => project.files,
        Err(e) => {
            warning!("ignoring malformed file block in response: {}", e);
            Vec::new()
        }
    };

    Generation { explanation, files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::FileType;

    #[test]
    fn test_extracts_files_and_explanation() {
        let response = r#"Here is a counter app.

```json
{
  "files": [
    {"name": "index.html", "content": "<body></body>", "language": "html"},
    {"name": "app.js", "content": "let n = 0;", "language": "javascript"}
  ]
}
```

Enjoy!"#;
        let generation = parse_response(response);

        assert_eq!(generation.files.len(), 2);
        assert_eq!(generation.files[0].name, "index.html");
        assert_eq!(generation.files[1].language, FileType::Javascript);
        assert!(generation.explanation.starts_with("Here is a counter app."));
        assert!(generation.explanation.ends_with("Enjoy!"));
        assert!(!generation.explanation.contains("```"));
    }

    #[test]
    fn test_response_without_block() {
        let generation = parse_response("I can't build that, sorry.");
        assert!(generation.files.is_empty());
        assert_eq!(generation.explanation, "I can't build that, sorry.");
    }

    #[test]
    fn test_malformed_block_yields_no_files() {
        let generation = parse_response("text\n```json\n{\"files\": [oops]}\n```");
        assert!(generation.files.is_empty());
        assert_eq!(generation.explanation, "text");
    }

    #[test]
    fn test_only_first_block_is_used() {
        let response = "```json\n{\"files\":[{\"name\":\"a.txt\",\"content\":\"1\",\"language\":\"other\"}]}\n```\n```json\n{\"files\":[{\"name\":\"b.txt\",\"content\":\"2\",\"language\":\"other\"}]}\n```";
        let generation = parse_response(response);
        assert_eq!(generation.files.len(), 1);
        assert_eq!(generation.files[0].name, "a.txt");
    }
}
