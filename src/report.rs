// src/report.rs
use serde_json::Value;
use std::fmt;

const SEPARATOR: &str = "\n---\n";

/// One fragment of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    Warning(String),
    Success(String),
    /// A request to paste into Dev Tools, with an optional JSON body.
    Request { line: String, body: Option<Value> },
}

impl Block {
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text(text.into())
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Block::Warning(text.into())
    }

    pub fn request(line: impl Into<String>) -> Self {
        Block::Request {
            line: line.into(),
            body: None,
        }
    }

    pub fn request_with_body(line: impl Into<String>, body: Value) -> Self {
        Block::Request {
            line: line.into(),
            body: Some(body),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Block::Text(text) => write!(f, "{}", text),
            Block::Warning(text) => write!(f, "⚠️ {}", text),
            Block::Success(text) => write!(f, "✅ {}", text),
            Block::Request { line, body: None } => write!(f, "```bash\n{}\n```", line),
            Block::Request {
                line,
                body: Some(body),
            } => {
                let body = serde_json::to_string_pretty(body).map_err(|_| fmt::Error)?;
                write!(f, "```json\n{}\n{}\n```", line, body)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.heading)?;
        for block in &self.blocks {
            write!(f, "\n{}", block)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// The cluster could not be reached; nothing else is generated.
    Unavailable(String),
    Plan {
        title: String,
        sections: Vec<Section>,
    },
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Report::Unavailable(message) => write!(f, "❌ {}", message),
            Report::Plan { title, sections } => {
                write!(f, "{}", title)?;
                for section in sections {
                    write!(f, "\n{}\n{}", SEPARATOR, section)?;
                }
                Ok(())
            }
        }
    }
}

// Lookups used by the tests to inspect generated reports
#[cfg(test)]
impl Section {
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Warning(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn requests(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Request { line, body } => Some((line.as_str(), body.as_ref())),
            _ => None,
        })
    }
}

#[cfg(test)]
impl Report {
    pub fn sections(&self) -> &[Section] {
        match self {
            Report::Unavailable(_) => &[],
            Report::Plan { sections, .. } => sections,
        }
    }

    pub fn section(&self, step: u8) -> Option<&Section> {
        let prefix = format!("## Step {}:", step);
        self.sections()
            .iter()
            .find(|section| section.heading.starts_with(&prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_body() {
        let block = Block::request("GET _data_stream/logs");
        assert_eq!(block.to_string(), "```bash\nGET _data_stream/logs\n```");
    }

    #[test]
    fn test_request_with_body_keeps_key_order() {
        let block = Block::request_with_body(
            "POST _reindex",
            json!({"source": {"index": "a"}, "dest": {"index": "b"}}),
        );
        assert_eq!(
            block.to_string(),
            "```json\nPOST _reindex\n{\n  \"source\": {\n    \"index\": \"a\"\n  },\n  \"dest\": {\n    \"index\": \"b\"\n  }\n}\n```"
        );
    }

    #[test]
    fn test_section_rendering() {
        let mut section = Section::new("## Step 9: Delete");
        section.push(Block::warning("careful"));
        section.push(Block::Success("done".to_string()));
        assert_eq!(section.to_string(), "## Step 9: Delete\n⚠️ careful\n✅ done");
        assert_eq!(section.warnings().collect::<Vec<_>>(), vec!["careful"]);
    }

    #[test]
    fn test_report_separators() {
        let report = Report::Plan {
            title: "# Title".to_string(),
            sections: vec![Section::new("## Step 3: A"), Section::new("## Step 4: B")],
        };
        assert_eq!(
            report.to_string(),
            "# Title\n\n---\n\n## Step 3: A\n\n---\n\n## Step 4: B"
        );
        assert!(report.section(4).is_some());
        assert!(report.section(5).is_none());
    }

    #[test]
    fn test_unavailable_is_one_line() {
        let report = Report::Unavailable("not connected".to_string());
        assert_eq!(report.to_string().lines().count(), 1);
        assert!(report.sections().is_empty());
    }
}
