//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};
use std::io::Write;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with default options
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render to a writer
    pub fn render_to<W: Write>(
        &self,
        result_set: &ResultSet,
        mut writer: W,
    ) -> std::io::Result<()> {
        let output = self.render(result_set);
        writer.write_all(output.as_bytes())
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        // Group by kind
        let mut summaries = Vec::new();
        let mut bullets = Vec::new();
        let mut rendered = Vec::new();
        let mut others = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Summary => summaries.push(item),
                Kind::Bullet => bullets.push(item),
                Kind::Post | Kind::Draft => rendered.push(item),
                Kind::Error => errors.push(item),
                _ => others.push(item),
            }
        }

        // Render each section
        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}", error.code, error.message));
                    if let Some(path) = &item.path {
                        output.push_str(&format!(" (`{}`)", path));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !summaries.is_empty() {
            output.push_str("## Summary\n\n");
            for item in summaries {
                if let Some(path) = &item.path {
                    output.push_str(&format!("### `{}`\n\n", path));
                }
                if let Some(text) = &item.text {
                    output.push_str(text);
                    output.push_str("\n\n");
                }
            }
        }

        if !bullets.is_empty() {
            output.push_str("## Key takeaways\n\n");
            for item in bullets {
                if let Some(text) = &item.text {
                    output.push_str(&format!("- {}\n", text));
                }
            }
            output.push('\n');
        }

        if !rendered.is_empty() {
            output.push_str("## Rendered\n\n");
            for item in rendered {
                self.render_item_md(&mut output, item);
            }
        }

        if !others.is_empty() {
            output.push_str("## Results\n\n");
            for item in others {
                let kind = serde_json::to_value(item.kind)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                output.push_str(&format!("- **{}**", kind));
                if let Some(text) = &item.text {
                    output.push_str(&format!(": {}", text));
                }
                if let Some(data) = &item.data {
                    output.push_str(&format!(" `{}`", data));
                }
                output.push('\n');
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        let heading = item
            .data
            .as_ref()
            .and_then(|d| d.get("platform"))
            .and_then(|p| p.as_str())
            .map(str::to_string)
            .or_else(|| item.path.clone());

        if let Some(heading) = heading {
            output.push_str(&format!("### `{}`\n", heading));
        }

        if let Some(text) = &item.text {
            output.push_str("\n```\n");
            output.push_str(text);
            if !text.ends_with('\n') {
                output.push('\n');
            }
            output.push_str("```\n");
        }

        if item.meta.truncated {
            output.push_str("\n> ⚠️ Content was truncated\n");
        }

        output.push('\n');
    }

    /// Render as raw output: text payloads only
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.text.clone())
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}
