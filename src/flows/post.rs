//! Post flow - Jekyll post from model output
//!
//! Builds front matter and a Markdown body ("Key takeaways" list plus source
//! link), then prints the post or writes it under `<out>/_posts/`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::config::{Config, SiteConfig};
use crate::core::error::TakeawayError;
use crate::core::input::{read_input, InputSource};
use crate::core::model::{Kind, Meta, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::sha1_hex;
use crate::flows::tags::{auto_tags, DEFAULT_MAX_TAGS};
use crate::flows::takeaways::{takeaways_for, TakeawayPolicy};

/// Bullets rendered under "Key takeaways"
pub const MAX_POST_BULLETS: usize = 5;

/// Longest slug, in characters
pub const MAX_SLUG_CHARS: usize = 80;

/// Longest SEO description, in characters
pub const MAX_SEO_DESCRIPTION_CHARS: usize = 155;

static SLUG_DROP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("Invalid SLUG_DROP_RE regex"));

static SLUG_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid SLUG_SPACE_RE regex"));

/// URL slug for a title
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept = SLUG_DROP_RE.replace_all(&lowered, "");
    let dashed = SLUG_SPACE_RE.replace_all(&kept, "-");
    dashed.trim_matches('-').chars().take(MAX_SLUG_CHARS).collect()
}

/// Jekyll front matter, in emitted key order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    pub layout: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub seo_title: String,
    pub seo_description: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub permalink: String,
}

impl FrontMatter {
    /// Build front matter for a post; returns it with the slug
    pub fn build(
        title: &str,
        summary: &str,
        tags: &[String],
        date: &DateTime<FixedOffset>,
        layout: &str,
    ) -> (Self, String) {
        let slug = slugify(title);
        let front_matter = Self {
            layout: layout.to_string(),
            title: title.to_string(),
            date: date.format("%Y-%m-%d %H:%M:%S %z").to_string(),
            excerpt: summary.split('.').next().unwrap_or_default().to_string(),
            seo_title: title.to_string(),
            seo_description: summary.chars().take(MAX_SEO_DESCRIPTION_CHARS).collect(),
            categories: tags.to_vec(),
            tags: tags.to_vec(),
            permalink: format!("/blog/{}/", slug),
        };
        (front_matter, slug)
    }

    /// YAML block between `---` fences, followed by a blank line
    pub fn to_text(&self) -> Result<String, TakeawayError> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n\n", yaml))
    }
}

/// Markdown body: summary, takeaways list, source link
pub fn render_body(summary: &str, bullets: &[String], link: &str) -> String {
    let mut body = String::new();
    body.push_str(summary.trim());
    body.push_str("\n\n**Key takeaways**\n");
    for bullet in bullets.iter().take(MAX_POST_BULLETS) {
        body.push_str(&format!("- {}\n", bullet));
    }
    body.push_str(&format!("\n**Source:** [{}]({})\n", link, link));
    body
}

/// Path of the post inside the site repository
pub fn post_path(date: &DateTime<FixedOffset>, slug: &str) -> String {
    format!("_posts/{}-{}.md", date.format("%Y-%m-%d"), slug)
}

/// Public URL of the post
pub fn permalink(site: &SiteConfig, date: &DateTime<FixedOffset>, slug: &str) -> String {
    let path = site
        .permalink
        .replace(":year", &date.format("%Y").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
        .replace(":title", slug);
    format!("{}{}", site.base_url.trim_end_matches('/'), path)
}

/// Post timestamp: midnight UTC of `date`, or now in local time
pub fn post_timestamp(date: Option<NaiveDate>) -> DateTime<FixedOffset> {
    match date {
        Some(day) => day.and_time(NaiveTime::MIN).and_utc().fixed_offset(),
        None => Local::now().fixed_offset(),
    }
}

/// A fully rendered post
#[derive(Debug, Clone)]
pub struct RenderedPost {
    pub id: String,
    pub slug: String,
    pub path: String,
    pub permalink: String,
    pub tags: Vec<String>,
    pub content: String,
}

/// Everything a post needs besides the model output
#[derive(Debug, Clone)]
pub struct PostRequest<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub date: DateTime<FixedOffset>,
    pub summary_lines: usize,
    pub policy: TakeawayPolicy,
}

/// Render a post from model output. A title with no slug characters is
/// rejected since the post would have no file name.
pub fn render_post(
    rewritten: &str,
    request: &PostRequest<'_>,
    config: &Config,
) -> Result<RenderedPost, TakeawayError> {
    let takeaways = takeaways_for(rewritten, request.summary_lines, &request.policy);
    let tags = auto_tags(
        &format!("{} {}", request.title, takeaways.summary),
        &config.tag_buckets(),
        DEFAULT_MAX_TAGS,
    );

    let (front_matter, slug) = FrontMatter::build(
        request.title,
        &takeaways.summary,
        &tags,
        &request.date,
        &config.site.layout,
    );
    if slug.is_empty() {
        return Err(TakeawayError::InvalidArgument(format!(
            "title {:?} has no characters usable in a slug",
            request.title
        )));
    }
    let content = front_matter.to_text()?
        + &render_body(&takeaways.summary, &takeaways.bullets, request.link);

    Ok(RenderedPost {
        id: sha1_hex(request.link),
        path: post_path(&request.date, &slug),
        permalink: permalink(&config.site, &request.date, &slug),
        slug,
        tags,
        content,
    })
}

/// Write a post under `out_dir`, creating directories as needed
pub fn write_post(out_dir: &Path, post: &RenderedPost) -> Result<PathBuf, TakeawayError> {
    let target = out_dir.join(&post.path);
    let write = |target: &Path| -> std::io::Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, &post.content)
    };

    write(&target).map_err(|source| TakeawayError::PostWrite {
        path: target.clone(),
        source,
    })?;
    info!("Wrote post {}", target.display());
    Ok(target)
}

/// Run the post command
pub fn run_post(
    source: &InputSource,
    request: &PostRequest<'_>,
    out_dir: Option<&Path>,
    config: &Config,
    render_config: RenderConfig,
) -> Result<()> {
    let input = read_input(source)?;
    let post = render_post(&input.content, request, config)?;

    let written = match out_dir {
        Some(dir) => Some(write_post(dir, &post)?),
        None => None,
    };

    let mut item = ResultItem::rendered(Kind::Post, &post.content)
        .with_path(&post.path)
        .with_meta(Meta {
            hash: Some(post.id.clone()),
            truncated: input.truncated,
            ..Default::default()
        })
        .with_data(json!({
            "slug": post.slug,
            "permalink": post.permalink,
            "tags": post.tags,
            "written": written.map(|p| p.display().to_string()),
        }));
    item.errors
        .extend(input.warnings.iter().map(|w| w.to_item_error()));

    let mut result_set = ResultSet::new();
    result_set.push(item);

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
