//! Social drafts - short-form copy per platform
//!
//! Provides:
//! - platform settings: defaults plus config overrides (map, list or string)
//! - hashtag normalization
//! - draft formatting for twitter, facebook, instagram, tiktok and a plain doc

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_yaml::Value;
use tracing::debug;

use crate::config::{scalar_to_string, Config};
use crate::core::input::{read_input, InputSource};
use crate::core::model::{Kind, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::util::token_trim;
use crate::flows::tags::{auto_tags, DEFAULT_MAX_TAGS};
use crate::flows::takeaways::{takeaways_for, TakeawayPolicy};

/// Bullets listed in facebook and doc drafts
pub const MAX_DRAFT_BULLETS: usize = 4;

const NO_BULLETS_PLACEHOLDER: &str = "• Key detail 1\n• Key detail 2";
const HEADLINE_CHARS: usize = 120;
const TAKE_CHARS: usize = 200;
const INSTAGRAM_CTA: &str = "Follow for daily tech breakdowns ↓";
const TIKTOK_CTA: &str = "Like & follow for more. Full article in bio.";

/// Settings for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSettings {
    pub enabled: bool,
    pub max_len: usize,
    pub add_link: bool,
    pub script_seconds: u64,
}

impl PlatformSettings {
    fn enabled() -> Self {
        Self {
            enabled: true,
            max_len: 260,
            add_link: true,
            script_seconds: 45,
        }
    }

    /// Apply a config value: a table of overrides or a bare bool
    fn apply(&mut self, value: &Value) {
        match value {
            Value::Bool(enabled) => self.enabled = *enabled,
            Value::Mapping(table) => {
                for (key, value) in table {
                    match (key.as_str(), value) {
                        (Some("enabled"), Value::Bool(b)) => self.enabled = *b,
                        (Some("add_link"), Value::Bool(b)) => self.add_link = *b,
                        (Some("max_len"), v) => {
                            if let Some(n) = v.as_u64() {
                                self.max_len = n as usize;
                            }
                        }
                        (Some("script_seconds"), v) => {
                            if let Some(n) = v.as_u64() {
                                self.script_seconds = n;
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}

/// Settings for every supported platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platforms {
    pub twitter: PlatformSettings,
    pub facebook: PlatformSettings,
    pub instagram: PlatformSettings,
    pub tiktok: PlatformSettings,
    pub doc_text: PlatformSettings,
}

impl Default for Platforms {
    fn default() -> Self {
        Self {
            twitter: PlatformSettings::enabled(),
            facebook: PlatformSettings::enabled(),
            instagram: PlatformSettings {
                add_link: false,
                ..PlatformSettings::enabled()
            },
            tiktok: PlatformSettings::enabled(),
            doc_text: PlatformSettings::enabled(),
        }
    }
}

impl Platforms {
    fn get_mut(&mut self, name: &str) -> Option<&mut PlatformSettings> {
        match name {
            "twitter" => Some(&mut self.twitter),
            "facebook" => Some(&mut self.facebook),
            "instagram" => Some(&mut self.instagram),
            "tiktok" => Some(&mut self.tiktok),
            "doc_text" => Some(&mut self.doc_text),
            _ => None,
        }
    }

    fn only(names: impl IntoIterator<Item = String>) -> Self {
        let mut platforms = Self::default();
        for name in ["twitter", "facebook", "instagram", "tiktok", "doc_text"] {
            if let Some(settings) = platforms.get_mut(name) {
                settings.enabled = false;
            }
        }
        for name in names {
            if let Some(settings) = platforms.get_mut(&name.trim().to_lowercase()) {
                settings.enabled = true;
            }
        }
        platforms
    }
}

/// Platform settings from config.
///
/// A map overrides defaults per platform; a list or a comma/space separated
/// string enables only the named platforms. Anything else means defaults.
pub fn normalize_platforms(value: &Value) -> Platforms {
    match value {
        Value::Mapping(map) => {
            let mut platforms = Platforms::default();
            for (name, settings) in map {
                let Some(name) = name.as_str() else { continue };
                match platforms.get_mut(name) {
                    Some(target) => target.apply(settings),
                    None => debug!("ignoring unknown platform {:?}", name),
                }
            }
            platforms
        }
        Value::Sequence(names) => Platforms::only(names.iter().filter_map(scalar_to_string)),
        Value::String(names) => Platforms::only(
            names
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        ),
        _ => Platforms::default(),
    }
}

fn hash_prefixed(tag: String) -> String {
    if tag.starts_with('#') {
        tag
    } else {
        format!("#{}", tag)
    }
}

/// Hashtags from config.
///
/// List entries are kept as written. String and map forms are split and
/// `#`-prefixed when the marker is missing.
pub fn normalize_hashtags(value: &Value) -> Vec<String> {
    let trimmed = |v: &Value| {
        scalar_to_string(v)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    match value {
        Value::Sequence(items) => items.iter().filter_map(trimmed).collect(),
        Value::String(s) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(|p| hash_prefixed(p.to_string()))
            .collect(),
        Value::Mapping(map) => map
            .values()
            .flat_map(|v| -> Vec<String> {
                match v {
                    Value::Sequence(items) => items.iter().filter_map(trimmed).collect(),
                    Value::String(_) => trimmed(v).into_iter().collect(),
                    _ => Vec::new(),
                }
            })
            .map(hash_prefixed)
            .collect(),
        _ => Vec::new(),
    }
}

/// Article fields the drafts are built from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub bullets: Vec<String>,
    pub tags: Vec<String>,
}

/// One draft per platform; disabled platforms are empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drafts {
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
    pub tiktok: String,
    pub doc_text: String,
}

impl Drafts {
    /// (platform, draft) pairs for non-empty drafts, in fixed order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("twitter", self.twitter.as_str()),
            ("facebook", self.facebook.as_str()),
            ("instagram", self.instagram.as_str()),
            ("tiktok", self.tiktok.as_str()),
            ("doc_text", self.doc_text.as_str()),
        ]
        .into_iter()
        .filter(|(_, draft)| !draft.is_empty())
    }
}

fn bullet_block(bullets: &[String]) -> String {
    if bullets.is_empty() {
        return NO_BULLETS_PLACEHOLDER.to_string();
    }
    bullets
        .iter()
        .take(MAX_DRAFT_BULLETS)
        .map(|b| format!("• {}", b))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format drafts for every enabled platform
pub fn format_drafts(
    article: &Article,
    link: &str,
    hashtags: &[String],
    platforms: &Platforms,
) -> Drafts {
    let title = article.title.trim();
    let summary = article.summary.trim();
    let bullets = bullet_block(&article.bullets);
    let hashtags = hashtags
        .iter()
        .cloned()
        .chain(article.tags.iter().map(|t| format!("#{}", t)))
        .collect::<Vec<_>>()
        .join(" ");
    let link_if = |settings: &PlatformSettings| if settings.add_link { link } else { "" };

    let mut drafts = Drafts::default();

    if platforms.twitter.enabled {
        let draft = format!(
            "{}\n\n{}\n\n{}\n{}",
            token_trim(title, HEADLINE_CHARS),
            token_trim(summary, TAKE_CHARS),
            hashtags,
            link_if(&platforms.twitter)
        );
        drafts.twitter = token_trim(&draft, platforms.twitter.max_len);
    }

    if platforms.facebook.enabled {
        drafts.facebook = format!(
            "{}\n\n{}\n\n{}\n\n{}\n\n{}",
            title,
            summary,
            bullets,
            link_if(&platforms.facebook),
            hashtags
        )
        .trim()
        .to_string();
    }

    if platforms.instagram.enabled {
        drafts.instagram = format!("{}\n\n{}\n\n{}\n\n{}", title, summary, INSTAGRAM_CTA, hashtags)
            .trim()
            .to_string();
    }

    if platforms.tiktok.enabled {
        let seconds = platforms.tiktok.script_seconds;
        drafts.tiktok = format!(
            "[{}s script]\nHOOK: {} in {} seconds:\n\n{}\n\n{}",
            seconds, title, seconds, summary, TIKTOK_CTA
        )
        .trim()
        .to_string();
    }

    if platforms.doc_text.enabled {
        drafts.doc_text = format!(
            "{}\n\n{}\n\nKey takeaways:\n{}\n\nSource: {}\n\n{}",
            title, summary, bullets, link, hashtags
        )
        .trim()
        .to_string();
    }

    drafts
}

/// Run the drafts command
pub fn run_drafts(
    source: &InputSource,
    title: &str,
    link: &str,
    config: &Config,
    summary_lines: usize,
    policy: &TakeawayPolicy,
    render_config: RenderConfig,
) -> Result<()> {
    let input = read_input(source)?;
    let takeaways = takeaways_for(&input.content, summary_lines, policy);
    let tags = auto_tags(
        &format!("{} {}", title, takeaways.summary),
        &config.tag_buckets(),
        DEFAULT_MAX_TAGS,
    );

    let article = Article {
        title: title.to_string(),
        summary: takeaways.summary,
        bullets: takeaways.bullets,
        tags,
    };
    let drafts = format_drafts(
        &article,
        link,
        &normalize_hashtags(&config.hashtags),
        &normalize_platforms(&config.platforms),
    );

    let mut result_set = ResultSet::new();
    for (platform, draft) in drafts.iter() {
        result_set.push(
            ResultItem::rendered(Kind::Draft, draft)
                .with_data(json!({ "platform": platform })),
        );
    }

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    fn article() -> Article {
        Article {
            title: "Ransomware hits Acme".into(),
            summary: "Acme lost a week of sales. Backups saved the rest.".into(),
            bullets: vec!["Week of sales lost".into(), "Backups restored systems".into()],
            tags: vec!["Security".into()],
        }
    }

    #[test]
    fn test_platform_defaults() {
        let platforms = normalize_platforms(&Value::Null);
        assert_eq!(platforms, Platforms::default());
        assert!(platforms.instagram.enabled);
        assert!(!platforms.instagram.add_link);
        assert_eq!(platforms.twitter.max_len, 260);
        assert_eq!(platforms.tiktok.script_seconds, 45);
    }

    #[test]
    fn test_platform_map_overrides() {
        let platforms = normalize_platforms(&yaml(
            "twitter: {max_len: 200, add_link: false}\ntiktok: false\nmastodon: true",
        ));
        assert_eq!(platforms.twitter.max_len, 200);
        assert!(!platforms.twitter.add_link);
        assert!(platforms.twitter.enabled);
        assert!(!platforms.tiktok.enabled);
        assert!(platforms.facebook.enabled);
    }

    #[test]
    fn test_platform_list_and_string_enable_only_named() {
        for value in [yaml("[twitter, Doc_Text]"), yaml("\"twitter, doc_text\"")] {
            let platforms = normalize_platforms(&value);
            assert!(platforms.twitter.enabled);
            assert!(platforms.doc_text.enabled);
            assert!(!platforms.facebook.enabled);
            assert!(!platforms.instagram.enabled);
            assert!(!platforms.tiktok.enabled);
        }
    }

    #[test]
    fn test_normalize_hashtags() {
        assert_eq!(normalize_hashtags(&yaml("[\"#tech\", news, \" \"]")), vec!["#tech", "news"]);
        assert_eq!(normalize_hashtags(&yaml("\"tech, #ai  cloud\"")), vec!["#tech", "#ai", "#cloud"]);
        assert_eq!(
            normalize_hashtags(&yaml("core: [tech, \"#ai\"]\nextra: cloud")),
            vec!["#tech", "#ai", "#cloud"]
        );
        assert!(normalize_hashtags(&Value::Null).is_empty());
    }

    #[test]
    fn test_twitter_draft() {
        let drafts = format_drafts(
            &article(),
            "https://x.example/a",
            &["#tech".to_string()],
            &Platforms::default(),
        );
        assert_eq!(
            drafts.twitter,
            "Ransomware hits Acme\n\nAcme lost a week of sales. Backups saved the rest.\n\n#tech #Security\nhttps://x.example/a"
        );
    }

    #[test]
    fn test_twitter_draft_is_capped() {
        let mut long = article();
        long.summary = "word ".repeat(80);
        let mut platforms = Platforms::default();
        platforms.twitter.max_len = 100;

        let drafts = format_drafts(&long, "https://x.example/a", &[], &platforms);
        assert_eq!(drafts.twitter.chars().count(), 100);
        assert!(drafts.twitter.ends_with('…'));
    }

    #[test]
    fn test_bullet_block_and_placeholder() {
        let drafts = format_drafts(&article(), "L", &[], &Platforms::default());
        assert!(drafts.facebook.contains("• Week of sales lost\n• Backups restored systems"));
        assert!(drafts.doc_text.contains("Source: L"));

        let mut bare = article();
        bare.bullets.clear();
        let drafts = format_drafts(&bare, "L", &[], &Platforms::default());
        assert!(drafts.doc_text.contains("Key takeaways:\n• Key detail 1\n• Key detail 2"));
    }

    #[test]
    fn test_instagram_and_tiktok() {
        let drafts = format_drafts(&article(), "https://x.example/a", &[], &Platforms::default());
        assert!(!drafts.instagram.contains("https://"));
        assert!(drafts.instagram.contains(INSTAGRAM_CTA));
        assert!(drafts
            .tiktok
            .starts_with("[45s script]\nHOOK: Ransomware hits Acme in 45 seconds:"));
        assert!(drafts.tiktok.ends_with(TIKTOK_CTA));
    }

    #[test]
    fn test_disabled_platforms_are_empty() {
        let platforms = normalize_platforms(&yaml("[twitter]"));
        let drafts = format_drafts(&article(), "L", &[], &platforms);
        let names: Vec<_> = drafts.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["twitter"]);
    }
}
