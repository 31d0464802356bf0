use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Command isolated from any config in the environment or working directory
fn takeaways_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("takeaways"));
    cmd.current_dir(cwd).env_remove("TAKEAWAYS_CONFIG");
    cmd
}

fn texts(items: &[Value]) -> Vec<&str> {
    items
        .iter()
        .filter_map(|v| v.get("text").and_then(|t| t.as_str()))
        .collect()
}

#[test]
fn extract_reads_markers_and_clips_long_bullets() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("out.txt"),
        "Intro line\n- Costs rise sharply\n* Margins shrink\n• Hiring slows\n3. Prices climb\n\
         - One two three four five six seven eight nine ten eleven twelve thirteen fourteen, fifteen sixteen\n",
    );

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("bullets").arg("extract").arg("out.txt");

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(
        texts(&items),
        vec![
            "Costs rise sharply",
            "Margins shrink",
            "Hiring slows",
            "Prices climb",
            "One two three four five six seven eight nine ten eleven twelve thirteen fourteen",
        ]
    );
    for item in &items {
        assert_eq!(item["kind"], "bullet");
        assert_eq!(item["source_mode"], "extracted");
        assert_eq!(item["path"], "out.txt");
    }
}

#[test]
fn extract_reads_stdin() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("bullets")
        .arg("extract")
        .write_stdin("- from stdin\nplain\n");

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(texts(&items), vec!["from stdin"]);
    assert!(items[0].get("path").is_none());
}

#[test]
fn dedupe_drops_summary_echo() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.args([
        "bullets",
        "dedupe",
        "--summary",
        "Ransomware hit the firm hard. Backups saved the day.",
        "Ransomware hit the firm hard",
        "Insurers raise premiums",
    ]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(texts(&items), vec!["Insurers raise premiums"]);
}

#[test]
fn dedupe_drops_near_duplicate_bullets() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.args([
        "bullets",
        "dedupe",
        "--summary",
        "",
        "Costs rise sharply",
        "Cost rises sharply",
        "Margins shrink",
    ]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(texts(&items), vec!["Costs rise sharply", "Margins shrink"]);
}

#[test]
fn dedupe_explain_reports_every_verdict() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.args([
        "bullets",
        "dedupe",
        "--explain",
        "--max-count",
        "1",
        "--summary",
        "Costs rise sharply.",
        "Costs rise sharply",
        "Margins shrink",
        "Hiring slows",
    ]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    let verdicts: Vec<_> = items
        .iter()
        .map(|v| v["data"]["verdict"].as_str().unwrap())
        .collect();
    assert_eq!(verdicts, vec!["echoes_summary", "kept", "over_cap"]);
}

#[test]
fn fallback_strips_attribution() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.args([
        "bullets",
        "fallback",
        "--want",
        "2",
        "--summary",
        "Acme Corp said that prices will rise next quarter. Customers should budget accordingly.",
    ]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(
        texts(&items),
        vec!["prices will rise next quarter", "Customers should budget accordingly"]
    );
    assert_eq!(items[0]["source_mode"], "synthesized");
}

#[test]
fn fallback_defaults_to_three_bullets() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.args([
        "bullets",
        "fallback",
        "--summary",
        "Costs rose. Margins fell. Hiring slowed. Prices climbed. Demand cooled.",
    ]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(
        texts(&items),
        vec!["Costs rose", "Margins fell", "Hiring slowed"]
    );
}

#[test]
fn similarity_reports_normalized_ratio() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.args(["bullets", "similarity", "abcd", "BCDE!"]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["kind"], "similarity");
    assert_eq!(items[0]["data"]["ratio"], 0.75);
    assert_eq!(items[0]["data"]["near_duplicate"], false);
}

#[test]
fn run_without_markers_falls_back_to_summary_fragments() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("run").arg(fixture("rewrites/prose.txt"));

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["kind"], "summary");
    assert_eq!(
        texts(&items[1..]),
        vec![
            "its cloud outage lasted nine hours",
            "Engineers traced the failure to a faulty configuration push",
            "Customers lost access to storage and email",
        ]
    );
    for item in &items[1..] {
        assert_eq!(item["source_mode"], "backstop");
        assert_eq!(item["confidence"], "low");
    }
}

#[test]
fn run_respects_max_count_override() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("run")
        .arg(fixture("rewrites/with_list.txt"))
        .arg("--max-count")
        .arg("2");

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(
        texts(&items[1..]),
        vec![
            "Hyperscalers lock in long-term supply contracts",
            "PC makers delay new laptop launches",
        ]
    );
}

#[test]
fn run_rejects_out_of_range_similarity() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("run").arg("--sim").arg("1.5");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 1"));
}

#[test]
fn run_missing_input_is_an_error() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("run").arg("no-such-file.txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no-such-file.txt"));
}

#[test]
fn post_writes_into_posts_dir() {
    let temp = tempdir().unwrap();
    let site = temp.path().join("site");

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("--config")
        .arg(fixture("config.yaml"))
        .arg("post")
        .arg(fixture("rewrites/with_list.txt"))
        .args(["--title", "Memory prices set to double"])
        .args(["--link", "https://news.example.com/memory"])
        .args(["--date", "2025-09-18"])
        .arg("--out")
        .arg(&site);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "post");
    assert_eq!(
        items[0]["path"],
        "_posts/2025-09-18-memory-prices-set-to-double.md"
    );
    assert_eq!(
        items[0]["data"]["permalink"],
        "https://blog.example.com/blog/memory-prices-set-to-double/"
    );
    assert_eq!(items[0]["data"]["tags"], serde_json::json!(["Hardware", "Cloud"]));

    let written = fs::read_to_string(site.join("_posts/2025-09-18-memory-prices-set-to-double.md"))
        .unwrap();
    assert!(written.starts_with("---\nlayout: posts\ntitle: Memory prices set to double\n"));
    assert!(written.contains("**Key takeaways**\n- Hyperscalers lock in long-term supply contracts\n"));
    assert!(written.ends_with(
        "**Source:** [https://news.example.com/memory](https://news.example.com/memory)\n"
    ));
}

#[test]
fn drafts_follow_platform_config() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("--config")
        .arg(fixture("config.yaml"))
        .arg("drafts")
        .arg(fixture("rewrites/prose.txt"))
        .args(["--title", "Cloud outage hits Acme"])
        .args(["--link", "https://news.example.com/outage"]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let platforms: Vec<_> = items
        .iter()
        .map(|v| v["data"]["platform"].as_str().unwrap())
        .collect();
    assert_eq!(platforms, vec!["twitter", "facebook", "instagram", "doc_text"]);

    let twitter = items[0]["text"].as_str().unwrap();
    assert!(twitter.chars().count() <= 200);
    assert!(items[1]["text"]
        .as_str()
        .unwrap()
        .contains("#tech #news #Security #Cloud"));
}

#[test]
fn tags_use_configured_buckets() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("--config")
        .arg(fixture("config.yaml"))
        .args(["tags", "Ransomware gang hits cloud storage provider"]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["data"]["tags"], serde_json::json!(["Security", "Cloud"]));
}

#[test]
fn score_with_missing_snippet_fails_open() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("--config")
        .arg(fixture("config.yaml"))
        .args(["score", "--title", "Cloud pricing shifts"])
        .args(["--snippet", "missing.txt"]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["data"]["score"], 2);
    assert_eq!(items[0]["data"]["kept"], true);
    assert_eq!(items[0]["errors"][0]["code"], "INPUT_READ");
}

#[test]
fn missing_named_config_falls_back_to_defaults() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.args(["--config", "absent.yaml", "tags", "anything"]);

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(items[0]["data"]["tags"], serde_json::json!([]));
}

#[test]
fn malformed_config_is_an_error() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("takeaways.yaml"), "site: [\n");

    let mut cmd = takeaways_cmd(temp.path());
    cmd.args(["tags", "anything"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("takeaways.yaml"));
}

#[test]
fn config_similarity_out_of_range_is_an_error() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("takeaways.yaml"), "takeaways:\n  sim: 1.5\n");

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("run").write_stdin("Costs rose.\n- Margins shrink\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("takeaways.sim"))
        .stderr(predicate::str::contains("between 0 and 1"));
}

#[test]
fn batch_reports_unreadable_files_inline() {
    let temp = tempdir().unwrap();

    let mut cmd = takeaways_cmd(temp.path());
    cmd.arg("batch")
        .arg(fixture("rewrites/prose.txt"))
        .arg("missing.txt")
        .arg(fixture("rewrites/with_list.txt"));

    let assert = cmd.assert().success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let kinds: Vec<_> = items.iter().map(|v| v["kind"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec![
            "summary", "bullet", "bullet", "bullet", "error", "summary", "bullet", "bullet",
            "bullet", "bullet", "bullet",
        ]
    );
    assert_eq!(items[4]["path"], "missing.txt");
}
