use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use geotrawl_core::links::map_links;
use geotrawl_core::pipeline::PipelineProgressCallback;
use geotrawl_core::run::{RendererKind, RunOptions, execute_run, generate_run_report};
use geotrawl_core::RecordStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::info;

// Helper functions for run handler

/// Expand a leading `~` in a path argument
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Load hosts from a JSON array of strings, or from one host per line
pub fn load_hosts_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let raw: Vec<String> = if content.trim_start().starts_with('[') {
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse hosts file {}: {}", path.display(), e))?
    } else {
        content.lines().map(str::to_string).collect()
    };

    let hosts: Vec<String> = raw
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_host_line)
        .collect();

    if hosts.is_empty() {
        return Err(format!("No valid hosts found in {}", path.display()));
    }

    Ok(hosts)
}

/// Normalise one host entry to `domain[/path]` without a scheme
pub fn parse_host_line(line: &str) -> Option<String> {
    let line = line.trim();
    let without_scheme = line
        .strip_prefix("https://")
        .or_else(|| line.strip_prefix("http://"))
        .unwrap_or(line);
    let host = without_scheme.trim_end_matches('/');

    if host.is_empty() || host.contains(char::is_whitespace) {
        eprintln!("⚠️  Skipping invalid host '{}'", line);
        return None;
    }

    Some(host.to_string())
}

/// Browser command used by `open` when none is given
pub fn default_browser_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "cmd /C start"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

fn open_in_browser(browser: &str, url: &str) -> anyhow::Result<()> {
    let mut parts = browser.split_whitespace();
    let program = parts.next().context("browser command is empty")?;
    Command::new(program)
        .args(parts)
        .arg(url)
        .spawn()
        .with_context(|| format!("Error opening URL {}", url))?;
    Ok(())
}

pub async fn handle_run(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let hosts_file = sub_matches
        .get_one::<String>("hosts-file")
        .map(|p| expand_path(p))
        .context("--hosts-file is required")?;
    let store_path = sub_matches
        .get_one::<String>("store")
        .map(|p| expand_path(p))
        .unwrap_or_else(|| PathBuf::from(geotrawl_core::store::DEFAULT_STORE_PATH));
    let image_root = sub_matches
        .get_one::<String>("image-dir")
        .map(|p| expand_path(p))
        .unwrap_or_else(|| PathBuf::from(geotrawl_core::pipeline::DEFAULT_IMAGE_ROOT));
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&30);
    let exiftool = sub_matches
        .get_one::<String>("exiftool")
        .cloned()
        .unwrap_or_else(|| "exiftool".to_string());
    let renderer = if sub_matches.get_flag("chrome") {
        RendererKind::Chrome
    } else {
        RendererKind::Http
    };
    let show_progress_bars = !sub_matches.get_flag("no-progress");

    let hosts = match load_hosts_from_file(&hosts_file) {
        Ok(hosts) => hosts,
        Err(e) => bail!(e),
    };
    info!("Loaded {} host(s) from {}", hosts.len(), hosts_file.display());

    println!("\n🛰️  Processing {} host(s)", hosts.len());
    println!("Store: {}", store_path.display());
    println!("Images: {}", image_root.display());
    println!("Renderer: {}", renderer.as_str());
    println!("Metadata reader: {}\n", exiftool);

    let options = RunOptions {
        hosts,
        store_path,
        image_root,
        timeout_secs,
        exiftool,
        renderer,
        show_progress_bars,
    };

    let progress_callback: PipelineProgressCallback = Arc::new(|msg: String| {
        println!("{}", msg);
    });

    let outcomes = execute_run(options, Some(progress_callback))
        .await
        .context("Run failed")?;

    println!("\n{} Run complete!\n", "✓".green().bold());
    print!("{}", generate_run_report(&outcomes));
    Ok(())
}

pub fn handle_open(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let store_path = sub_matches
        .get_one::<String>("store")
        .map(|p| expand_path(p))
        .unwrap_or_else(|| PathBuf::from(geotrawl_core::store::DEFAULT_STORE_PATH));
    let browser = sub_matches
        .get_one::<String>("browser")
        .map(String::as_str)
        .unwrap_or_else(|| default_browser_command());
    let print_only = sub_matches.get_flag("print");

    let store = RecordStore::new(&store_path);
    if !store.exists() {
        bail!("Record store {} does not exist", store_path.display());
    }

    let links = map_links(&store.load_or_empty());
    if links.is_empty() {
        println!("{} No map links in {}", "→".blue(), store_path.display());
        return Ok(());
    }

    for link in &links {
        if print_only {
            println!("{}", link);
            continue;
        }
        if let Err(e) = open_in_browser(browser, link) {
            eprintln!("{} {:#}", "✗".red().bold(), e);
        }
    }

    if !print_only {
        println!(
            "{} Opened {} link(s) with {}",
            "✓".green().bold(),
            links.len(),
            browser.bright_white()
        );
    }
    Ok(())
}
