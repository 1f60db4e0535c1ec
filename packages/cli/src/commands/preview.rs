use crate::commands::compile::read_issue;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notify::{Config as WatchConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, warn};
use weekly_common::{IssuePayload, KnownTagCatalog};
use weekly_compiler_html::escape_html;
use weekly_editor::{
    Document, Generation, PreviewFrame, PreviewLoop, PreviewPass, PreviewScheduler,
    PreviewSnapshot, PreviewSurface,
};

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Issue payload to preview
    pub issue: PathBuf,

    /// Recompile whenever the issue file changes
    #[arg(short, long)]
    pub watch: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let issue_path = Path::new(cwd).join(&args.issue);
    let payload = read_issue(&issue_path)?;

    let out_dir = config.get_out_dir(cwd, args.out_dir.as_deref());
    fs::create_dir_all(&out_dir)?;
    let surface = FileSurface::new(out_dir.join("preview.html"));

    println!("{}", "📦 Weekly preview".bright_blue().bold());
    println!("   Issue:   {}", issue_path.display());
    println!("   Preview: {}", surface.path.display());
    println!();

    let editor = config.editor_config();
    let (tx, rx) = mpsc::unbounded_channel();
    let scheduler = PreviewScheduler::new(&editor, Instant::now());
    let preview_loop = PreviewLoop::new(scheduler, PreviewPass::new(&editor), surface, rx);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let feed = async move {
            let mut generation = Generation(1);
            if tx.send(snapshot(&payload, generation, &editor.known_tags)).is_err() {
                return Ok(());
            }
            if args.watch {
                watch_issue(&issue_path, &tx, &mut generation, &editor.known_tags).await?;
            }
            // Dropping the sender lets the loop finish its last pass.
            Ok::<(), anyhow::Error>(())
        };

        let (surface, fed) = tokio::join!(preview_loop.run(), feed);
        fed?;
        println!("✨ {} {} preview(s) written", "Done".green().bold(), surface.written);
        Ok::<(), anyhow::Error>(())
    })
}

/// Preview state for one version of the issue file
pub fn snapshot(payload: &IssuePayload, generation: Generation, known_tags: &KnownTagCatalog) -> PreviewSnapshot {
    let document = Document::hydrate(payload, known_tags.clone());
    PreviewSnapshot {
        generation,
        slug: document.campaign_slug(),
        sections: document.rendered_sections(),
        summary: document.meta().summary.clone(),
    }
}

async fn watch_issue(
    path: &Path,
    tx: &mpsc::UnboundedSender<PreviewSnapshot>,
    generation: &mut Generation,
    known_tags: &KnownTagCatalog,
) -> Result<()> {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                let _ = events_tx.send(event);
            }
            Err(e) => warn!(error = %e, "Watch error"),
        },
        WatchConfig::default(),
    )?;
    watcher.watch(path, RecursiveMode::NonRecursive)?;

    println!("👀 Watching for changes... (Ctrl-C to stop)\n");

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    continue;
                }
                match read_issue(path) {
                    Ok(payload) => {
                        *generation = generation.next();
                        debug!(generation = %generation, "Issue changed");
                        if tx.send(snapshot(&payload, *generation, known_tags)).is_err() {
                            break;
                        }
                    }
                    // Editors often write files in several steps.
                    Err(e) => warn!(error = %e, "Skipping unreadable issue"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

/// Writes each accepted frame to an HTML page
pub struct FileSurface {
    path: PathBuf,
    written: usize,
}

impl FileSurface {
    pub fn new(path: PathBuf) -> Self {
        Self { path, written: 0 }
    }
}

impl PreviewSurface for FileSurface {
    fn render(&mut self, frame: &PreviewFrame) {
        match fs::write(&self.path, render_page(frame)) {
            Ok(()) => {
                self.written += 1;
                match &frame.error {
                    None => println!("  {} Preview {} → {}", "✓".green(), frame.generation, self.path.display()),
                    Some(message) => eprintln!("  {} Preview {} - {}", "✗".red(), frame.generation, message.red()),
                }
            }
            Err(e) => error!(path = %self.path.display(), error = %e, "Cannot write preview"),
        }
    }
}

fn render_page(frame: &PreviewFrame) -> String {
    let titles: String = frame
        .links
        .iter()
        .map(|link| match &link.aria_label {
            Some(label) => format!(r#"<li data-section="{}" aria-label="{}">{}</li>"#, link.id, escape_html(label), link.suffix_html),
            None => format!(r#"<li data-section="{}">{}</li>"#, link.id, link.suffix_html),
        })
        .collect();

    format!(
        concat!(
            "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>Preview {}</title></head>\n<body>\n",
            "<aside class=\"wa-summary\">{}</aside>\n",
            "<ul class=\"wa-link-titles\">{}</ul>\n",
            "<main class=\"wa-preview\">{}</main>\n</body>\n</html>\n",
        ),
        frame.generation, frame.summary_html, titles, frame.body_html
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekly_common::{LinkSection, Section};
    use weekly_editor::LinkDecoration;

    #[test]
    fn test_snapshot_uses_campaign_slug() {
        let payload = IssuePayload {
            slug: "7".to_string(),
            summary: "Sum".to_string(),
            sections: vec![Section::Link(LinkSection::default())],
            ..IssuePayload::default()
        };

        let snapshot = snapshot(&payload, Generation(3), &KnownTagCatalog::builtin());
        assert_eq!(snapshot.generation, Generation(3));
        assert_eq!(snapshot.slug.as_str(), "issue-7");
        assert_eq!(snapshot.sections.len(), 1);
        assert_eq!(snapshot.summary, "Sum");
    }

    #[test]
    fn test_file_surface_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = FileSurface::new(dir.path().join("preview.html"));

        surface.render(&PreviewFrame {
            generation: Generation(2),
            body_html: "<p>body</p>".to_string(),
            error: None,
            summary_html: "<p>summary</p>".to_string(),
            links: vec![LinkDecoration {
                id: weekly_editor::SectionId(4),
                suffix_html: " \u{2013} Title".to_string(),
                aria_label: None,
            }],
        });

        let page = fs::read_to_string(dir.path().join("preview.html")).unwrap();
        assert_eq!(surface.written, 1);
        assert!(page.contains(r#"<main class="wa-preview"><p>body</p></main>"#));
        assert!(page.contains(r#"<aside class="wa-summary"><p>summary</p></aside>"#));
        assert!(page.contains(r#"<li data-section="section-4"> – Title</li>"#));
    }

    #[test]
    fn test_single_preview_without_watch() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(
            dir.path().join("issue.json"),
            r#"{ "slug": "3", "sections": [{ "type": "markdown", "text": "*hi*" }] }"#,
        )
        .unwrap();

        preview(
            PreviewArgs {
                issue: PathBuf::from("issue.json"),
                watch: false,
                out_dir: None,
            },
            cwd,
        )
        .unwrap();

        let page = fs::read_to_string(dir.path().join("dist/preview.html")).unwrap();
        assert!(page.contains("<em>hi</em>"));
    }
}
