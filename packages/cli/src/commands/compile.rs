use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use weekly_common::{CampaignSlug, IssuePayload};
use weekly_compiler_html::{CommonMarkCompiler, CompileOptions, SectionCompiler};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Issue payload to compile
    pub issue: PathBuf,

    /// Campaign slug (defaults to the issue's slug)
    #[arg(long)]
    pub slug: Option<String>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let issue_path = Path::new(cwd).join(&args.issue);
    let payload = read_issue(&issue_path)?;
    let slug = CampaignSlug::from_input(args.slug.as_deref().unwrap_or(&payload.slug));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let html = runtime
        .block_on(compile_issue(&payload, &slug, &config))
        .map_err(|e| anyhow!("{}: {}", args.issue.display(), e))?;

    if args.stdout {
        println!("{}", html);
        return Ok(());
    }

    let out_dir = config.get_out_dir(cwd, args.out_dir.as_deref());
    let output_file = write_output(&out_dir, &slug, &html)?;
    println!(
        "  {} {} → {}",
        "✓".green(),
        args.issue.display(),
        output_file.display()
    );

    Ok(())
}

pub fn read_issue(path: &Path) -> Result<IssuePayload> {
    let content = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid issue payload in {}", path.display()))
}

/// Compile every section of `payload` into the issue's HTML
pub async fn compile_issue(payload: &IssuePayload, slug: &CampaignSlug, config: &Config) -> Result<String> {
    let markdown = CommonMarkCompiler::new();
    let compiler = SectionCompiler::new().with_known_tags(config.known_tags.clone());
    let html = compiler
        .compile(&payload.sections, &CompileOptions::new(&markdown, slug))
        .await?;

    info!(%slug, sections = payload.sections.len(), bytes = html.len(), "Issue compiled");
    Ok(html)
}

fn write_output(out_dir: &Path, slug: &CampaignSlug, html: &str) -> Result<PathBuf> {
    let name = if slug.is_empty() { "issue" } else { slug.as_str() };
    let output_file = out_dir.join(name).with_extension("html");

    fs::create_dir_all(out_dir)?;
    fs::write(&output_file, html)?;
    Ok(output_file)
}
