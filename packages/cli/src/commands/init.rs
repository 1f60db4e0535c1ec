use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use weekly_common::{
    HeaderSection, IssuePayload, LinkSection, MarkdownSection, Section, DEFAULT_SOURCE_HREF,
};

pub const EXAMPLE_ISSUE_NAME: &str = "issue.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Output directory for compiled issues
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing weekly...".bright_blue().bold());

    let example_file = PathBuf::from(cwd).join(EXAMPLE_ISSUE_NAME);
    if !example_file.exists() {
        fs::write(&example_file, serde_json::to_string_pretty(&example_issue())?)?;
        println!("  {} Created {}", "✓".green(), EXAMPLE_ISSUE_NAME);
    }

    let config = Config {
        out_dir: args.out_dir.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Weekly initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", EXAMPLE_ISSUE_NAME);
    println!("  2. Run: weekly preview {} --watch", EXAMPLE_ISSUE_NAME);
    println!("  3. Run: weekly compile {}", EXAMPLE_ISSUE_NAME);

    Ok(())
}

fn example_issue() -> IssuePayload {
    IssuePayload {
        slug: "1".to_string(),
        summary: "The **first** issue".to_string(),
        sections: vec![
            Section::Header(HeaderSection {
                text: "This week".to_string(),
                foreground: "#fff".to_string(),
                background: "#2d2d2d".to_string(),
                ..HeaderSection::default()
            }),
            Section::Markdown(MarkdownSection {
                text: "Welcome to the *first* issue.".to_string(),
            }),
            Section::Link(LinkSection {
                title: "An interesting article".to_string(),
                href: "https://example.com/article".to_string(),
                foreground: "#2d2d2d".to_string(),
                source: "@example".to_string(),
                source_href: DEFAULT_SOURCE_HREF.to_string(),
                description: "Why you should read it.".to_string(),
                tags: vec!["javascript".to_string()],
                ..LinkSection::default()
            }),
        ],
        ..IssuePayload::default()
    }
}
