use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weekly_common::{
    CampaignSlug, HeaderSection, LinkSection, MarkdownSection, Section, StylesSection,
};
use weekly_compiler_html::{link_through, CommonMarkCompiler, CompileOptions, SectionCompiler};

fn issue(links: usize) -> Vec<Section> {
    let mut sections = vec![
        Section::Styles(StylesSection {
            styles: ".wy-section-header\n  font-weight bold\n  a\n    color inherit\n".to_string(),
        }),
        Section::Header(HeaderSection {
            text: "This week in **front-end**".to_string(),
            foreground: "#1a1a1a".to_string(),
            background: "#ffd".to_string(),
            ..HeaderSection::default()
        }),
        Section::Markdown(MarkdownSection {
            text: "Welcome back! Here's what [we read](https://ponyfoo.com/articles).".to_string(),
        }),
    ];

    for i in 0..links {
        sections.push(Section::Link(LinkSection {
            title: format!("Link number *{}*", i),
            href: format!("https://example.com/posts/{}?ref=weekly", i),
            source: "@ponyfoo".to_string(),
            source_href: "https://twitter.com/ponyfoo".to_string(),
            tags: vec!["css".to_string(), "performance".to_string()],
            description: "A short description with a [link](https://example.org/).".to_string(),
            ..LinkSection::default()
        }));
    }
    sections
}

fn compile_issue(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let compiler = SectionCompiler::new();
    let slug = CampaignSlug::new("120");
    let markdown = CommonMarkCompiler;
    let sections = issue(30);

    c.bench_function("compile_issue_30_links", |b| {
        b.iter(|| {
            let options = CompileOptions::new(&markdown, &slug);
            runtime.block_on(compiler.compile(black_box(&sections), &options))
        })
    });
}

fn rewrite_links(c: &mut Criterion) {
    let slug = CampaignSlug::new("120");

    c.bench_function("link_through", |b| {
        b.iter(|| {
            link_through(
                black_box("https://example.com/a?utm_source=x&page=2&q=c%2B%2B#top"),
                &slug,
            )
        })
    });
}

criterion_group!(benches, compile_issue, rewrite_links);
criterion_main!(benches);
