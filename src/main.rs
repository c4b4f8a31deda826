use anyhow::{Context, Result};
use refmark::{
    Command, Config, Issue, MarkdownHelper, MarkdownRenderer, MergeRequest, Project,
    cross_reference, preview_page, truncate_visible,
};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Reads command input from file, or stdin when no file is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Formats reference of the requested issue or merge request.
fn reference_output(project: &Project, issue: Option<u64>, merge_request: Option<u64>) -> String {
    match (issue, merge_request) {
        (Some(iid), _) => cross_reference(project, &Issue { iid }),
        (None, Some(iid)) => cross_reference(project, &MergeRequest { iid }),
        (None, None) => String::new(),
    }
}

fn run(config: &Config) -> Result<String> {
    let context = config.render_context()?;
    let renderer = if config.trusted {
        MarkdownRenderer::trusted()
    } else {
        MarkdownRenderer::new()
    };
    let helper = MarkdownHelper::new(renderer);
    let input = config.input().map(|p| p.as_path());

    match &config.command {
        Command::Render { .. } => {
            let text = read_input(input)?;
            helper.markdown(&text, &context)
        }
        Command::Excerpt { max_chars, .. } => {
            let text = read_input(input)?;
            helper.first_line_in_markdown(&text, *max_chars, &context)
        }
        Command::Truncate { max_chars, .. } => {
            let html = read_input(input)?;
            truncate_visible(html.trim(), *max_chars)
        }
        Command::Link { url, .. } => {
            let text = read_input(input)?;
            let markup = helper.link_to_gfm(text.trim(), url, &config.link_options(), &context)?;
            Ok(markup.into_string())
        }
        Command::Reference {
            issue,
            merge_request,
        } => {
            let project = context
                .project
                .as_ref()
                .context("Reference command requires --project")?;
            Ok(reference_output(project, *issue, *merge_request))
        }
    }
}

fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    config.validate().context("Invalid configuration")?;
    debug!(command = ?config.command, "running");

    let output = run(&config)?;

    if config.page {
        let title = config.project.as_deref().unwrap_or("Preview");
        println!("{}", preview_page(title, &output).into_string());
    } else {
        println!("{}", output);
    }

    Ok(())
}
