//! Command line configuration.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::context::RenderContext;
use crate::link_wrap::LinkOptions;
use crate::reference::Project;

/// Command line configuration for refmark.
#[derive(Debug, Clone, Parser)]
#[command(name = "refmark", version, about, long_about = None)]
pub struct Config {
    /// Project the content belongs to (namespace/path)
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// Git reference used for relative links
    #[arg(long = "ref", global = true)]
    pub git_ref: Option<String>,

    /// Repository path of the rendered document
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// User the content is rendered for
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Pass raw HTML in markdown through unescaped
    #[arg(long, global = true)]
    pub trusted: bool,

    /// Wrap output in a standalone HTML page
    #[arg(long, global = true)]
    pub page: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Operation to run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render markdown to HTML
    Render {
        /// Markdown file (stdin when omitted)
        input: Option<PathBuf>,
    },
    /// Render markdown and keep only its first line
    Excerpt {
        /// Markdown file (stdin when omitted)
        input: Option<PathBuf>,

        /// Visible character budget
        #[arg(short, long)]
        max_chars: Option<usize>,
    },
    /// Truncate an HTML fragment to a visible character budget
    Truncate {
        /// HTML file (stdin when omitted)
        input: Option<PathBuf>,

        /// Visible character budget
        #[arg(short, long)]
        max_chars: usize,
    },
    /// Render one line of markdown as a link
    Link {
        /// Markdown file (stdin when omitted)
        input: Option<PathBuf>,

        /// Link target
        #[arg(long)]
        url: String,

        /// Class for inserted and generated reference links
        #[arg(long)]
        class: Option<String>,
    },
    /// Print cross-project reference for an issue or merge request
    Reference {
        /// Issue id
        #[arg(long, conflicts_with = "merge_request")]
        issue: Option<u64>,

        /// Merge request id
        #[arg(long)]
        merge_request: Option<u64>,
    },
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an input file does not exist, the project is not a
    /// `namespace/path` pair, or a reference is requested without a project
    /// and entity.
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = self.input()
            && !input.exists()
        {
            bail!("Input file does not exist: {}", input.display());
        }

        let project = self.project()?;

        if let Command::Reference {
            issue,
            merge_request,
        } = &self.command
        {
            if project.is_none() {
                bail!("Reference command requires --project");
            }
            if issue.is_none() && merge_request.is_none() {
                bail!("Reference command requires --issue or --merge-request");
            }
        }

        Ok(())
    }

    /// Returns input file of the selected command, if any.
    pub fn input(&self) -> Option<&PathBuf> {
        match &self.command {
            Command::Render { input }
            | Command::Excerpt { input, .. }
            | Command::Truncate { input, .. }
            | Command::Link { input, .. } => input.as_ref(),
            Command::Reference { .. } => None,
        }
    }

    /// Returns configured project.
    ///
    /// # Errors
    ///
    /// Returns error if the project is not a `namespace/path` pair.
    pub fn project(&self) -> Result<Option<Project>> {
        self.project
            .as_deref()
            .map(|full_path| {
                Project::parse(full_path)
                    .with_context(|| format!("Project must be namespace/path: {}", full_path))
            })
            .transpose()
    }

    /// Builds render context from global options.
    ///
    /// # Errors
    ///
    /// Returns error if the project is invalid.
    pub fn render_context(&self) -> Result<RenderContext> {
        Ok(RenderContext {
            project: self.project()?,
            current_user: self.user.clone(),
            requested_path: self.path.clone(),
            git_ref: self.git_ref.clone(),
            ..RenderContext::default()
        })
    }

    /// Returns link options of the link command.
    pub fn link_options(&self) -> LinkOptions {
        match &self.command {
            Command::Link {
                class: Some(class), ..
            } => LinkOptions::new().with_class(class.as_str()),
            _ => LinkOptions::new(),
        }
    }

    /// Returns tracing filter directive for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
