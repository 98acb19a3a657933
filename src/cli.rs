//! Command-line interface implementation for fanout.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::bindings::{load_bindings_file, parse_assignment, Bindings};
use crate::error::Result;
use crate::processor::GenerateOptions;
use crate::renderer::RenderErrorPolicy;
use crate::tree::{TreeOptions, UnboundPlaceholderPolicy};

/// Command-line arguments structure for fanout.
#[derive(Parser, Debug)]
#[command(author, version, about = "fanout: clone a template tree, one file per value combination", long_about = None)]
pub struct Args {
    /// Template directory (or single template file)
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Directory where the generated tree will be written
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// JSON or YAML file with variable bindings (can be repeated, later files win)
    #[arg(short, long = "bindings", value_name = "FILE")]
    pub bindings: Vec<PathBuf>,

    /// Bind a variable (can be repeated: -d chap_count=1..20)
    #[arg(short, long = "data", value_name = "KEY=VALUE")]
    pub data: Vec<String>,

    /// Force writing into an existing output directory
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// What to do when a template fails to render
    #[arg(long, value_enum, default_value_t = RenderErrorPolicy::Embed)]
    pub on_render_error: RenderErrorPolicy,

    /// Fail when a filename placeholder names an unbound variable
    /// instead of keeping the placeholder text in the output path.
    #[arg(long)]
    pub strict_placeholders: bool,

    /// Filename suffix marking files to render (can be repeated; replaces the defaults)
    #[arg(long = "suffix", value_name = "SUFFIX")]
    pub suffixes: Vec<String>,
}

impl Args {
    /// Collects bindings from every `--bindings` file, then every `--data` override.
    pub fn load_bindings(&self) -> Result<Bindings> {
        let mut bindings = Bindings::new();
        for path in &self.bindings {
            bindings.extend(load_bindings_file(path)?);
        }
        for assignment in &self.data {
            let (key, value) = parse_assignment(assignment)?;
            bindings.insert(key, value);
        }
        Ok(bindings)
    }

    pub fn generate_options(&self) -> GenerateOptions {
        let mut tree = TreeOptions::default();
        if !self.suffixes.is_empty() {
            tree.template_suffixes = self.suffixes.clone();
        }
        if self.strict_placeholders {
            tree.unbound_placeholders = UnboundPlaceholderPolicy::Strict;
        }
        GenerateOptions {
            tree,
            on_render_error: self.on_render_error,
        }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
