//! fanout's main application entry point.
//! Handles command-line argument parsing, bindings loading, and the write pass.

use fanout::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    logger::init_logger,
    processor::ensure_output_dir,
    write_template_tree,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Validates the output directory
/// 2. Loads bindings files and `--data` overrides
/// 3. Builds the template tree and writes it
/// 4. Prints every written path and a summary
fn run(args: Args) -> Result<()> {
    let output_root = ensure_output_dir(&args.output_dir, args.force)?;
    let bindings = args.load_bindings()?;
    let options = args.generate_options();

    let report = write_template_tree(&args.template, Some(&output_root), bindings, &options)?;

    for path in &report.files_rendered {
        println!("Rendered: '{}'", path.display());
    }
    for path in &report.files_copied {
        println!("Copied: '{}'", path.display());
    }
    for path in &report.render_failures {
        println!("Render failed (diagnostic written): '{}'", path.display());
    }
    for path in &report.overwritten {
        println!("Overwritten by a later node: '{}'", path.display());
    }
    for path in &report.skipped {
        println!("Skipped: '{}'", path.display());
    }

    println!(
        "Template generation completed successfully in {}: {} files written, {} skipped.",
        report.output_dir.display(),
        report.files_written(),
        report.skipped.len()
    );
    Ok(())
}
