//! Common constants used throughout fanout.

/// Filename suffixes marking a file whose content is rendered before it is written.
pub const TEMPLATE_SUFFIXES: [&str; 2] = [".template", ".fwtemplate"];

/// Delimiter that opens and closes a filename placeholder.
pub const PLACEHOLDER_DELIMITER: char = '%';

/// Key of the single-entry mapping that declares an integer range in a bindings file.
pub const RANGE_KEY: &str = "$range";

/// First line of the payload written in place of a template that failed to render.
pub const RENDER_ERROR_HEADER: &str = "fanout: template render error";
