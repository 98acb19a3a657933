use std::io;
use std::path::PathBuf;

use fanout::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid bindings".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid bindings.");

    let err = Error::RenderError {
        path: "a.txt.template".to_string(),
        message: "syntax error".to_string(),
    };
    assert_eq!(err.to_string(), "Template error in 'a.txt.template': syntax error.");

    let err = Error::FormatError {
        placeholder: "%00n%".to_string(),
        reason: "zero padding requires an integer, got a string".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cannot format placeholder '%00n%': zero padding requires an integer, got a string."
    );
}

#[test]
fn test_write_error_keeps_source() {
    let err = Error::WriteError {
        path: PathBuf::from("out/a.txt"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(err.to_string(), "Failed to write 'out/a.txt': denied.");
    assert!(std::error::Error::source(&err).is_some());
}
