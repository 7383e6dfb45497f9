//! Tests for core error types

use scdgraph::GraphError;

#[test]
fn test_invalid_token() {
    let error = GraphError::invalid_token("abc");
    let error_msg = format!("{}", error);
    assert_eq!(
        error_msg,
        "Invalid entry 'abc'. Use numbers or 'x'/'-'/'na' for missing."
    );
}

#[test]
fn test_invalid_config() {
    let error = GraphError::invalid_config("x_tick must be positive");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Invalid configuration"));
    assert!(error_msg.contains("x_tick must be positive"));
}

#[test]
fn test_invalid_color() {
    let error = GraphError::invalid_color("#12");
    assert!(error.to_string().contains("#12"));
}

#[test]
fn test_export_error() {
    let error = GraphError::export_error("PNG encoding failed");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Export error"));
    assert!(error_msg.contains("PNG encoding failed"));
}

#[test]
fn test_error_debug() {
    let error = GraphError::invalid_token("zz");
    let debug_str = format!("{:?}", error);
    assert!(debug_str.contains("InvalidSeriesToken"));
}

#[test]
fn test_io_error_source() {
    use std::error::Error;
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: GraphError = io_err.into();
    assert!(error.source().is_some());
    assert!(error.to_string().contains("denied"));
}
