//! Integration tests for the PPL analyzer over realistic queries.

use ppl_services::analyzer::PplAnalyzer;

#[test]
fn test_typical_queries_are_valid() {
    let analyzer = PplAnalyzer::new();
    let queries = [
        "source=logs",
        "source = logs",
        "search source=logs",
        "index=web-traffic-stats | head 10",
        "source=logs | where status >= 500 and method = \"GET\"",
        "source=logs | stats count() by host",
        "source=logs | stats avg(latency) as mean_latency by region, host",
        "source=logs | fields host, status | sort - status | head 20",
        "source=logs | dedup host | rename host as server",
        "source=logs | eval latency_s = latency / 1000 | top 5 host",
        "describe logs",
        "show datasources",
    ];
    for query in queries {
        let result = analyzer.validate(query);
        assert!(
            result.is_valid,
            "expected '{}' to be valid, got {:?}",
            query, result.errors
        );
    }
}

#[test]
fn test_broken_queries_are_flagged() {
    let analyzer = PplAnalyzer::new();
    let queries = [
        "frobnicate logs",
        "source logs",
        "source=",
        "source=logs | invalid_command",
        "source=logs |",
        "| where status = 1",
        "source=logs | | head 5",
        "source=logs | where x = \"unterminated",
    ];
    for query in queries {
        let result = analyzer.validate(query);
        assert!(!result.is_valid, "expected '{}' to be invalid", query);
        assert!(!result.errors.is_empty());
    }
}

#[test]
fn test_multiline_query_error_position() {
    let analyzer = PplAnalyzer::new();
    let query = "source=logs\n| stats count() by host\n| badcmd x";
    let result = analyzer.validate(query);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);

    let error = &result.errors[0];
    assert_eq!(error.line, 3);
    assert_eq!(error.column, 2);
    assert!(error.message.contains("mismatched input 'badcmd'"));
}

#[test]
fn test_multiline_tokenize_positions() {
    let analyzer = PplAnalyzer::new();
    let tokens = analyzer.tokenize("source=logs\n| head 5").unwrap();

    let head = tokens.iter().find(|t| t.token_type == "HEAD").unwrap();
    assert_eq!(head.line, 2);
    assert_eq!(head.column, 2);
    // byte offsets keep counting across lines
    assert_eq!(head.start_index, 14);
    assert_eq!(head.stop_index, 17);
}

#[test]
fn test_comments_do_not_affect_validation() {
    let analyzer = PplAnalyzer::new();
    let result = analyzer.validate("source=logs // all of them\n| head 5");
    assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn test_tokenize_keeps_comments() {
    let analyzer = PplAnalyzer::new();
    let tokens = analyzer.tokenize("source=logs // trailing").unwrap();
    assert_eq!(tokens.last().unwrap().token_type, "LINE_COMMENT");
}

#[test]
fn test_function_and_keyword_classification() {
    let analyzer = PplAnalyzer::new();
    let tokens = analyzer
        .tokenize("stats avg(latency), count() by span(timestamp, 1)")
        .unwrap();

    let types: Vec<&str> = tokens.iter().map(|t| t.token_type.as_str()).collect();
    assert!(types.contains(&"STATS"));
    assert!(types.contains(&"AVG"));
    assert!(types.contains(&"COUNT"));
    assert!(types.contains(&"SPAN"));
    assert!(types.contains(&"BY"));
}

#[test]
fn test_validation_result_wire_shape() {
    // the worker serializes this payload; field names are part of the
    // protocol
    let analyzer = PplAnalyzer::new();
    let value = serde_json::to_value(analyzer.validate("source=logs | bogus")).unwrap();

    assert_eq!(value["isValid"], serde_json::json!(false));
    let error = &value["errors"][0];
    assert!(error["message"].is_string());
    assert!(error["line"].is_u64());
    assert!(error["column"].is_u64());
    assert!(error["endLine"].is_u64());
    assert!(error["endColumn"].is_u64());
}

#[test]
fn test_token_wire_shape() {
    let analyzer = PplAnalyzer::new();
    let tokens = analyzer.tokenize("source=logs").unwrap();
    let value = serde_json::to_value(&tokens).unwrap();

    let first = &value[0];
    assert_eq!(first["type"], serde_json::json!("SOURCE"));
    assert_eq!(first["value"], serde_json::json!("source"));
    assert_eq!(first["startIndex"], serde_json::json!(0));
    assert_eq!(first["stopIndex"], serde_json::json!(5));
    assert_eq!(first["line"], serde_json::json!(1));
    assert_eq!(first["column"], serde_json::json!(0));
}
