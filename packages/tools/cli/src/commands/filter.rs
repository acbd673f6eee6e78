//! Filter 관련 명령어

use std::path::Path;

use anyhow::Context;
use gk_core::filter::{FilterCompiler, Join, PredicateTreeSink, SinkNode};
use gk_sql::SelectBuilder;
use serde_json::{json, Value};

use crate::config::CliConfig;
use crate::OutputFormat;

/// 필터를 SQL + 바인딩으로 컴파일
pub fn compile(
    config: &CliConfig,
    entity: &str,
    filter: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let schema = config.load_schema()?;
    let builder = SelectBuilder::new(&schema, entity)?;
    let query = builder.build_json(filter)?;

    match format {
        OutputFormat::Text => {
            println!("{}", query.sql);
            for (i, binding) in query.bindings.iter().enumerate() {
                println!("  ${} = {}", i + 1, binding);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&query)?),
    }

    Ok(())
}

/// 필터가 싱크에 가하는 호출을 트리로 출력
pub fn explain(
    config: &CliConfig,
    entity: &str,
    filter: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let schema = config.load_schema()?;
    let mut sink = PredicateTreeSink::for_schema(&schema, entity);
    let compiled = FilterCompiler::compile_json(filter, &mut sink)?;
    let tree = render_tree(sink.nodes());

    match format {
        OutputFormat::Text => {
            println!("{}", compiled);
            println!();
            for line in &tree {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let out = json!({
                "entity": entity,
                "predicate": compiled.to_string(),
                "tree": tree,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

/// JSON 레코드 파일에 필터를 인메모리로 적용
pub fn match_records(
    config: &CliConfig,
    entity: &str,
    filter: &str,
    records_path: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let schema = config.load_schema()?;
    let records = load_records(records_path)?;

    let mut sink = PredicateTreeSink::for_schema(&schema, entity);
    let compiled = FilterCompiler::compile_json(filter, &mut sink)?;
    let matched = compiled.filter(&records);

    tracing::debug!(total = records.len(), matched = matched.len(), "matched records");

    match format {
        OutputFormat::Text => {
            for record in &matched {
                println!("{}", record);
            }
            println!("{} of {} record(s) matched", matched.len(), records.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matched)?),
    }

    Ok(())
}

fn load_records(path: &Path) -> anyhow::Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records from {}", path.display()))?;
    parse_records(&content)
}

/// 레코드 배열 또는 단일 객체
fn parse_records(content: &str) -> anyhow::Result<Vec<Value>> {
    match serde_json::from_str(content)? {
        Value::Array(items) => Ok(items),
        object @ Value::Object(_) => Ok(vec![object]),
        _ => anyhow::bail!("Records file must contain a JSON array or object"),
    }
}

/// 싱크 노드를 들여쓰기된 줄 목록으로 변환
fn render_tree(nodes: &[SinkNode]) -> Vec<String> {
    let mut lines = Vec::new();
    render_nodes(nodes, 0, &mut lines);
    lines
}

fn render_nodes(nodes: &[SinkNode], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match node {
            SinkNode::Equals { field, value, join } => {
                lines.push(format!("{}{} {} == {}", indent, join_label(*join), field, value));
            }
            SinkNode::Exists { chain, join, inner } => {
                lines.push(format!("{}{} EXISTS {}", indent, join_label(*join), chain.join(".")));
                render_nodes(inner, depth + 1, lines);
            }
            SinkNode::Group { inner } => {
                lines.push(format!("{}AND GROUP", indent));
                render_nodes(inner, depth + 1, lines);
            }
        }
    }
}

fn join_label(join: Join) -> &'static str {
    match join {
        Join::And => "AND",
        Join::Or => "OR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tree() {
        let mut sink = PredicateTreeSink::new("appointment");
        FilterCompiler::compile_json(
            r#"{"patient.name": "Carlos", "status": ["confirmed", "unconfirmed"]}"#,
            &mut sink,
        )
        .unwrap();

        assert_eq!(
            render_tree(sink.nodes()),
            vec![
                "AND EXISTS patient",
                r#"  AND name == "Carlos""#,
                "AND GROUP",
                r#"  AND status == "confirmed""#,
                r#"  OR status == "unconfirmed""#,
            ]
        );
    }

    #[test]
    fn test_parse_records() {
        assert_eq!(parse_records(r#"[{"id": 1}, {"id": 2}]"#).unwrap().len(), 2);
        assert_eq!(parse_records(r#"{"id": 1}"#).unwrap().len(), 1);
        assert!(parse_records("42").is_err());
        assert!(parse_records("not json").is_err());
    }
}
