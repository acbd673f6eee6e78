//! Policy 관련 명령어

use std::path::Path;

use anyhow::Context;
use gk_core::policy::{ActionGate, AttributeBag, Operator, RuleEvaluator};
use serde_json::{json, Value};

use crate::config::CliConfig;
use crate::OutputFormat;

/// 주체 파일로 액션 허용 여부 확인
///
/// # Returns
/// 허용 여부 (종료 코드 결정용)
pub fn check(
    config: &CliConfig,
    action: &str,
    subject_path: &Path,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let subject = load_subject(subject_path)?;
    let gate = ActionGate::new(RuleEvaluator::new(config.rule_store()));
    let decision = gate.check(action, Some(&subject));

    match format {
        OutputFormat::Text => {
            let verdict = if decision.allowed { "allowed" } else { "denied" };
            match &decision.reason {
                Some(reason) => println!("{}: {} ({})", verdict, action, reason),
                None => println!("{}: {}", verdict, action),
            }
        }
        OutputFormat::Json => {
            let out = json!({
                "action": action,
                "allowed": decision.allowed,
                "reason": decision.reason,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(decision.allowed)
}

/// 지원 연산자 목록
pub fn operators(format: OutputFormat) -> anyhow::Result<()> {
    let tokens: Vec<&str> = Operator::ALL.iter().map(|op| op.token()).collect();

    match format {
        OutputFormat::Text => {
            for token in tokens {
                println!("{}", token);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tokens)?),
    }

    Ok(())
}

fn load_subject(path: &Path) -> anyhow::Result<AttributeBag> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read subject from {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    parse_subject(&content, is_json)
}

/// 주체 문서 파싱 (JSON 또는 YAML 객체)
fn parse_subject(content: &str, is_json: bool) -> anyhow::Result<AttributeBag> {
    let value: Value = if is_json {
        serde_json::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };
    AttributeBag::from_value(value)
        .ok_or_else(|| anyhow::anyhow!("Subject file must contain an object of attributes"))
}
