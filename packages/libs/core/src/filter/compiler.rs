//! 필터 컴파일러
//!
//! 필터 문서를 키 단위 조건 그룹으로 변환하고 싱크에 적용합니다.

use super::document::{FilterDocument, FilterValue};
use super::key_path::KeyPath;
use super::predicate::{CompiledFilter, Join, Predicate, PredicateGroup};
use super::sink::PredicateSink;
use crate::error::{Error, Result};

/// 필터 컴파일러
///
/// 상태가 없으며 호출마다 독립적입니다.
pub struct FilterCompiler;

impl FilterCompiler {
    /// JSON 텍스트를 파싱하여 컴파일
    ///
    /// 파싱 실패 시 싱크는 한 번도 호출되지 않습니다.
    pub fn compile_json<S: PredicateSink>(json: &str, sink: &mut S) -> Result<CompiledFilter> {
        let document = FilterDocument::parse(json)?;
        Self::compile(&document, sink)
    }

    /// 필터 문서 컴파일
    ///
    /// 키마다 최상위 AND 항 하나를 싱크에 추가합니다.
    ///
    /// | 값     | 관계 체인 | 싱크 호출                                   |
    /// |--------|-----------|---------------------------------------------|
    /// | 배열   | 있음      | `group { exists, exists_or, ... }`          |
    /// | 배열   | 없음      | `group { equals, equals_or, ... }`          |
    /// | 스칼라 | 있음      | `relationship_exists { equals }`            |
    /// | 스칼라 | 없음      | `equals`                                    |
    pub fn compile<S: PredicateSink>(
        document: &FilterDocument,
        sink: &mut S,
    ) -> Result<CompiledFilter> {
        let root_tag = sink
            .target()
            .map(str::to_lowercase)
            .ok_or_else(|| Error::InvalidTarget {
                target: "<unbound>".to_string(),
            })?;

        let mut groups = Vec::with_capacity(document.len());

        for (key, value) in document.iter() {
            let path = KeyPath::resolve(key, &root_tag);
            let group = Self::build_group(&path, value);

            if value.is_multi() {
                sink.group(&mut |scope| Self::emit_entries(scope, &group))?;
            } else {
                Self::emit_entries(sink, &group)?;
            }

            groups.push(group);
        }

        tracing::debug!(
            root = %root_tag,
            conjuncts = groups.len(),
            "compiled filter document"
        );

        Ok(CompiledFilter { groups })
    }

    /// 키 하나의 조건 그룹 생성
    ///
    /// 단일 값은 항 하나짜리 그룹이 됩니다.
    fn build_group(path: &KeyPath, value: &FilterValue) -> PredicateGroup {
        PredicateGroup::any(value.values().iter().map(|v| {
            let matcher = Predicate::field(path.field.clone(), v.clone());
            if path.is_local() {
                matcher
            } else {
                Predicate::relationship(path.chain.clone(), PredicateGroup::single(matcher))
            }
        }))
    }

    /// 그룹의 각 항을 현재 스코프에 적용
    fn emit_entries<S: PredicateSink>(sink: &mut S, group: &PredicateGroup) -> Result<()> {
        for (predicate, join) in group.entries() {
            match predicate {
                Predicate::FieldMatch { field, value } => match join {
                    Join::And => sink.equals(field, value)?,
                    Join::Or => sink.equals_or(field, value)?,
                },
                Predicate::RelationshipScoped { chain, inner } => {
                    let mut build = |scope: &mut S| Self::emit_entries(scope, inner);
                    match join {
                        Join::And => sink.relationship_exists(chain, &mut build)?,
                        Join::Or => sink.relationship_exists_or(chain, &mut build)?,
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::document::Scalar;
    use crate::filter::sink::{PredicateTreeSink, SinkNode};

    fn eq(field: &str, value: &str, join: Join) -> SinkNode {
        SinkNode::Equals {
            field: field.to_string(),
            value: Scalar::from(value),
            join,
        }
    }

    #[test]
    fn test_round_trip_scenario() {
        let mut sink = PredicateTreeSink::new("appointment");
        let compiled = FilterCompiler::compile_json(
            r#"{"patient.name": "Carlos", "status": ["confirmed", "unconfirmed"]}"#,
            &mut sink,
        )
        .unwrap();

        assert_eq!(
            sink.nodes(),
            &[
                SinkNode::Exists {
                    chain: vec!["patient".to_string()],
                    join: Join::And,
                    inner: vec![eq("name", "Carlos", Join::And)],
                },
                SinkNode::Group {
                    inner: vec![
                        eq("status", "confirmed", Join::And),
                        eq("status", "unconfirmed", Join::Or),
                    ],
                },
            ]
        );

        assert_eq!(compiled.groups.len(), 2);
        assert_eq!(
            compiled.groups[0],
            PredicateGroup::single(Predicate::relationship(
                vec!["patient".to_string()],
                PredicateGroup::single(Predicate::field("name", Scalar::from("Carlos"))),
            ))
        );
    }

    #[test]
    fn test_multi_value_is_one_conjunct() {
        let mut sink = PredicateTreeSink::new("appointment");
        let compiled = FilterCompiler::compile_json(r#"{"status": ["a", "b"]}"#, &mut sink).unwrap();

        assert_eq!(compiled.groups.len(), 1);
        assert_eq!(sink.nodes().len(), 1);
        assert!(matches!(&sink.nodes()[0], SinkNode::Group { inner } if inner.len() == 2));
    }

    #[test]
    fn test_distinct_keys_are_anded() {
        let mut sink = PredicateTreeSink::new("appointment");
        let compiled =
            FilterCompiler::compile_json(r#"{"status": "a", "city": "x"}"#, &mut sink).unwrap();

        assert_eq!(compiled.groups.len(), 2);
        assert_eq!(
            sink.nodes(),
            &[eq("status", "a", Join::And), eq("city", "x", Join::And)]
        );
    }

    #[test]
    fn test_self_reference_compiles_to_local_equality() {
        let mut sink = PredicateTreeSink::new("Appointment");
        FilterCompiler::compile_json(r#"{"appointment.status": "confirmed"}"#, &mut sink).unwrap();
        assert_eq!(sink.nodes(), &[eq("status", "confirmed", Join::And)]);
    }

    #[test]
    fn test_relationship_or_group() {
        let mut sink = PredicateTreeSink::new("appointment");
        FilterCompiler::compile_json(r#"{"location.city": ["Dallas", "Puerto Vallarta"]}"#, &mut sink)
            .unwrap();

        let chain = vec!["location".to_string()];
        assert_eq!(
            sink.nodes(),
            &[SinkNode::Group {
                inner: vec![
                    SinkNode::Exists {
                        chain: chain.clone(),
                        join: Join::And,
                        inner: vec![eq("city", "Dallas", Join::And)],
                    },
                    SinkNode::Exists {
                        chain,
                        join: Join::Or,
                        inner: vec![eq("city", "Puerto Vallarta", Join::And)],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_multi_hop_chain_passed_verbatim() {
        let mut sink = PredicateTreeSink::new("appointment");
        FilterCompiler::compile_json(r#"{"patient.location.city": "Dallas"}"#, &mut sink).unwrap();

        match &sink.nodes()[0] {
            SinkNode::Exists { chain, .. } => assert_eq!(chain, &vec!["patient", "location"]),
            other => panic!("Expected exists, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_document() {
        let mut sink = PredicateTreeSink::new("appointment");
        let compiled = FilterCompiler::compile_json("{}", &mut sink).unwrap();
        assert!(compiled.is_empty());
        assert!(sink.nodes().is_empty());
    }

    #[test]
    fn test_empty_array_yields_empty_group() {
        let mut sink = PredicateTreeSink::new("appointment");
        let compiled = FilterCompiler::compile_json(r#"{"status": []}"#, &mut sink).unwrap();
        assert_eq!(compiled.groups.len(), 1);
        assert!(compiled.groups[0].is_empty());
        assert_eq!(sink.nodes(), &[SinkNode::Group { inner: vec![] }]);
    }

    #[test]
    fn test_invalid_json_before_any_sink_call() {
        let mut sink = PredicateTreeSink::new("appointment");
        let err = FilterCompiler::compile_json("{bad json", &mut sink).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
        assert!(sink.nodes().is_empty());
    }

    #[test]
    fn test_unbound_sink_is_invalid_target() {
        let mut sink = PredicateTreeSink::unbound();
        let err = FilterCompiler::compile_json(r#"{"status": "a"}"#, &mut sink).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { .. }));
        assert!(sink.nodes().is_empty());
    }
}
