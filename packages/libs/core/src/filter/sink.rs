//! 조건 싱크 계약
//!
//! 컴파일러가 구동하는 외부 쿼리 빌더의 인터페이스입니다.
//! 각 메서드는 현재 스코프에 AND 항(또는 `_or` 변형은 OR 항)을 하나 추가합니다.

use super::document::Scalar;
use super::predicate::Join;
use crate::error::Result;
use crate::schema::SchemaIr;

/// 중첩 스코프 빌더 콜백
pub type ScopeBuilder<'a, S> = &'a mut dyn FnMut(&mut S) -> Result<()>;

/// 조건 싱크
///
/// 실제 쿼리 백엔드(SQL 빌더, 인메모리 필터 등)가 붙는 지점입니다.
pub trait PredicateSink: Sized {
    /// 바인딩된 루트 엔티티 태그 (알 수 없는 엔티티면 None)
    fn target(&self) -> Option<&str>;

    /// 필드 일치 AND 항 추가
    fn equals(&mut self, field: &str, value: &Scalar) -> Result<()>;

    /// 필드 일치 OR 항 추가 (OR 그룹의 두 번째 항부터)
    fn equals_or(&mut self, field: &str, value: &Scalar) -> Result<()>;

    /// 관계 존재 AND 항 추가
    ///
    /// `build`는 관계 대상 엔티티에 바인딩된 새 스코프로 호출됩니다.
    fn relationship_exists(&mut self, chain: &[String], build: ScopeBuilder<'_, Self>) -> Result<()>;

    /// 관계 존재 OR 항 추가
    fn relationship_exists_or(
        &mut self,
        chain: &[String],
        build: ScopeBuilder<'_, Self>,
    ) -> Result<()>;

    /// 격리된 중첩 스코프를 열어 괄호 묶음 하나로 현재 스코프에 AND 결합
    fn group(&mut self, build: ScopeBuilder<'_, Self>) -> Result<()>;
}

/// 트리 싱크가 기록한 노드
#[derive(Debug, Clone, PartialEq)]
pub enum SinkNode {
    Equals {
        field: String,
        value: Scalar,
        join: Join,
    },
    Exists {
        chain: Vec<String>,
        join: Join,
        inner: Vec<SinkNode>,
    },
    Group {
        inner: Vec<SinkNode>,
    },
}

/// 호출을 트리로 기록하는 싱크
///
/// 실행 백엔드 없이 컴파일 결과를 확인할 때 사용합니다 (테스트, CLI explain).
#[derive(Debug, Clone, Default)]
pub struct PredicateTreeSink {
    target: Option<String>,
    nodes: Vec<SinkNode>,
}

impl PredicateTreeSink {
    /// 엔티티 태그에 바인딩된 싱크
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            nodes: Vec::new(),
        }
    }

    /// 어떤 엔티티에도 바인딩되지 않은 싱크
    pub fn unbound() -> Self {
        Self::default()
    }

    /// 스키마에 존재하는 엔티티일 때만 바인딩
    pub fn for_schema(schema: &SchemaIr, tag: &str) -> Self {
        Self {
            target: schema.get_entity(tag).map(|e| e.tag.clone()),
            nodes: Vec::new(),
        }
    }

    /// 기록된 노드
    pub fn nodes(&self) -> &[SinkNode] {
        &self.nodes
    }

    fn scoped(
        &self,
        target: Option<String>,
        build: ScopeBuilder<'_, Self>,
    ) -> Result<Vec<SinkNode>> {
        let mut child = Self {
            target,
            nodes: Vec::new(),
        };
        build(&mut child)?;
        Ok(child.nodes)
    }

    fn push_exists(&mut self, chain: &[String], join: Join, build: ScopeBuilder<'_, Self>) -> Result<()> {
        let inner = self.scoped(chain.last().cloned(), build)?;
        self.nodes.push(SinkNode::Exists {
            chain: chain.to_vec(),
            join,
            inner,
        });
        Ok(())
    }
}

impl PredicateSink for PredicateTreeSink {
    fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn equals(&mut self, field: &str, value: &Scalar) -> Result<()> {
        self.nodes.push(SinkNode::Equals {
            field: field.to_string(),
            value: value.clone(),
            join: Join::And,
        });
        Ok(())
    }

    fn equals_or(&mut self, field: &str, value: &Scalar) -> Result<()> {
        self.nodes.push(SinkNode::Equals {
            field: field.to_string(),
            value: value.clone(),
            join: Join::Or,
        });
        Ok(())
    }

    fn relationship_exists(&mut self, chain: &[String], build: ScopeBuilder<'_, Self>) -> Result<()> {
        self.push_exists(chain, Join::And, build)
    }

    fn relationship_exists_or(
        &mut self,
        chain: &[String],
        build: ScopeBuilder<'_, Self>,
    ) -> Result<()> {
        self.push_exists(chain, Join::Or, build)
    }

    fn group(&mut self, build: ScopeBuilder<'_, Self>) -> Result<()> {
        let inner = self.scoped(self.target.clone(), build)?;
        self.nodes.push(SinkNode::Group { inner });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_sink_records_nesting() {
        let mut sink = PredicateTreeSink::new("appointment");
        sink.equals("status", &Scalar::from("a")).unwrap();
        sink.group(&mut |g| {
            g.equals("city", &Scalar::from("x"))?;
            g.equals_or("city", &Scalar::from("y"))
        })
        .unwrap();
        sink.relationship_exists(&["patient".to_string()], &mut |r| {
            assert_eq!(r.target(), Some("patient"));
            r.equals("name", &Scalar::from("Carlos"))
        })
        .unwrap();

        assert_eq!(sink.nodes().len(), 3);
        match &sink.nodes()[1] {
            SinkNode::Group { inner } => {
                assert_eq!(inner.len(), 2);
                assert!(matches!(inner[1], SinkNode::Equals { join: Join::Or, .. }));
            }
            other => panic!("Expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_for_schema_binding() {
        let mut schema = SchemaIr::new();
        schema.add_entity(crate::schema::Entity::new("appointment", "appointments"));

        assert_eq!(
            PredicateTreeSink::for_schema(&schema, "Appointment").target(),
            Some("appointment")
        );
        assert_eq!(PredicateTreeSink::for_schema(&schema, "invoice").target(), None);
        assert_eq!(PredicateTreeSink::unbound().target(), None);
    }
}
