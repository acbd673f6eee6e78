//! SQL 조건 싱크
//!
//! 필터 컴파일러의 호출을 SeaQuery `Condition`으로 누적합니다.
//!
//! - 필드 일치: `"<alias>"."<field>" = $n`
//! - 관계 존재: 홉마다 상관 서브쿼리 하나 (`EXISTS (SELECT 1 FROM ... AS "r1" WHERE <join> AND ...)`)
//!
//! 홉 별칭(`r1`, `r2`, ...)은 컴파일 한 번 안에서 유일하므로 자기 참조 관계도 모호하지 않습니다.

use gk_core::filter::{PredicateSink, Scalar, ScopeBuilder};
use gk_core::schema::{Entity, Relation, SchemaIr};
use gk_core::{Error, Result};
use sea_query::{Condition, Expr, IntoCondition, JoinType, Query, SelectStatement, SimpleExpr};

use crate::value::{scalar_to_value, DynIden};

/// SeaQuery 조건 싱크
pub struct SqlConditionSink<'a> {
    schema: &'a SchemaIr,
    entity: Option<&'a Entity>,
    alias: String,
    /// OR로 결합되는 AND 묶음들
    disjuncts: Vec<Condition>,
    next_alias: usize,
}

/// 관계 체인의 한 홉
struct Hop<'a> {
    relation: &'a Relation,
    table: &'a str,
    parent_alias: String,
    alias: String,
}

impl<'a> SqlConditionSink<'a> {
    /// 루트 엔티티에 바인딩된 싱크 생성
    ///
    /// 스키마에 없는 태그면 바인딩되지 않은 싱크가 되며, 컴파일 시 `InvalidTarget`이 됩니다.
    pub fn new(schema: &'a SchemaIr, tag: &str) -> Self {
        let entity = schema.get_entity(tag);
        Self {
            schema,
            entity,
            alias: entity.map(|e| e.table.clone()).unwrap_or_default(),
            disjuncts: Vec::new(),
            next_alias: 1,
        }
    }

    /// 누적된 조건 (AND가 OR보다 먼저 결합)
    pub fn into_condition(self) -> Condition {
        if self.disjuncts.len() <= 1 {
            return self.disjuncts.into_iter().next().unwrap_or_else(Condition::all);
        }
        self.disjuncts
            .into_iter()
            .fold(Condition::any(), |any, all| any.add(all))
    }

    fn scope(&self, entity: &'a Entity, alias: String) -> Self {
        Self {
            schema: self.schema,
            entity: Some(entity),
            alias,
            disjuncts: Vec::new(),
            next_alias: self.next_alias,
        }
    }

    fn bound(&self) -> Result<&'a Entity> {
        self.entity.ok_or_else(|| Error::InvalidTarget {
            target: "<unbound>".to_string(),
        })
    }

    fn and(&mut self, condition: impl IntoCondition) {
        let condition = condition.into_condition();
        if condition.is_empty() {
            return;
        }
        let current = self.disjuncts.pop().unwrap_or_else(Condition::all);
        self.disjuncts.push(current.add(condition));
    }

    fn or(&mut self, condition: impl IntoCondition) {
        self.disjuncts.push(Condition::all().add(condition.into_condition()));
    }

    fn field_equals(&self, field: &str, value: &Scalar) -> Result<SimpleExpr> {
        let entity = self.bound()?;
        if !entity.has_column(field) {
            return Err(Error::UnknownField {
                entity: entity.tag.clone(),
                field: field.to_string(),
            });
        }
        Ok(Expr::col((DynIden::new(&self.alias), DynIden::new(field))).eq(scalar_to_value(value)))
    }

    /// 관계 체인을 중첩 EXISTS 서브쿼리로 변환
    fn exists(&mut self, chain: &[String], build: ScopeBuilder<'_, Self>) -> Result<SimpleExpr> {
        let mut parent = self.bound()?;
        let mut parent_alias = self.alias.clone();
        let mut next_alias = self.next_alias;
        let mut hops = Vec::with_capacity(chain.len());

        for segment in chain {
            let (relation, target) = self.schema.resolve_relation(&parent.tag, segment)?;
            let alias = format!("r{}", next_alias);
            next_alias += 1;

            hops.push(Hop {
                relation,
                table: &target.table,
                parent_alias,
                alias: alias.clone(),
            });
            parent = target;
            parent_alias = alias;
        }

        let Some((outer, rest)) = hops.split_first() else {
            return Err(Error::invalid_input("empty relationship chain"));
        };

        let mut scope = self.scope(parent, parent_alias);
        scope.next_alias = next_alias;
        build(&mut scope)?;
        self.next_alias = scope.next_alias;

        let mut inner = scope.into_condition();
        for hop in rest.iter().rev() {
            inner = Condition::all().add(Expr::exists(hop.subquery(inner)));
        }
        Ok(Expr::exists(outer.subquery(inner)))
    }
}

impl Hop<'_> {
    fn subquery(&self, inner: Condition) -> SelectStatement {
        let alias = self.alias.as_str();
        let parent = self.parent_alias.as_str();

        let mut query = Query::select();
        query
            .expr(Expr::cust("1"))
            .from_as(DynIden::new(self.table), DynIden::new(alias));

        let correlation = match self.relation {
            Relation::BelongsTo {
                foreign_key,
                owner_key,
                ..
            } => column(alias, owner_key).equals((DynIden::new(parent), DynIden::new(foreign_key))),
            Relation::HasMany {
                foreign_key,
                local_key,
                ..
            } => column(alias, foreign_key).equals((DynIden::new(parent), DynIden::new(local_key))),
            Relation::BelongsToMany {
                pivot,
                foreign_pivot_key,
                related_pivot_key,
                parent_key,
                related_key,
                ..
            } => {
                let pivot_alias = format!("{}_pivot", alias);
                query.join_as(
                    JoinType::InnerJoin,
                    DynIden::new(pivot),
                    DynIden::new(&pivot_alias),
                    column(&pivot_alias, related_pivot_key)
                        .equals((DynIden::new(alias), DynIden::new(related_key))),
                );
                column(&pivot_alias, foreign_pivot_key)
                    .equals((DynIden::new(parent), DynIden::new(parent_key)))
            }
        };

        query.cond_where(Condition::all().add(correlation).add(inner));
        query
    }
}

fn column(alias: &str, name: &str) -> Expr {
    Expr::col((DynIden::new(alias), DynIden::new(name)))
}

impl<'a> PredicateSink for SqlConditionSink<'a> {
    fn target(&self) -> Option<&str> {
        self.entity.map(|e| e.tag.as_str())
    }

    fn equals(&mut self, field: &str, value: &Scalar) -> Result<()> {
        let expr = self.field_equals(field, value)?;
        self.and(expr);
        Ok(())
    }

    fn equals_or(&mut self, field: &str, value: &Scalar) -> Result<()> {
        let expr = self.field_equals(field, value)?;
        self.or(expr);
        Ok(())
    }

    fn relationship_exists(&mut self, chain: &[String], build: ScopeBuilder<'_, Self>) -> Result<()> {
        let expr = self.exists(chain, build)?;
        self.and(expr);
        Ok(())
    }

    fn relationship_exists_or(
        &mut self,
        chain: &[String],
        build: ScopeBuilder<'_, Self>,
    ) -> Result<()> {
        let expr = self.exists(chain, build)?;
        self.or(expr);
        Ok(())
    }

    fn group(&mut self, build: ScopeBuilder<'_, Self>) -> Result<()> {
        let entity = self.bound()?;
        let mut scope = self.scope(entity, self.alias.clone());
        build(&mut scope)?;
        self.next_alias = scope.next_alias;
        self.and(scope.into_condition());
        Ok(())
    }
}
