//! 필터 키 경로 분해

/// 관계 체인 구분자
pub const SEPARATOR: char = '.';

/// 분해된 필터 키
///
/// `patient.name` → chain `["patient"]`, field `name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    /// 관계 체인 (비어 있으면 루트 엔티티의 필드)
    pub chain: Vec<String>,

    /// 최종 필드 이름
    pub field: String,
}

impl KeyPath {
    /// 필터 키를 관계 체인과 필드로 분해
    ///
    /// 마지막 세그먼트는 항상 필드입니다. 체인의 첫 세그먼트가 루트 엔티티
    /// 태그와 같으면(대소문자 무시) 그 세그먼트 하나만 제거합니다.
    /// 관계/필드 존재 여부는 여기서 검증하지 않습니다.
    pub fn resolve(key: &str, root_tag: &str) -> Self {
        let mut chain: Vec<String> = key.split(SEPARATOR).map(str::to_string).collect();
        // split은 최소 한 개의 세그먼트를 반환
        let field = chain.pop().unwrap_or_default();

        if chain
            .first()
            .is_some_and(|first| first.to_lowercase() == root_tag.to_lowercase())
        {
            chain.remove(0);
        }

        Self { chain, field }
    }

    /// 루트 엔티티의 필드인지
    pub fn is_local(&self) -> bool {
        self.chain.is_empty()
    }
}
