//! # Registry Error Handling
//!
//! 빈 레지스트리에서 발생하는 모든 에러를 하나의 열거형으로 정의합니다.
//! Spring의 `BeansException` 계층 구조를 `thiserror` 기반 열거형으로 옮긴 것으로,
//! 레지스트리 자신은 어떤 에러도 복구하지 않고 호출자에게 그대로 전달합니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 모듈 |
//! |--------|---------|
//! | `BeanDefinitionOverrideException` | `RegistrationConflict` |
//! | `BeanInstantiationException` | `InstantiationError` |
//! | `BeanCreationException` (팩토리 메서드 실패) | `InvocationError` |
//! | `NoSuchBeanDefinitionException` | `NotFound` |
//! | `NoUniqueBeanDefinitionException` | `AmbiguousMatch` |
//! | `BeanNotOfRequiredTypeException` | `TypeMismatch` |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use bean_registry::core::errors::RegistryError;
//!
//! match registry.get_by_type::<dyn Pet>() {
//!     Ok(pet) => pet.greet(),
//!     Err(RegistryError::AmbiguousMatch { candidates, .. }) => {
//!         log::warn!("후보가 여러 개입니다: {}", candidates);
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```

use thiserror::Error;

use crate::core::bean::Entry;

/// 사용자 팩토리와 설정 객체 생성 훅이 반환하는 에러 타입
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 레지스트리 연산의 결과 타입
pub type RegistryResult<T> = Result<T, RegistryError>;

/// 레지스트리 전역 에러 타입
///
/// 모든 변형은 사람이 읽을 수 있는 메시지를 갖고 있으며, 후보 목록처럼
/// 여러 항목을 나열하는 메시지는 항상 등록 순서를 따릅니다.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// 엄격한 이름 정책에서 이미 사용 중인 이름으로 다시 등록한 경우
    ///
    /// 기본 정책(`NamePolicy::Permissive`)에서는 발생하지 않습니다.
    #[error("Bean with name `{name}` already exists")]
    RegistrationConflict { name: String },

    /// 빈 이름이 비어 있는 경우
    #[error("Bean name must not be empty")]
    InvalidName,

    /// 설정 클래스를 생성할 수 없는 경우
    ///
    /// # 발생 시나리오
    /// - `Configuration::instantiate`가 `Err`를 반환
    /// - 생성 도중 패닉 발생
    #[error("Can't instantiate configuration `{type_name}`: {reason}")]
    InstantiationError { type_name: String, reason: String },

    /// 설정 클래스의 팩토리를 호출할 수 없거나 호출 중 실패한 경우
    #[error("Unable to invoke factory `{factory}` on configuration `{type_name}`: {reason}")]
    InvocationError {
        factory: String,
        type_name: String,
        reason: String,
    },

    /// 이름 또는 (타입, 한정자) 조회 결과가 없는 경우
    #[error("Unable to match on {target}.")]
    NotFound { target: String },

    /// 이름 또는 (타입, 한정자) 조회 결과가 두 개 이상인 경우
    ///
    /// `candidates`는 `[ type: ..., qualifier: ... ]` 형식의 항목을
    /// 등록 순서대로 이어 붙인 문자열입니다.
    #[error("Multiple matches found for {target}: {candidates}")]
    AmbiguousMatch { target: String, candidates: String },

    /// 이름으로 찾은 빈이 요청한 타입으로 색인되어 있지 않은 경우
    #[error("Bean `{name}` is not registered as `{expected}`")]
    TypeMismatch { name: String, expected: String },
}

impl RegistryError {
    pub(crate) fn name_not_found(name: &str) -> Self {
        RegistryError::NotFound {
            target: describe_name(name),
        }
    }

    pub(crate) fn type_not_found(type_name: &str, qualifier: Option<&str>) -> Self {
        RegistryError::NotFound {
            target: describe_type(type_name, qualifier),
        }
    }

    pub(crate) fn ambiguous_name<'a>(name: &str, entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        RegistryError::AmbiguousMatch {
            target: describe_name(name),
            candidates: describe_candidates(entries),
        }
    }

    pub(crate) fn ambiguous_type<'a>(
        type_name: &str,
        qualifier: Option<&str>,
        entries: impl IntoIterator<Item = &'a Entry>,
    ) -> Self {
        RegistryError::AmbiguousMatch {
            target: describe_type(type_name, qualifier),
            candidates: describe_candidates(entries),
        }
    }

    /// 조회 결과가 없어서 발생한 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    /// 후보가 여러 개여서 발생한 에러인지 확인합니다.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, RegistryError::AmbiguousMatch { .. })
    }
}

fn describe_name(name: &str) -> String {
    format!("name `{}`", name)
}

fn describe_type(type_name: &str, qualifier: Option<&str>) -> String {
    match qualifier {
        Some(qualifier) => format!("type `{}` with qualifier `{}`", type_name, qualifier),
        None => format!("type `{}`", type_name),
    }
}

fn describe_candidates<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> String {
    entries
        .into_iter()
        .map(Entry::describe)
        .collect::<Vec<_>>()
        .join(", ")
}
