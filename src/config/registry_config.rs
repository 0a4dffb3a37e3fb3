//! 레지스트리 정책 설정 모듈
//!
//! 이름 중복 정책 등 레지스트리 동작을 환경 변수로 조정합니다.

use std::env;

/// 이름 중복 정책을 지정하는 환경 변수
pub const NAME_POLICY_VAR: &str = "BEAN_REGISTRY_NAME_POLICY";

/// 같은 이름으로 두 번 이상 등록할 때의 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// 중복 등록을 허용하고, 이름 조회 시점에 `AmbiguousMatch`로 알립니다.
    #[default]
    Permissive,
    /// 중복 등록 자체를 `RegistrationConflict`로 거부합니다.
    Strict,
}

impl NamePolicy {
    /// 문자열에서 NamePolicy를 생성합니다.
    ///
    /// 대소문자를 구분하지 않으며, 알 수 없는 값은 `Permissive`로 취급합니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "strict" | "unique" => NamePolicy::Strict,
            _ => NamePolicy::Permissive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamePolicy::Permissive => "permissive",
            NamePolicy::Strict => "strict",
        }
    }
}

/// 레지스트리 설정
///
/// # Environment Variables
///
/// - `BEAN_REGISTRY_NAME_POLICY`: `permissive` (기본값) 또는 `strict`
///
/// # Examples
///
/// ```rust,ignore
/// let registry = BeanRegistry::with_config(RegistryConfig::from_env());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    pub name_policy: NamePolicy,
}

impl RegistryConfig {
    /// 현재 프로세스의 환경 변수에서 설정을 읽습니다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키 조회 함수로 설정을 읽습니다.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let name_policy = lookup(NAME_POLICY_VAR)
            .map(|value| NamePolicy::from_str(&value))
            .unwrap_or_default();

        Self { name_policy }
    }

    /// 이름 중복을 거부하는 설정
    pub fn strict() -> Self {
        Self {
            name_policy: NamePolicy::Strict,
        }
    }
}
