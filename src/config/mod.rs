//! # Configuration Module
//!
//! 빈 레지스트리의 동작 정책을 관리하는 모듈입니다.
//! 설정값은 환경 변수에서 읽으며, 전역 레지스트리는 첫 접근 시 `.env` 파일을
//! 먼저 로드합니다.
//!
//! ## 모듈 구성
//!
//! - [`registry_config`] - 이름 중복 정책 등 레지스트리 설정
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 같은 이름의 중복 등록을 등록 시점에 거부
//! export BEAN_REGISTRY_NAME_POLICY="strict"
//! ```
//!
//! ## Spring과의 비교
//!
//! | Spring | Rust (이 프로젝트) |
//! |--------|-------------------|
//! | `spring.main.allow-bean-definition-overriding` | `BEAN_REGISTRY_NAME_POLICY` |
//! | `@ConfigurationProperties` | `RegistryConfig` |

pub mod registry_config;

pub use registry_config::*;
