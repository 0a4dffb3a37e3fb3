//! # Core Registry Module
//!
//! 빈 레지스트리의 핵심 기능을 제공하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 빈 레지스트리
//! - **BeanRegistry**: 이름 색인과 타입 색인을 가진 서비스 로케이터
//! - **조회**: 이름, 타입, 타입 + 한정자
//! - **초기화**: `reset`으로 테스트 간 격리
//!
//! ### [`bean`] - 빈 정의
//! - **Bean**: 객체와 조회 가능한 능력 타입 목록을 묶는 빌더
//! - **`bean!` 매크로**: `bean!(Arc::new(Dog), dyn Canine, dyn Pet)`
//!
//! ### [`configuration`] - 설정 클래스
//! - **Configuration**: Spring `@Configuration` 대응 트레이트
//! - **Factory / Parameter**: `@Bean` 메서드와 `@Qualifier` 파라미터 대응
//! - **`register_configuration!` 매크로**: `inventory` 기반 자동 수집
//!
//! ### [`errors`] - 에러 처리
//! - **RegistryError**: `thiserror` 기반 에러 열거형
//!
//! ## Spring Framework와의 비교
//!
//! | Spring | 이 프레임워크 |
//! |--------|---------------|
//! | `ApplicationContext` | `BeanRegistry` |
//! | `@Configuration` | `impl Configuration` |
//! | `@Bean` | `Factory::new(name, ..)` |
//! | `@Qualifier("q")` | `Parameter::of::<T>().qualified("q")` |
//! | 컴포넌트 스캔 | `register_configuration!` + `wire_discovered` |
//! | 의존성 그래프 | 없음 (등록 순서는 호출자의 책임) |

pub mod bean;
pub mod configuration;
pub mod errors;
pub mod registry;
