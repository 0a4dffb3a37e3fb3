//! 빈 레지스트리
//!
//! 이름과 타입으로 객체를 등록하고 다시 찾아오는 최소한의 서비스 로케이터입니다.
//! 설정 클래스의 팩토리를 호출해서 만든 빈을 자동으로 등록하는 기능도 제공합니다.
//!
//! # Features
//!
//! - **이름 조회**: 같은 이름의 중복 등록은 조회 시점에 모호성 에러로 보고
//! - **타입 조회**: 구체 타입과 선언된 트레이트 객체 타입(`dyn Pet`)으로 조회
//! - **한정자**: 같은 타입의 여러 빈을 문자열 한정자로 구분
//! - **설정 클래스**: 팩토리 파라미터를 타입(+한정자)으로 자동 해결
//! - **자동 수집**: `inventory` 기반 설정 클래스 등록
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  Configuration (C)   │ ← 팩토리 목록
//! └──────────────────────┘
//!            │ wire_configuration::<C>()
//!            ▼
//! ┌──────────────────────┐
//! │     BeanRegistry     │ ← register / get_by_name / get_by_type
//! └──────────────────────┘
//!            │
//!            ▼
//! ┌──────────┴───────────┐
//! │ by_name  │  by_type  │ ← RwLock 하나로 보호되는 두 색인
//! └──────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bean_registry::{bean, BeanRegistry};
//!
//! let registry = BeanRegistry::new();
//! registry.register(bean!(Arc::new(Dog), dyn Canine, dyn Pet), "myBestFriend")?;
//!
//! let dog = registry.get_by_name::<Dog>("myBestFriend")?;
//! let pet = registry.get_by_type::<dyn Pet>()?;
//! ```

pub mod config;
pub mod core;

pub use crate::config::{NamePolicy, RegistryConfig};
pub use crate::core::bean::{Bean, ErasedBean};
pub use crate::core::configuration::{Arguments, Configuration, Factory, Parameter};
pub use crate::core::errors::{BoxError, RegistryError, RegistryResult};
pub use crate::core::registry::BeanRegistry;

#[doc(hidden)]
pub use inventory;
