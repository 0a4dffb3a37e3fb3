//! # Bean Registry - 이름/타입 기반 서비스 로케이터
//!
//! 임의의 객체를 이름과 타입(구체 타입 + 선언된 능력 타입)으로 등록하고,
//! 이후 이름, 타입, 또는 타입 + 한정자로 다시 찾아오는 최소한의 DI 컨테이너입니다.
//! Spring의 `DefaultListableBeanFactory`에서 의존성 그래프 분석과 생명주기 관리를
//! 모두 걷어낸 형태라고 보면 됩니다.
//!
//! ## Spring과의 비교
//!
//! | Spring | 이 시스템 |
//! |--------|-----------|
//! | `registerSingleton(name, obj)` | `BeanRegistry::register(bean, name)` |
//! | `getBean(String)` | `BeanRegistry::get_by_name::<T>(name)` |
//! | `getBean(Class)` | `BeanRegistry::get_by_type::<T>()` |
//! | `@Qualifier` + `getBean(Class)` | `BeanRegistry::get_by_type_qualified::<T>(q)` |
//! | `getBeansOfType(Class)` | `BeanRegistry::get_all_by_type::<T>()` |
//! | `@Configuration` + `@Bean` | `BeanRegistry::wire_configuration::<C>()` |
//!
//! ## 색인 구조
//!
//! ```text
//! by_name:  "myPet"        → [Entry(Cat)]
//!           "myBestFriend" → [Entry(Dog, qualifier = "myQual")]
//!
//! by_type:  Cat            → [Entry(Cat)]
//!           Dog            → [Entry(Dog)]
//!           dyn Pet        → [Entry(Cat), Entry(Dog)]
//!           dyn Canine     → [Entry(Dog)]
//! ```
//!
//! 두 색인은 하나의 `RwLock` 안에 함께 들어 있어서, 등록은 항상 두 색인에
//! 원자적으로 반영됩니다. 읽기 연산끼리는 동시에 실행될 수 있고, 등록/초기화와
//! 동시에 실행되는 읽기는 변경 전 또는 변경 후 상태 중 하나만 관찰합니다.
//!
//! ## 등록 순서
//!
//! 의존성 그래프를 만들지 않으므로 등록 순서는 호출자의 책임입니다.

use std::any::{type_name, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info, warn};
use once_cell::sync::Lazy;

use crate::config::{NamePolicy, RegistryConfig};
use crate::core::bean::{normalize_qualifier, Entry, ErasedBean};
use crate::core::errors::{RegistryError, RegistryResult};

/// 이름 색인과 타입 색인
#[derive(Default)]
struct Indices {
    by_name: HashMap<String, Vec<Arc<Entry>>>,
    by_type: HashMap<TypeId, Vec<Arc<Entry>>>,
}

impl Indices {
    fn name_bucket(&self, name: &str) -> &[Arc<Entry>] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    fn type_bucket(&self, type_id: TypeId) -> &[Arc<Entry>] {
        self.by_type.get(&type_id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// 빈 레지스트리
///
/// 프로세스(또는 테스트 케이스)마다 하나씩 명시적으로 생성해서 필요한 곳에
/// 넘겨주는 것이 기본 사용법입니다. 편의를 위한 전역 인스턴스는
/// [`BeanRegistry::global`]로 얻을 수 있습니다.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use bean_registry::{bean, BeanRegistry};
///
/// let registry = BeanRegistry::new();
/// registry.register(bean!(Arc::new(Cat), dyn Pet), "myPet")?;
/// registry.register_qualified(bean!(Arc::new(Dog), dyn Pet), "myBestFriend", "myQual")?;
///
/// let pets = registry.get_all_by_type::<dyn Pet>();
/// assert_eq!(pets.len(), 2);
///
/// let dog = registry.get_by_type_qualified::<dyn Pet>("myQual")?;
/// ```
pub struct BeanRegistry {
    config: RegistryConfig,
    indices: RwLock<Indices>,
}

impl BeanRegistry {
    /// 기본 설정(중복 이름 허용)으로 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            indices: RwLock::new(Indices::default()),
        }
    }

    /// 프로세스 전역 레지스트리를 반환합니다.
    ///
    /// 첫 접근 시 `.env` 파일과 환경 변수에서 [`RegistryConfig`]를 읽어 생성됩니다.
    /// 핵심 API는 모두 `&BeanRegistry`를 받으므로 이 접근자에 의존할 필요는 없습니다.
    pub fn global() -> &'static BeanRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// 빈을 이름으로 등록합니다. 한정자는 없습니다.
    ///
    /// 빈은 이름 색인과, 구체 타입 및 선언된 모든 능력 타입의 타입 색인에
    /// 동시에 추가됩니다.
    ///
    /// # Errors
    ///
    /// * `InvalidName` - 이름이 비어 있는 경우
    /// * `RegistrationConflict` - 엄격한 이름 정책에서 이미 등록된 이름인 경우
    pub fn register(&self, bean: impl Into<ErasedBean>, name: &str) -> RegistryResult<()> {
        self.insert(bean.into(), name, None)
    }

    /// 한정자와 함께 빈을 등록합니다. 빈 문자열 한정자는 "한정자 없음"과 같습니다.
    pub fn register_qualified(
        &self,
        bean: impl Into<ErasedBean>,
        name: &str,
        qualifier: &str,
    ) -> RegistryResult<()> {
        self.insert(bean.into(), name, Some(qualifier))
    }

    /// 능력 타입 없이 값 하나를 구체 타입으로만 등록합니다.
    pub fn register_value<T: Send + Sync + 'static>(&self, value: T, name: &str) -> RegistryResult<()> {
        self.register(Arc::new(value), name)
    }

    fn insert(&self, bean: ErasedBean, name: &str, qualifier: Option<&str>) -> RegistryResult<()> {
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidName);
        }

        let entry = Arc::new(Entry::new(name, normalize_qualifier(qualifier), bean));
        let mut indices = self.write();

        if self.config.name_policy == NamePolicy::Strict && !indices.name_bucket(name).is_empty() {
            warn!("Rejecting duplicate bean name `{}`", name);
            return Err(RegistryError::RegistrationConflict {
                name: name.to_string(),
            });
        }

        indices
            .by_name
            .entry(name.to_string())
            .or_default()
            .push(Arc::clone(&entry));
        for type_id in entry.bean().type_ids() {
            indices.by_type.entry(type_id).or_default().push(Arc::clone(&entry));
        }

        debug!(
            "📦 Registered bean `{}` ({}, qualifier: {})",
            name,
            entry.bean().type_name(),
            entry.qualifier().unwrap_or("none")
        );
        Ok(())
    }

    /// 이름으로 유일한 빈을 조회합니다.
    ///
    /// # Errors
    ///
    /// * `NotFound` - 해당 이름으로 등록된 빈이 없는 경우
    /// * `AmbiguousMatch` - 같은 이름으로 두 번 이상 등록된 경우
    /// * `TypeMismatch` - 빈이 `V` 타입으로 색인되어 있지 않은 경우
    pub fn get_by_name<V: ?Sized + Send + Sync + 'static>(&self, name: &str) -> RegistryResult<Arc<V>> {
        let indices = self.read();
        match indices.name_bucket(name) {
            [] => Err(RegistryError::name_not_found(name)),
            [entry] => entry.bean().view::<V>().ok_or_else(|| RegistryError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<V>().to_string(),
            }),
            entries => Err(RegistryError::ambiguous_name(
                name,
                entries.iter().map(Arc::as_ref),
            )),
        }
    }

    /// 이름으로 등록된 모든 빈 중 `V`로 조회 가능한 것을 등록 순서대로 반환합니다.
    ///
    /// 같은 객체가 여러 번 등록되었다면 한 번만 포함됩니다. 결과가 없으면 빈 벡터를 반환합니다.
    pub fn get_all_by_name<V: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Vec<Arc<V>> {
        let indices = self.read();
        distinct_views(indices.name_bucket(name))
    }

    /// 타입과 선택적 한정자로 유일한 빈을 찾습니다.
    ///
    /// 1. `V` 타입 버킷을 가져옵니다.
    /// 2. 한정자가 주어졌다면 한정자가 정확히 일치하는 엔트리만 남깁니다.
    ///    `None`이나 빈 문자열이면 필터링하지 않습니다.
    /// 3. 0개면 `NotFound`, 1개면 해당 객체, 2개 이상이면 `AmbiguousMatch`입니다.
    pub fn resolve_by_type<V: ?Sized + Send + Sync + 'static>(
        &self,
        qualifier: Option<&str>,
    ) -> RegistryResult<Arc<V>> {
        let qualifier = normalize_qualifier(qualifier);
        let indices = self.read();
        let candidates: Vec<&Entry> = indices
            .type_bucket(TypeId::of::<V>())
            .iter()
            .map(Arc::as_ref)
            .filter(|entry| entry.matches_qualifier(qualifier))
            .collect();

        match candidates.as_slice() {
            [] => Err(RegistryError::type_not_found(type_name::<V>(), qualifier)),
            [entry] => entry
                .bean()
                .view::<V>()
                .ok_or_else(|| RegistryError::type_not_found(type_name::<V>(), qualifier)),
            entries => Err(RegistryError::ambiguous_type(
                type_name::<V>(),
                qualifier,
                entries.iter().copied(),
            )),
        }
    }

    pub fn get_by_type<V: ?Sized + Send + Sync + 'static>(&self) -> RegistryResult<Arc<V>> {
        self.resolve_by_type::<V>(None)
    }

    pub fn get_by_type_qualified<V: ?Sized + Send + Sync + 'static>(
        &self,
        qualifier: &str,
    ) -> RegistryResult<Arc<V>> {
        self.resolve_by_type::<V>(Some(qualifier))
    }

    /// `V` 타입으로 등록된 서로 다른 객체들을 최초 등록 순서대로 반환합니다.
    pub fn get_all_by_type<V: ?Sized + Send + Sync + 'static>(&self) -> Vec<Arc<V>> {
        let indices = self.read();
        distinct_views(indices.type_bucket(TypeId::of::<V>()))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        !self.read().name_bucket(name).is_empty()
    }

    pub fn contains_type<V: ?Sized + 'static>(&self) -> bool {
        !self.read().type_bucket(TypeId::of::<V>()).is_empty()
    }

    /// 등록 횟수 (같은 객체를 두 번 등록하면 2로 셉니다)
    pub fn len(&self) -> usize {
        self.read().by_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 두 색인을 모두 빈 색인으로 교체합니다. 테스트 격리에 사용합니다.
    pub fn reset(&self) {
        let mut indices = self.write();
        *indices = Indices::default();
        info!("🧹 Bean registry cleared");
    }

    fn read(&self) -> RwLockReadGuard<'_, Indices> {
        self.indices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Indices> {
        self.indices.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BeanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn distinct_views<V: ?Sized + Send + Sync + 'static>(entries: &[Arc<Entry>]) -> Vec<Arc<V>> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter_map(|entry| Some((entry.bean().identity(), entry.bean().view::<V>()?)))
        .filter(|(identity, _)| seen.insert(*identity))
        .map(|(_, view)| view)
        .collect()
}

/// 전역 빈 레지스트리 인스턴스
static GLOBAL_REGISTRY: Lazy<BeanRegistry> = Lazy::new(|| {
    dotenv::dotenv().ok();
    BeanRegistry::with_config(RegistryConfig::from_env())
});
