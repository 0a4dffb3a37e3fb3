//! # Configuration Classes - 팩토리 기반 빈 등록
//!
//! Spring의 `@Configuration` 클래스와 `@Bean` 메서드를 Rust로 옮긴 모듈입니다.
//! 리플렉션으로 메서드 테이블을 훑는 대신, 설정 타입이 자신이 선언한 팩토리
//! 목록을 명시적으로 돌려줍니다.
//!
//! ## 동작 방식
//!
//! ```text
//! wire_configuration::<PetShop>()
//!    ├─ PetShop::instantiate()            → InstantiationError
//!    ├─ register(PetShop, "my_crate::PetShop")
//!    └─ for factory in PetShop::factories()   (선언 순서)
//!         ├─ 파라미터마다 resolve_by_type(타입, 한정자) → NotFound / AmbiguousMatch
//!         ├─ factory 호출                   → InvocationError
//!         └─ register(결과, factory 이름)
//! ```
//!
//! 팩토리는 서로 독립적으로 처리됩니다. N번째 팩토리가 실패해도 1..N-1번째
//! 팩토리가 만든 빈은 레지스트리에 그대로 남습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! struct PetShop;
//!
//! impl Configuration for PetShop {
//!     fn instantiate() -> Result<Self, BoxError> {
//!         Ok(PetShop)
//!     }
//!
//!     fn factories() -> Vec<Factory<Self>> {
//!         vec![
//!             Factory::new("myPet", |_, _| Ok(bean!(Arc::new(Cat), dyn Pet))),
//!             Factory::new("owner", |_, args| {
//!                 let pet = args.take::<dyn Pet>()?;
//!                 Ok(Bean::from_value(Owner { pet }))
//!             })
//!             .param(Parameter::of::<dyn Pet>().qualified("myQual")),
//!         ]
//!     }
//! }
//!
//! registry.wire_configuration::<PetShop>()?;
//! ```

use std::any::{type_name, Any};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{info, warn};

use crate::core::bean::{AnyView, ErasedBean};
use crate::core::errors::{BoxError, RegistryError, RegistryResult};
use crate::core::registry::BeanRegistry;

/// 설정 클래스 계약
///
/// 인자 없이 생성할 수 있어야 하며, 자신이 직접 선언한 팩토리만 돌려줍니다.
pub trait Configuration: Sized + Send + Sync + 'static {
    /// 설정 객체를 생성합니다. `Err`이나 패닉은 `InstantiationError`가 됩니다.
    fn instantiate() -> Result<Self, BoxError>;

    /// 빈을 만들어낼 팩토리 목록 (등록 순서 = 벡터 순서)
    fn factories() -> Vec<Factory<Self>>;
}

type Produce<C> = Box<dyn Fn(&C, &mut Arguments) -> Result<ErasedBean, BoxError> + Send + Sync>;

/// 설정 클래스의 팩토리 메서드 하나
pub struct Factory<C> {
    name: &'static str,
    parameters: Vec<Parameter>,
    produce: Produce<C>,
}

impl<C: Configuration> Factory<C> {
    /// `name`으로 등록될 빈을 만드는 팩토리를 정의합니다.
    pub fn new<F, B>(name: &'static str, produce: F) -> Self
    where
        F: Fn(&C, &mut Arguments) -> Result<B, BoxError> + Send + Sync + 'static,
        B: Into<ErasedBean>,
    {
        Self {
            name,
            parameters: Vec::new(),
            produce: Box::new(move |config, arguments| produce(config, arguments).map(Into::into)),
        }
    }

    /// 파라미터를 선언 순서대로 추가합니다.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn resolve_arguments(&self, registry: &BeanRegistry) -> RegistryResult<Arguments> {
        let values = self
            .parameters
            .iter()
            .map(|parameter| -> RegistryResult<(&'static str, AnyView)> {
                let value = (parameter.resolve)(registry, parameter.qualifier.as_deref())?;
                Ok((parameter.type_name, value))
            })
            .collect::<RegistryResult<VecDeque<_>>>()?;
        Ok(Arguments { values })
    }

    fn invoke(&self, config: &C, mut arguments: Arguments) -> RegistryResult<ErasedBean> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.produce)(config, &mut arguments)));
        match outcome {
            Ok(Ok(bean)) => Ok(bean),
            Ok(Err(e)) => Err(self.invocation_error(e.to_string())),
            Err(payload) => Err(self.invocation_error(panic_reason(payload))),
        }
    }

    fn invocation_error(&self, reason: String) -> RegistryError {
        RegistryError::InvocationError {
            factory: self.name.to_string(),
            type_name: type_name::<C>().to_string(),
            reason,
        }
    }
}

type Resolve = fn(&BeanRegistry, Option<&str>) -> RegistryResult<AnyView>;

/// 팩토리 파라미터 선언
///
/// 타입으로 레지스트리에서 값을 찾으며, [`Parameter::qualified`]로 한정자를
/// 붙이면 해당 한정자로 등록된 빈만 후보가 됩니다.
pub struct Parameter {
    type_name: &'static str,
    qualifier: Option<String>,
    resolve: Resolve,
}

impl Parameter {
    pub fn of<V: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            type_name: type_name::<V>(),
            qualifier: None,
            resolve: resolve_view::<V>,
        }
    }

    /// 한정자를 붙입니다. 빈 문자열은 한정자 없음을 뜻합니다.
    pub fn qualified(mut self, qualifier: impl Into<String>) -> Self {
        let qualifier = qualifier.into();
        self.qualifier = (!qualifier.is_empty()).then_some(qualifier);
        self
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }
}

fn resolve_view<V: ?Sized + Send + Sync + 'static>(
    registry: &BeanRegistry,
    qualifier: Option<&str>,
) -> RegistryResult<AnyView> {
    let object = registry.resolve_by_type::<V>(qualifier)?;
    Ok(Arc::new(object))
}

/// 팩토리 호출 직전에 모두 해결된 인자 목록
///
/// 선언한 순서대로 [`Arguments::take`]로 꺼내 씁니다.
pub struct Arguments {
    values: VecDeque<(&'static str, AnyView)>,
}

impl Arguments {
    /// 다음 인자를 `V` 타입으로 꺼냅니다.
    ///
    /// 선언보다 많이 꺼내거나 선언과 다른 타입으로 꺼내면 에러를 반환하며,
    /// 팩토리에서 `?`로 전파하면 `InvocationError`가 됩니다.
    pub fn take<V: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<V>, BoxError> {
        let (declared, value) = self
            .values
            .pop_front()
            .ok_or("factory requested more arguments than it declared")?;
        value
            .downcast_ref::<Arc<V>>()
            .cloned()
            .ok_or_else(|| format!("argument declared as `{}` requested as `{}`", declared, type_name::<V>()).into())
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}

fn instantiate<C: Configuration>() -> RegistryResult<C> {
    let error = |reason: String| RegistryError::InstantiationError {
        type_name: type_name::<C>().to_string(),
        reason,
    };
    match panic::catch_unwind(C::instantiate) {
        Ok(Ok(config)) => Ok(config),
        Ok(Err(e)) => Err(error(e.to_string())),
        Err(payload) => Err(error(panic_reason(payload))),
    }
}

impl BeanRegistry {
    /// 설정 클래스를 생성하고, 선언된 팩토리들이 만든 빈을 등록합니다.
    ///
    /// 설정 객체 자신은 `std::any::type_name::<C>()` 이름으로, 각 팩토리의 결과는
    /// 팩토리 이름으로 한정자 없이 등록됩니다.
    ///
    /// # Errors
    ///
    /// * `InstantiationError` - `C::instantiate` 실패 (아무것도 등록되지 않음)
    /// * `NotFound` / `AmbiguousMatch` - 파라미터 해결 실패 (해당 팩토리는 호출되지 않음)
    /// * `InvocationError` - 팩토리가 `Err`를 반환하거나 패닉
    /// * `RegistrationConflict` - 엄격한 이름 정책에서 이름 중복
    pub fn wire_configuration<C: Configuration>(&self) -> RegistryResult<()> {
        let config_name = type_name::<C>();
        let config = Arc::new(instantiate::<C>()?);
        self.register(Arc::clone(&config), config_name)?;

        let factories = C::factories();
        for factory in &factories {
            let bean = factory
                .resolve_arguments(self)
                .and_then(|arguments| factory.invoke(&config, arguments))
                .inspect_err(|e| warn!("⚠️ Wiring `{}` stopped at `{}`: {}", config_name, factory.name(), e))?;
            self.register(bean, factory.name())?;
        }

        info!("✅ Wired configuration `{}` ({} beans)", config_name, factories.len());
        Ok(())
    }

    /// `register_configuration!`으로 제출된 모든 설정 클래스를 연결합니다.
    ///
    /// `order` 오름차순, 같은 순서라면 이름 순으로 처리하며, 처음 실패한 곳에서 멈춥니다.
    /// 연결한 설정 클래스 개수를 반환합니다.
    pub fn wire_discovered(&self) -> RegistryResult<usize> {
        let mut registrations: Vec<&ConfigurationRegistration> =
            inventory::iter::<ConfigurationRegistration>.into_iter().collect();
        registrations.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(b.name)));

        for registration in &registrations {
            info!("🔄 Wiring discovered configuration `{}`", registration.name);
            (registration.wire)(self)?;
        }
        Ok(registrations.len())
    }
}

/// 컴파일 타임에 수집되는 설정 클래스 등록 정보
///
/// 직접 만들지 말고 [`register_configuration!`](crate::register_configuration) 매크로를 사용합니다.
pub struct ConfigurationRegistration {
    pub name: &'static str,
    pub order: i32,
    pub wire: fn(&BeanRegistry) -> RegistryResult<()>,
}

inventory::collect!(ConfigurationRegistration);

/// `register_configuration!`이 사용하는 연결 함수
pub fn wire<C: Configuration>(registry: &BeanRegistry) -> RegistryResult<()> {
    registry.wire_configuration::<C>()
}

/// 설정 클래스를 `BeanRegistry::wire_discovered` 대상으로 제출합니다.
///
/// ```rust,ignore
/// register_configuration!(Infrastructure, order = -10);
/// register_configuration!(PetShop);
/// ```
#[macro_export]
macro_rules! register_configuration {
    ($config:ty) => {
        $crate::register_configuration!($config, order = 0);
    };
    ($config:ty, order = $order:expr) => {
        $crate::inventory::submit! {
            $crate::core::configuration::ConfigurationRegistration {
                name: stringify!($config),
                order: $order,
                wire: $crate::core::configuration::wire::<$config>,
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean;
    use crate::core::bean::Bean;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Animal: Send + Sync {}
    trait Canine: Send + Sync {}
    trait Pet: Send + Sync {
        fn kind(&self) -> &'static str;
    }

    struct Cat;
    struct Dog;

    impl Pet for Cat {
        fn kind(&self) -> &'static str {
            "cat"
        }
    }

    impl Animal for Dog {}
    impl Canine for Dog {}
    impl Pet for Dog {
        fn kind(&self) -> &'static str {
            "dog"
        }
    }

    struct Owner {
        pet: Arc<dyn Pet>,
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    struct CatHouse;

    impl Configuration for CatHouse {
        fn instantiate() -> Result<Self, BoxError> {
            Ok(CatHouse)
        }

        fn factories() -> Vec<Factory<Self>> {
            vec![Factory::new("myPet", |_, _| Ok(bean!(Arc::new(Cat), dyn Pet)))]
        }
    }

    struct DogHouse;

    impl Configuration for DogHouse {
        fn instantiate() -> Result<Self, BoxError> {
            Ok(DogHouse)
        }

        fn factories() -> Vec<Factory<Self>> {
            vec![Factory::new("myBestFriend", |_, _| {
                Ok(bean!(Arc::new(Dog), dyn Canine, dyn Animal, dyn Pet))
            })]
        }
    }

    #[test]
    fn test_configuration_with_concrete_implementation() {
        init_logger();
        let registry = BeanRegistry::new();
        registry.wire_configuration::<CatHouse>().unwrap();

        assert_eq!(registry.get_by_name::<dyn Pet>("myPet").unwrap().kind(), "cat");
        assert_eq!(registry.get_by_type::<dyn Pet>().unwrap().kind(), "cat");
        assert!(registry.get_by_type::<Cat>().is_ok());

        // 설정 객체 자신도 타입 이름으로 등록됩니다.
        assert!(registry.get_by_name::<CatHouse>(type_name::<CatHouse>()).is_ok());
    }

    #[test]
    fn test_configuration_with_interface_match() {
        let registry = BeanRegistry::new();
        registry.wire_configuration::<DogHouse>().unwrap();

        assert!(registry.get_by_name::<Dog>("myBestFriend").is_ok());
        assert!(registry.get_by_type::<Dog>().is_ok());
        assert!(registry.get_by_type::<dyn Canine>().is_ok());
        assert_eq!(registry.get_by_type::<dyn Pet>().unwrap().kind(), "dog");
    }

    #[test]
    fn test_multiple_configurations() {
        let registry = BeanRegistry::new();
        registry.wire_configuration::<CatHouse>().unwrap();
        registry.wire_configuration::<DogHouse>().unwrap();

        assert_eq!(registry.get_all_by_type::<dyn Pet>().len(), 2);
        assert!(registry.get_by_type::<dyn Pet>().err().unwrap().is_ambiguous());
        assert_eq!(registry.get_by_type::<Dog>().unwrap().kind(), "dog");
        assert_eq!(registry.get_by_type::<Cat>().unwrap().kind(), "cat");
    }

    struct Kennel;

    impl Configuration for Kennel {
        fn instantiate() -> Result<Self, BoxError> {
            Ok(Kennel)
        }

        fn factories() -> Vec<Factory<Self>> {
            vec![
                Factory::new("owner", |_, args| {
                    let pet = args.take::<dyn Pet>()?;
                    Ok(Bean::from_value(Owner { pet }))
                })
                .param(Parameter::of::<dyn Pet>().qualified("myQual")),
            ]
        }
    }

    #[test]
    fn test_qualified_parameter_resolution() {
        let registry = BeanRegistry::new();
        registry.register(bean!(Arc::new(Cat), dyn Pet), "myPet").unwrap();
        registry
            .register_qualified(bean!(Arc::new(Dog), dyn Pet), "myBestFriend", "myQual")
            .unwrap();

        registry.wire_configuration::<Kennel>().unwrap();

        let owner = registry.get_by_name::<Owner>("owner").unwrap();
        assert_eq!(owner.pet.kind(), "dog");
    }

    static INVOKED: AtomicUsize = AtomicUsize::new(0);

    struct Breeder;

    impl Configuration for Breeder {
        fn instantiate() -> Result<Self, BoxError> {
            Ok(Breeder)
        }

        fn factories() -> Vec<Factory<Self>> {
            vec![
                Factory::new("firstLitter", |_, _| Ok(Arc::new(Cat))),
                Factory::new("owner", |_, args| {
                    INVOKED.fetch_add(1, Ordering::SeqCst);
                    Ok(Bean::from_value(Owner { pet: args.take::<dyn Pet>()? }))
                })
                .param(Parameter::of::<dyn Pet>()),
            ]
        }
    }

    #[test]
    fn test_unresolvable_parameter_skips_invocation() {
        let registry = BeanRegistry::new();

        let error = registry.wire_configuration::<Breeder>().err().unwrap();

        assert!(error.is_not_found());
        assert_eq!(INVOKED.load(Ordering::SeqCst), 0);
        // 앞선 팩토리의 결과는 남아 있습니다.
        assert!(registry.get_by_name::<Cat>("firstLitter").is_ok());
        assert!(!registry.contains_name("owner"));
    }

    struct Broken;

    impl Configuration for Broken {
        fn instantiate() -> Result<Self, BoxError> {
            Err("no kennel available".into())
        }

        fn factories() -> Vec<Factory<Self>> {
            Vec::new()
        }
    }

    struct Exploding;

    impl Configuration for Exploding {
        fn instantiate() -> Result<Self, BoxError> {
            panic!("constructor blew up")
        }

        fn factories() -> Vec<Factory<Self>> {
            Vec::new()
        }
    }

    #[test]
    fn test_instantiation_failures() {
        let registry = BeanRegistry::new();

        let error = registry.wire_configuration::<Broken>().err().unwrap();
        assert!(matches!(error, RegistryError::InstantiationError { ref reason, .. } if reason == "no kennel available"));

        let error = registry.wire_configuration::<Exploding>().err().unwrap();
        assert!(matches!(error, RegistryError::InstantiationError { ref reason, .. } if reason == "constructor blew up"));

        assert!(registry.is_empty());
    }

    struct Faulty;

    impl Configuration for Faulty {
        fn instantiate() -> Result<Self, BoxError> {
            Ok(Faulty)
        }

        fn factories() -> Vec<Factory<Self>> {
            vec![
                Factory::new("healthy", |_, _| Ok(Arc::new(Dog))),
                Factory::new("sick", |_, _| -> Result<Arc<Cat>, BoxError> { Err("out of food".into()) }),
                Factory::new("never", |_, _| Ok(Arc::new(Cat))),
            ]
        }
    }

    struct Panicking;

    impl Configuration for Panicking {
        fn instantiate() -> Result<Self, BoxError> {
            Ok(Panicking)
        }

        fn factories() -> Vec<Factory<Self>> {
            vec![Factory::new("boom", |_, _| -> Result<Arc<Cat>, BoxError> {
                panic!("factory blew up")
            })]
        }
    }

    #[test]
    fn test_invocation_failures() {
        let registry = BeanRegistry::new();

        let error = registry.wire_configuration::<Faulty>().err().unwrap();
        match error {
            RegistryError::InvocationError { factory, reason, .. } => {
                assert_eq!(factory, "sick");
                assert_eq!(reason, "out of food");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(registry.contains_name("healthy"));
        assert!(!registry.contains_name("never"));

        let error = registry.wire_configuration::<Panicking>().err().unwrap();
        assert!(matches!(error, RegistryError::InvocationError { ref reason, .. } if reason == "factory blew up"));
    }

    #[test]
    fn test_arguments_type_checks() {
        let dog: Arc<dyn Pet> = Arc::new(Dog);
        let mut arguments = Arguments {
            values: VecDeque::from([(type_name::<dyn Pet>(), Arc::new(dog) as AnyView)]),
        };
        assert_eq!(arguments.remaining(), 1);

        let error = arguments.take::<Dog>().err().unwrap();
        assert!(error.to_string().contains("requested as"));
        assert!(arguments.take::<dyn Pet>().is_err());
    }

    struct Groomer;

    impl Configuration for Groomer {
        fn instantiate() -> Result<Self, BoxError> {
            Ok(Groomer)
        }

        fn factories() -> Vec<Factory<Self>> {
            vec![Factory::new("groomed", |_, args| {
                let dog = args.take::<Dog>()?;
                Ok(Arc::new(Owner { pet: dog }))
            })
            .param(Parameter::of::<Dog>())]
        }
    }

    crate::register_configuration!(DogHouse, order = -1);
    crate::register_configuration!(Groomer);

    #[test]
    fn test_wire_discovered_respects_order() {
        let registry = BeanRegistry::new();

        let wired = registry.wire_discovered().unwrap();

        assert_eq!(wired, 2);
        assert_eq!(registry.get_by_name::<Owner>("groomed").unwrap().pet.kind(), "dog");
    }
}
