//! # Bean 정의와 능력(capability) 색인
//!
//! 런타임 리플렉션이 없는 Rust에서는 객체가 구현한 트레이트를 스스로 찾아낼 수
//! 없습니다. 그래서 등록 시점에 호출자가 "이 객체를 어떤 타입으로 조회할 수
//! 있는지"를 명시적으로 선언합니다.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bean_registry::bean;
//!
//! // Dog는 구체 타입 `Dog` 외에 `dyn Canine`, `dyn Pet`으로도 조회됩니다.
//! let dog = bean!(Arc::new(Dog), dyn Canine, dyn Pet);
//! registry.register(dog, "myBestFriend")?;
//! ```
//!
//! 각 능력 타입 `V`는 `Arc<V>` 형태로 한 번만 캐스팅되어 `Arc<dyn Any>` 안에
//! 보관되므로, 조회 시에는 다운캐스트 후 `Arc`를 복제하기만 하면 됩니다.

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

/// 특정 타입으로 캐스팅된 객체를 타입 소거하여 담는 컨테이너
pub(crate) type AnyView = Arc<dyn Any + Send + Sync>;

/// 하나의 색인 타입에 대한 객체의 뷰
struct View {
    type_id: TypeId,
    value: AnyView,
}

impl View {
    fn of<V: ?Sized + Send + Sync + 'static>(object: Arc<V>) -> Self {
        Self {
            type_id: TypeId::of::<V>(),
            value: Arc::new(object),
        }
    }
}

/// 등록 전 단계의 타입이 살아있는 빈 빌더
///
/// `provides`로 능력 타입을 하나씩 추가한 뒤 `BeanRegistry::register`에
/// 넘기면 [`ErasedBean`]으로 변환됩니다.
pub struct Bean<T: Send + Sync + 'static> {
    object: Arc<T>,
    views: Vec<View>,
}

impl<T: Send + Sync + 'static> Bean<T> {
    /// 구체 타입 `T`로만 색인되는 빈을 만듭니다.
    pub fn new(object: Arc<T>) -> Self {
        let views = vec![View::of(Arc::clone(&object))];
        Self { object, views }
    }

    /// 값을 `Arc`로 감싸서 빈을 만듭니다.
    pub fn from_value(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    /// 빈을 `V` 타입으로도 조회할 수 있도록 능력 타입을 추가합니다.
    ///
    /// `cast`는 보통 `|object| object` 형태의 비크기 강제 변환(unsizing coercion)
    /// 입니다. 간접 상위 트레이트도 자동으로 추가되지 않으므로, `Dog: Canine`이고
    /// `Canine: Animal`이라면 `dyn Canine`과 `dyn Animal`을 모두 선언해야 합니다.
    /// 이미 선언된 타입은 다시 추가되지 않습니다.
    pub fn provides<V: ?Sized + Send + Sync + 'static>(mut self, cast: fn(Arc<T>) -> Arc<V>) -> Self {
        let type_id = TypeId::of::<V>();
        if self.views.iter().all(|view| view.type_id != type_id) {
            self.views.push(View::of(cast(Arc::clone(&self.object))));
        }
        self
    }

    /// 빌더가 감싸고 있는 객체
    pub fn object(&self) -> &Arc<T> {
        &self.object
    }
}

/// 타입 정보가 소거된, 색인 가능한 빈
///
/// 구체 타입 이름과 객체의 동일성(identity), 그리고 색인 타입별 뷰를 보관합니다.
pub struct ErasedBean {
    type_name: &'static str,
    identity: usize,
    views: Vec<View>,
}

impl ErasedBean {
    /// 구체 타입의 이름 (`std::any::type_name` 기준)
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn identity(&self) -> usize {
        self.identity
    }

    pub(crate) fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.views.iter().map(|view| view.type_id)
    }

    pub(crate) fn view<V: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<V>> {
        let type_id = TypeId::of::<V>();
        self.views
            .iter()
            .find(|view| view.type_id == type_id)
            .and_then(|view| view.value.downcast_ref::<Arc<V>>())
            .cloned()
    }
}

impl<T: Send + Sync + 'static> From<Bean<T>> for ErasedBean {
    fn from(bean: Bean<T>) -> Self {
        Self {
            type_name: type_name::<T>(),
            identity: Arc::as_ptr(&bean.object) as *const () as usize,
            views: bean.views,
        }
    }
}

impl<T: Send + Sync + 'static> From<Arc<T>> for ErasedBean {
    fn from(object: Arc<T>) -> Self {
        Bean::new(object).into()
    }
}

/// 색인에 저장되는 불변 등록 레코드
///
/// 이름 색인과 타입 색인이 같은 `Arc<Entry>`를 공유합니다.
pub struct Entry {
    name: String,
    qualifier: Option<String>,
    bean: ErasedBean,
}

impl Entry {
    pub(crate) fn new(name: &str, qualifier: Option<&str>, bean: ErasedBean) -> Self {
        Self {
            name: name.to_string(),
            qualifier: qualifier.map(str::to_string),
            bean,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn bean(&self) -> &ErasedBean {
        &self.bean
    }

    /// 한정자가 없으면 필터링하지 않고, 있으면 정확히 일치하는 엔트리만 통과시킵니다.
    pub(crate) fn matches_qualifier(&self, qualifier: Option<&str>) -> bool {
        match qualifier {
            None => true,
            Some(wanted) => self.qualifier() == Some(wanted),
        }
    }

    /// 에러 메시지용 후보 설명
    pub(crate) fn describe(&self) -> String {
        format!(
            "[ type: {}, qualifier: {} ]",
            self.bean.type_name(),
            self.qualifier().unwrap_or("none")
        )
    }
}

/// 빈 한정자 문자열은 "한정자 없음"으로 취급합니다.
pub(crate) fn normalize_qualifier(qualifier: Option<&str>) -> Option<&str> {
    qualifier.filter(|qualifier| !qualifier.is_empty())
}

/// 객체와 능력 타입 목록으로 [`Bean`]을 만드는 매크로
///
/// ```rust,ignore
/// let cat = bean!(Arc::new(Cat), dyn Feline, dyn Animal, dyn Pet);
/// ```
#[macro_export]
macro_rules! bean {
    ($object:expr $(, $capability:ty)* $(,)?) => {
        $crate::core::bean::Bean::new($object)
            $(.provides::<$capability>(|object| object))*
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Animal: Send + Sync {
        fn sound(&self) -> &'static str;
    }

    trait Pet: Send + Sync {}

    struct Dog;

    impl Animal for Dog {
        fn sound(&self) -> &'static str {
            "woof"
        }
    }

    impl Pet for Dog {}

    #[test]
    fn test_views_share_the_same_object() {
        let dog = Arc::new(Dog);
        let erased: ErasedBean = crate::bean!(Arc::clone(&dog), dyn Animal, dyn Pet).into();

        let concrete = erased.view::<Dog>().unwrap();
        let animal = erased.view::<dyn Animal>().unwrap();

        assert!(Arc::ptr_eq(&concrete, &dog));
        assert_eq!(animal.sound(), "woof");
        assert_eq!(erased.identity(), Arc::as_ptr(&dog) as *const () as usize);
        assert_eq!(erased.type_ids().count(), 3);
    }

    #[test]
    fn test_undeclared_capability_has_no_view() {
        let erased: ErasedBean = Arc::new(Dog).into();

        assert!(erased.view::<Dog>().is_some());
        assert!(erased.view::<dyn Pet>().is_none());
    }

    #[test]
    fn test_duplicate_capability_is_ignored() {
        let bean = Bean::from_value(Dog)
            .provides::<dyn Pet>(|object| object)
            .provides::<dyn Pet>(|object| object)
            .provides::<Dog>(|object| object);
        let erased: ErasedBean = bean.into();

        assert_eq!(erased.type_ids().count(), 2);
    }

    #[test]
    fn test_qualifier_matching() {
        let qualified = Entry::new("myBestFriend", Some("myQual"), Arc::new(Dog).into());
        let plain = Entry::new("myPet", None, Arc::new(Dog).into());

        assert!(qualified.matches_qualifier(None));
        assert!(qualified.matches_qualifier(Some("myQual")));
        assert!(!qualified.matches_qualifier(Some("other")));
        assert!(!plain.matches_qualifier(Some("myQual")));
        assert_eq!(normalize_qualifier(Some("")), None);
        assert!(plain.describe().ends_with("qualifier: none ]"));
    }
}
