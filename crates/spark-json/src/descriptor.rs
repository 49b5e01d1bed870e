//! 类型与编解码器描述符。
//!
//! # 设计背景（Why）
//! - 反序列化需要知道目标形状；Rust 的泛型在调用点已完整携带类型信息，这里只保留一份
//!   运行时可读的描述，供编解码器做形状判断、供错误信息指明期望类型。
//! - “原始类型 + 单个类型参数”的泛型形状通过 [`RawType`] 的泛型关联类型表达，
//!   编译期保证 `ListOf` 与 `Person` 组合出的正是 `Vec<Person>`。
//!
//! # 契约说明（What）
//! - [`TypeDescriptor`] 每次调用临时构造，门面从不缓存；
//! - [`CodecDescriptor`] 标识一个编解码实现，用于日志与运行期自省。

use std::{any::type_name, borrow::Cow, collections::BTreeMap, fmt};

use serde::de::DeserializeOwned;

/// 反序列化目标的运行时描述。
///
/// # 教案式说明
/// - **意图 (Why)**：编解码器以对象安全的方式接收目标，无法看到具体泛型参数；描述符补足这一信息。
/// - **逻辑 (How)**：`name` 来自 [`core::any::type_name`]，`shape` 区分普通类型与单参数泛型。
/// - **契约 (What)**：`name` 仅用于诊断，不保证跨编译器版本稳定，不可作为持久化键。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    name: &'static str,
    shape: TypeShape,
}

/// 目标类型的形状。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// 单个具体类型。
    Plain,
    /// 由原始类型与一个类型参数组合出的泛型形状，例如“`Person` 的列表”。
    Parameterized {
        raw: &'static str,
        argument: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// 描述一个具体类型。
    pub fn of<T: ?Sized>() -> Self {
        Self {
            name: type_name::<T>(),
            shape: TypeShape::Plain,
        }
    }

    /// 描述由 `R` 与类型参数 `A` 组合出的泛型形状。
    pub fn parameterized<R, A>() -> Self
    where
        R: RawType,
        A: DeserializeOwned,
    {
        Self {
            name: type_name::<R::Apply<A>>(),
            shape: TypeShape::Parameterized {
                raw: R::NAME,
                argument: Box::new(Self::of::<A>()),
            },
        }
    }

    /// 完整类型名。
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 类型形状。
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// 是否为单参数泛型形状。
    pub fn is_parameterized(&self) -> bool {
        matches!(self.shape, TypeShape::Parameterized { .. })
    }

    /// 泛型形状的原始类型名。
    pub fn raw_type(&self) -> Option<&'static str> {
        match &self.shape {
            TypeShape::Parameterized { raw, .. } => Some(*raw),
            TypeShape::Plain => None,
        }
    }

    /// 泛型形状的类型参数。
    pub fn type_argument(&self) -> Option<&TypeDescriptor> {
        match &self.shape {
            TypeShape::Parameterized { argument, .. } => Some(argument),
            TypeShape::Plain => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            TypeShape::Plain => f.write_str(self.name),
            TypeShape::Parameterized { raw, argument } => write!(f, "{raw}<{argument}>"),
        }
    }
}

/// 单参数泛型的“原始类型”标记。
///
/// # 教案式说明
/// - **意图 (Why)**：调用方只握有“容器种类”与“元素类型”两份信息时（例如配置驱动的解析），
///   依然能请求一个完整的泛型目标；
/// - **逻辑 (How)**：实现者以零尺寸标记类型声明 `Apply<A>`，门面据此在编译期推导出最终类型；
/// - **契约 (What)**：`Apply<A>` 必须对任意 `A: DeserializeOwned` 可反序列化；`NAME` 用于描述符与日志。
///
/// # 示例
/// ```rust
/// use serde::Deserialize;
/// use spark_json::descriptor::RawType;
///
/// #[derive(Deserialize)]
/// struct Page<T> {
///     items: Vec<T>,
///     next: Option<String>,
/// }
///
/// enum PageOf {}
///
/// impl RawType for PageOf {
///     const NAME: &'static str = "Page";
///     type Apply<A: serde::de::DeserializeOwned> = Page<A>;
/// }
///
/// let facade = spark_json::JsonFacade::with_default_codec();
/// let page = facade
///     .from_json_generic::<PageOf, u32>(r#"{"items":[1,2],"next":null}"#)
///     .expect("页面应可解析");
/// assert_eq!(page.items, vec![1, 2]);
/// assert!(page.next.is_none());
/// ```
pub trait RawType: 'static {
    /// 原始类型的人类可读名称。
    const NAME: &'static str;

    /// 以 `A` 为类型参数实例化后的完整类型。
    type Apply<A: DeserializeOwned>: DeserializeOwned;
}

/// `Vec<A>`。
#[derive(Debug)]
pub enum ListOf {}

impl RawType for ListOf {
    const NAME: &'static str = "List";
    type Apply<A: DeserializeOwned> = Vec<A>;
}

/// `Option<A>`。
#[derive(Debug)]
pub enum OptionOf {}

impl RawType for OptionOf {
    const NAME: &'static str = "Option";
    type Apply<A: DeserializeOwned> = Option<A>;
}

/// 以字符串为键的有序映射 `BTreeMap<String, A>`。
#[derive(Debug)]
pub enum MapOf {}

impl RawType for MapOf {
    const NAME: &'static str = "Map";
    type Apply<A: DeserializeOwned> = BTreeMap<String, A>;
}

/// `Box<A>`。
#[derive(Debug)]
pub enum BoxOf {}

impl RawType for BoxOf {
    const NAME: &'static str = "Box";
    type Apply<A: DeserializeOwned> = Box<A>;
}

/// `ContentType` 以 IANA `media-type` 约定描述编解码器产出的负载语义。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentType(Cow<'static, str>);

impl ContentType {
    /// `application/json`。
    pub const fn json() -> Self {
        Self(Cow::Borrowed("application/json"))
    }

    /// 创建新的内容类型。
    pub fn new(value: impl Into<Cow<'static, str>>) -> Self {
        Self(value.into())
    }

    /// 返回底层字符串表示。
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `CodecDescriptor` 标识一个编解码实现。
///
/// # 契约说明（What）
/// - `name` 在同一进程内应唯一，日志与错误信息以此指代实现；
/// - `content_type` 默认为 `application/json`，JSON 变体（如 NDJSON）可自行覆盖。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodecDescriptor {
    name: Cow<'static, str>,
    content_type: ContentType,
}

impl CodecDescriptor {
    /// 以名称创建描述符，内容类型为 `application/json`。
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            content_type: ContentType::json(),
        }
    }

    /// 覆盖内容类型。
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// 实现名称。
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 内容类型。
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }
}

impl fmt::Display for CodecDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.content_type)
    }
}
