//! 编解码工厂注册中心与发现协议。
//!
//! # 设计背景（Why）
//! - 门面不能在编译期知道具体工厂类型，插件通过注册中心“自报家门”；
//! - 注册有两条路径：宿主启动时调用显式注册 API，或插件 crate 在链接期通过
//!   [`submit_codec_factory!`](crate::submit_codec_factory) 提交（`auto-register` 特性）。
//!
//! # 契约说明（What）
//! - [`CodecRegistry::discover`] 产出有限且确定的序列：先是显式注册的工厂（按注册顺序），
//!   再是链接期提交的工厂（按名称排序，链接顺序本身不稳定）；
//! - 序列为空不是错误，而是“回退到默认实现”的信号；
//! - 门面绑定时会封存注册中心，此后的注册返回 [`RegistryError::Sealed`]，迟到的配置不会被静默忽略。

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::RwLock;

use crate::{
    codec::JsonCodec,
    error::{BoxError, RegistryError},
};

/// `JsonCodecFactory` 定义插件实例的构建契约。
///
/// # 契约说明（What）
/// - `name` 用于日志、错误信息与链接期工厂的排序；
/// - `create` 失败被视为致命的启动错误，门面不会回退到默认实现；
/// - 门面在整个生命周期内最多调用一次 `create`。
pub trait JsonCodecFactory: Send + Sync + 'static {
    /// 工厂名称。
    fn name(&self) -> &str;

    /// 构建编解码实例。
    fn create(&self) -> Result<Box<dyn JsonCodec>, BoxError>;
}

/// 将 `'static` 工厂引用适配为拥有型 `Arc`，使借用入口与拥有型入口共享同一存储。
struct BorrowedFactory {
    inner: &'static dyn JsonCodecFactory,
}

impl JsonCodecFactory for BorrowedFactory {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn create(&self) -> Result<Box<dyn JsonCodec>, BoxError> {
        self.inner.create()
    }
}

/// 链接期提交的工厂条目。
///
/// 通常不直接构造，而是使用 [`submit_codec_factory!`](crate::submit_codec_factory)。
#[cfg(feature = "auto-register")]
pub struct AutoRegisteredFactory {
    factory: &'static dyn JsonCodecFactory,
}

#[cfg(feature = "auto-register")]
impl AutoRegisteredFactory {
    /// 包装一个 `'static` 工厂。
    pub const fn new(factory: &'static dyn JsonCodecFactory) -> Self {
        Self { factory }
    }

    /// 被包装的工厂。
    pub fn factory(&self) -> &'static dyn JsonCodecFactory {
        self.factory
    }
}

#[cfg(feature = "auto-register")]
impl fmt::Debug for AutoRegisteredFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoRegisteredFactory")
            .field("name", &self.factory.name())
            .finish()
    }
}

#[cfg(feature = "auto-register")]
inventory::collect!(AutoRegisteredFactory);

/// 在链接期提交一个编解码工厂。
///
/// 参数必须是常量表达式（通常是单元结构体或字段全为常量的结构体字面量）。
///
/// ```rust,ignore
/// struct SimdJsonFactory;
///
/// impl spark_json::JsonCodecFactory for SimdJsonFactory { /* ... */ }
///
/// spark_json::submit_codec_factory!(SimdJsonFactory);
/// ```
#[cfg(feature = "auto-register")]
#[macro_export]
macro_rules! submit_codec_factory {
    ($factory:expr $(,)?) => {
        $crate::__private::inventory::submit! {
            $crate::registry::AutoRegisteredFactory::new(&$factory)
        }
    };
}

/// 发现结果：一次性、有限、顺序确定的工厂序列。
pub struct Discovery {
    factories: std::vec::IntoIter<Arc<dyn JsonCodecFactory>>,
}

impl Iterator for Discovery {
    type Item = Arc<dyn JsonCodecFactory>;

    fn next(&mut self) -> Option<Self::Item> {
        self.factories.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.factories.size_hint()
    }
}

impl ExactSizeIterator for Discovery {}

impl fmt::Debug for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discovery")
            .field("remaining", &self.factories.len())
            .finish()
    }
}

/// 编解码工厂注册中心。
///
/// # 线程安全与生命周期约束
/// - 工厂列表由读写锁保护，注册与发现可在任意线程进行；
/// - 封存标志在写锁内翻转，保证“封存之后不再有注册成功”。
pub struct CodecRegistry {
    factories: RwLock<Vec<Arc<dyn JsonCodecFactory>>>,
    sealed: AtomicBool,
    #[cfg_attr(not(feature = "auto-register"), allow(dead_code))]
    include_auto_registered: bool,
}

impl CodecRegistry {
    /// 只包含显式注册工厂的注册中心。
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(Vec::new()),
            sealed: AtomicBool::new(false),
            include_auto_registered: false,
        }
    }

    /// 额外枚举链接期提交的工厂；未启用 `auto-register` 特性时与 [`CodecRegistry::new`] 相同。
    pub fn with_auto_registered() -> Self {
        Self {
            include_auto_registered: true,
            ..Self::new()
        }
    }

    /// 注册拥有型工厂。
    pub fn register(&self, factory: Arc<dyn JsonCodecFactory>) -> Result<(), RegistryError> {
        let mut factories = self.factories.write();
        if self.sealed.load(Ordering::Acquire) {
            tracing::warn!(
                target: "spark_json::registry",
                factory = factory.name(),
                "registration rejected: registry already sealed"
            );
            return Err(RegistryError::Sealed {
                factory: factory.name().to_owned(),
            });
        }
        tracing::debug!(
            target: "spark_json::registry",
            factory = factory.name(),
            position = factories.len(),
            "codec factory registered"
        );
        factories.push(factory);
        Ok(())
    }

    /// 注册 `'static` 生命周期的工厂，适合复用进程级单例。
    pub fn register_static(
        &self,
        factory: &'static dyn JsonCodecFactory,
    ) -> Result<(), RegistryError> {
        self.register(Arc::new(BorrowedFactory { inner: factory }))
    }

    /// 按确定顺序枚举当前可见的工厂。
    pub fn discover(&self) -> Discovery {
        let mut factories = self.factories.read().clone();
        factories.extend(self.auto_registered());
        tracing::debug!(
            target: "spark_json::registry",
            count = factories.len(),
            "codec factories discovered"
        );
        Discovery {
            factories: factories.into_iter(),
        }
    }

    /// 封存注册中心，此后的注册全部被拒绝。
    pub fn seal(&self) {
        let _factories = self.factories.write();
        self.sealed.store(true, Ordering::Release);
    }

    /// 是否已封存。
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// 当前可见的工厂数量。
    pub fn len(&self) -> usize {
        self.factories.read().len() + self.auto_registered().len()
    }

    /// 是否没有任何可见工厂。
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(feature = "auto-register")]
    fn auto_registered(&self) -> Vec<Arc<dyn JsonCodecFactory>> {
        if !self.include_auto_registered {
            return Vec::new();
        }
        let mut entries: Vec<&'static dyn JsonCodecFactory> =
            inventory::iter::<AutoRegisteredFactory>
                .into_iter()
                .map(AutoRegisteredFactory::factory)
                .collect();
        entries.sort_by(|left, right| left.name().cmp(right.name()));
        entries
            .into_iter()
            .map(|inner| Arc::new(BorrowedFactory { inner }) as Arc<dyn JsonCodecFactory>)
            .collect()
    }

    #[cfg(not(feature = "auto-register"))]
    fn auto_registered(&self) -> Vec<Arc<dyn JsonCodecFactory>> {
        Vec::new()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .factories
            .read()
            .iter()
            .map(|factory| factory.name().to_owned())
            .collect();
        f.debug_struct("CodecRegistry")
            .field("factories", &names)
            .field("sealed", &self.is_sealed())
            .field("include_auto_registered", &self.include_auto_registered)
            .finish()
    }
}
