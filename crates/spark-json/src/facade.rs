//! JSON 门面：持有唯一绑定的编解码器并转发全部调用。
//!
//! # 状态机
//! - **Unbound**：尚未解析编解码器；
//! - **Binding**：首次调用触发一次发现；无论找到插件、回退默认实现还是工厂失败，都会进入终态；
//! - **Bound**：终态。持有编解码器时逐一转发；记录了初始化失败时每次调用都返回该失败。
//!
//! # 并发语义
//! - 绑定由 [`OnceLock::get_or_init`] 完成：并发的首次调用只有一个执行发现，其余阻塞等待，
//!   所有调用方观察到同一个完整构造的实例；
//! - 绑定完成后转发是只读的，调用之间互不影响。

use std::{
    any::Any,
    error::Error as StdError,
    fmt,
    io::{Read, Write},
    panic::{self, AssertUnwindSafe},
    sync::{Arc, OnceLock},
};

use erased_serde::Serialize as ErasedSerialize;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Result,
    codec::{ByteStream, JsonCodec, TypedTarget},
    default_codec::DefaultJsonCodec,
    descriptor::{CodecDescriptor, RawType, TypeDescriptor},
    error::{BoxError, JsonError},
    registry::CodecRegistry,
};

/// 绑定终态。
enum Binding {
    Bound {
        codec: Arc<dyn JsonCodec>,
        fallback: bool,
    },
    Failed {
        factory: Arc<str>,
        source: Arc<dyn StdError + Send + Sync + 'static>,
    },
}

/// 持有唯一编解码器的门面。
///
/// # 教案式说明
/// - **意图 (Why)**：应用代码只依赖门面的稳定 API，不感知背后是哪一个序列化库；
/// - **逻辑 (How)**：首次调用时向注册中心发现工厂，取第一个实例化，没有则使用
///   [`DefaultJsonCodec`]；此后所有调用直接转发；
/// - **契约 (What)**：绑定只发生一次且不可替换；编解码器返回的错误原样透传。
///
/// 进程级的单例由 [`crate::global_facade`] 提供；独立实例主要用于依赖注入与测试。
pub struct JsonFacade {
    registry: Option<Arc<CodecRegistry>>,
    binding: OnceLock<Binding>,
}

impl JsonFacade {
    /// 创建一个延迟绑定到 `registry` 的门面。
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self {
            registry: Some(registry),
            binding: OnceLock::new(),
        }
    }

    /// 创建一个已绑定到给定编解码器的门面，不会查询任何注册中心。
    pub fn with_codec(codec: Arc<dyn JsonCodec>) -> Self {
        Self {
            registry: None,
            binding: OnceLock::from(Binding::Bound {
                codec,
                fallback: false,
            }),
        }
    }

    /// 创建一个已绑定到默认编解码器的门面。
    pub fn with_default_codec() -> Self {
        Self {
            registry: None,
            binding: OnceLock::from(Binding::Bound {
                codec: Arc::new(DefaultJsonCodec::new()),
                fallback: true,
            }),
        }
    }

    /// 是否已进入终态。
    pub fn is_bound(&self) -> bool {
        self.binding.get().is_some()
    }

    /// 当前绑定是否为回退的默认实现；必要时触发绑定。
    pub fn is_fallback(&self) -> Result<bool> {
        match self.binding() {
            Binding::Bound { fallback, .. } => Ok(*fallback),
            Binding::Failed { factory, source } => Err(initialization_error(factory, source)),
        }
    }

    /// 返回绑定的编解码器；必要时触发绑定。
    pub fn codec(&self) -> Result<&Arc<dyn JsonCodec>> {
        match self.binding() {
            Binding::Bound { codec, .. } => Ok(codec),
            Binding::Failed { factory, source } => Err(initialization_error(factory, source)),
        }
    }

    /// 绑定编解码器的描述符。
    pub fn codec_descriptor(&self) -> Result<CodecDescriptor> {
        Ok(self.codec()?.descriptor().clone())
    }

    /// 将值编码为 JSON 文本。
    pub fn to_json<T>(&self, value: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let erased: &dyn ErasedSerialize = &value;
        self.codec()?.serialize(erased)
    }

    /// 将 JSON 文本解析为 `T`。
    pub fn from_json<T>(&self, json: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let codec = self.codec()?;
        let mut target = TypedTarget::<T>::new();
        codec.deserialize(json, &mut target)?;
        target.finish(codec.descriptor())
    }

    /// 将 JSON 文本解析为由原始类型 `R` 与类型参数 `A` 组合出的泛型值。
    ///
    /// ```rust
    /// use serde::Deserialize;
    /// use spark_json::{JsonFacade, ListOf};
    ///
    /// #[derive(Deserialize)]
    /// struct Person {
    ///     name: String,
    /// }
    ///
    /// let facade = JsonFacade::with_default_codec();
    /// let people = facade
    ///     .from_json_generic::<ListOf, Person>(r#"[{"name":"A"},{"name":"B"}]"#)
    ///     .expect("列表应可解析");
    /// assert_eq!(people.len(), 2);
    /// assert_eq!(people[1].name, "B");
    /// ```
    pub fn from_json_generic<R, A>(&self, json: &str) -> Result<R::Apply<A>>
    where
        R: RawType,
        A: DeserializeOwned,
    {
        let codec = self.codec()?;
        let mut target =
            TypedTarget::<R::Apply<A>>::with_descriptor(TypeDescriptor::parameterized::<R, A>());
        codec.deserialize_generic(json, &mut target)?;
        target.finish(codec.descriptor())
    }

    /// 将值转换为可惰性消费的字节流。
    pub fn to_byte_stream<T>(&self, value: &T) -> Result<ByteStream>
    where
        T: Serialize + ?Sized,
    {
        let erased: &dyn ErasedSerialize = &value;
        self.codec()?.to_byte_stream(erased, &TypeDescriptor::of::<T>())
    }

    /// 将值写入调用方提供的输出端。
    pub fn to_writer<T, W>(&self, value: &T, mut writer: W) -> Result<()>
    where
        T: Serialize + ?Sized,
        W: Write,
    {
        let erased: &dyn ErasedSerialize = &value;
        self.codec()?.to_writer(erased, &mut writer)
    }

    /// 从输入端读取一份 JSON 文档并解析为 `T`。
    pub fn from_reader<T, R>(&self, mut reader: R) -> Result<T>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let codec = self.codec()?;
        let mut target = TypedTarget::<T>::new();
        codec.from_reader(&mut reader, &mut target)?;
        target.finish(codec.descriptor())
    }

    fn binding(&self) -> &Binding {
        self.binding.get_or_init(|| self.bind())
    }

    fn bind(&self) -> Binding {
        let Some(registry) = &self.registry else {
            return Self::fallback();
        };
        registry.seal();
        let mut discovered = registry.discover();
        let Some(factory) = discovered.next() else {
            return Self::fallback();
        };

        let ignored: Vec<String> = discovered.map(|other| other.name().to_owned()).collect();
        if !ignored.is_empty() {
            tracing::debug!(
                target: "spark_json::facade",
                selected = factory.name(),
                ignored = ?ignored,
                "multiple codec factories discovered; using the first"
            );
        }

        // 工厂 panic 同样记录为终态失败。
        let created = panic::catch_unwind(AssertUnwindSafe(|| factory.create()))
            .unwrap_or_else(|payload| Err(panic_error(&*payload)));

        match created {
            Ok(codec) => {
                tracing::info!(
                    target: "spark_json::facade",
                    factory = factory.name(),
                    codec = codec.descriptor().name(),
                    fallback = false,
                    "json codec bound"
                );
                Binding::Bound {
                    codec: Arc::from(codec),
                    fallback: false,
                }
            }
            Err(err) => {
                tracing::error!(
                    target: "spark_json::facade",
                    factory = factory.name(),
                    error = %err,
                    "json codec factory failed; facade is unusable"
                );
                Binding::Failed {
                    factory: Arc::from(factory.name()),
                    source: Arc::from(err),
                }
            }
        }
    }

    fn fallback() -> Binding {
        tracing::info!(
            target: "spark_json::facade",
            codec = DefaultJsonCodec::NAME,
            fallback = true,
            "no codec factory discovered; json codec bound to default"
        );
        Binding::Bound {
            codec: Arc::new(DefaultJsonCodec::new()),
            fallback: true,
        }
    }
}

/// 把工厂 panic 的载荷转换为初始化失败的根因。
fn panic_error(payload: &(dyn Any + Send)) -> BoxError {
    let message = if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "<non-string panic payload>".to_owned()
    };
    format!("codec factory panicked: {message}").into()
}

/// 失败的绑定是终态：每次调用都返回同一份根因。
fn initialization_error(
    factory: &Arc<str>,
    source: &Arc<dyn StdError + Send + Sync + 'static>,
) -> JsonError {
    JsonError::CodecInitialization {
        factory: Arc::clone(factory),
        source: Arc::clone(source),
    }
}

impl fmt::Debug for JsonFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.binding.get() {
            None => "unbound".to_owned(),
            Some(Binding::Bound { codec, .. }) => format!("bound({})", codec.descriptor().name()),
            Some(Binding::Failed { factory, .. }) => format!("failed({factory})"),
        };
        f.debug_struct("JsonFacade")
            .field("state", &state)
            .field("registry", &self.registry)
            .finish()
    }
}
