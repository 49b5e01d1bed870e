//! 进程级门面与自由函数入口。
//!
//! # 教案式说明
//! - **意图 (Why)**：绝大多数调用方只需要“把值变成 JSON”，不应关心门面实例从哪里来；
//! - **逻辑 (How)**：进程内只有一个注册中心与一个门面，均在首次访问时惰性构造；
//!   门面在第一次编解码调用时完成绑定并封存注册中心；
//! - **契约 (What)**：插件必须在第一次编解码调用之前完成注册，否则注册返回
//!   [`RegistryError::Sealed`]。

use std::{
    io::{Read, Write},
    sync::{Arc, LazyLock},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Result,
    codec::ByteStream,
    descriptor::{CodecDescriptor, RawType},
    error::RegistryError,
    facade::JsonFacade,
    registry::{CodecRegistry, JsonCodecFactory},
};

static GLOBAL_REGISTRY: LazyLock<Arc<CodecRegistry>> =
    LazyLock::new(|| Arc::new(CodecRegistry::with_auto_registered()));

static GLOBAL_FACADE: LazyLock<JsonFacade> =
    LazyLock::new(|| JsonFacade::new(Arc::clone(&GLOBAL_REGISTRY)));

/// 进程级门面。
pub fn global_facade() -> &'static JsonFacade {
    &GLOBAL_FACADE
}

/// 向进程级注册中心注册工厂。
pub fn register_codec_factory(factory: Arc<dyn JsonCodecFactory>) -> Result<(), RegistryError> {
    GLOBAL_REGISTRY.register(factory)
}

/// 向进程级注册中心注册 `'static` 工厂。
pub fn register_static_codec_factory(
    factory: &'static dyn JsonCodecFactory,
) -> Result<(), RegistryError> {
    GLOBAL_REGISTRY.register_static(factory)
}

/// 使用进程级门面把值编码为 JSON 文本。
///
/// ```rust
/// assert_eq!(spark_json::to_json(&vec![1, 2, 3]).unwrap(), "[1,2,3]");
/// ```
pub fn to_json<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    GLOBAL_FACADE.to_json(value)
}

/// 使用进程级门面解析 JSON 文本。
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    GLOBAL_FACADE.from_json(json)
}

/// 使用进程级门面解析单参数泛型目标。
pub fn from_json_generic<R, A>(json: &str) -> Result<R::Apply<A>>
where
    R: RawType,
    A: DeserializeOwned,
{
    GLOBAL_FACADE.from_json_generic::<R, A>(json)
}

/// 使用进程级门面把值转换为字节流。
pub fn to_byte_stream<T>(value: &T) -> Result<ByteStream>
where
    T: Serialize + ?Sized,
{
    GLOBAL_FACADE.to_byte_stream(value)
}

/// 使用进程级门面把值写入输出端。
pub fn to_writer<T, W>(value: &T, writer: W) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    GLOBAL_FACADE.to_writer(value, writer)
}

/// 使用进程级门面从输入端解析值。
pub fn from_reader<T, R>(reader: R) -> Result<T>
where
    T: DeserializeOwned,
    R: Read,
{
    GLOBAL_FACADE.from_reader(reader)
}

/// 进程级门面所绑定编解码器的描述符；必要时触发绑定。
pub fn codec_descriptor() -> Result<CodecDescriptor> {
    GLOBAL_FACADE.codec_descriptor()
}
