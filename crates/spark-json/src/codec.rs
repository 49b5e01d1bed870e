//! 编解码能力契约。
//!
//! # 设计背景（Why）
//! - 门面需要在运行期持有“某一个”实现，因此契约必须对象安全：值以
//!   `&dyn erased_serde::Serialize` 跨越边界，反序列化目标以 [`DecodeTarget`] 跨越边界；
//! - 泛型层（门面上的 `to_json::<T>` / `from_json::<T>`）负责把具体类型擦除后交给对象层，
//!   对象层只面向 serde 数据模型工作，与具体业务类型解耦。
//!
//! # 契约说明（What）
//! - 所有方法对合法输入必须完整转换，不得静默丢弃数据；
//! - 非法输入必须显式失败，失败时目标中不得残留半成品；
//! - 调用不修改任何共享状态，除分配外没有副作用。

use std::{
    fmt,
    io::{self, Read, Write},
};

use erased_serde::{Deserializer as ErasedDeserializer, Serialize as ErasedSerialize};
use serde::de::DeserializeOwned;

use crate::{
    Result,
    descriptor::{CodecDescriptor, TypeDescriptor},
    error::JsonError,
};

/// `JsonCodec` 是所有 JSON 后端必须满足的最小能力集合。
///
/// # 设计初衷（Why）
/// - 让门面保持后端无关：`serde_json`、SIMD 解析器或带审计钩子的包装实现都可以插入；
/// - 与 serde 数据模型对齐，任何实现 `Serialize`/`Deserialize` 的类型无需额外适配。
///
/// # 行为逻辑（How）
/// 1. `serialize` 把擦除后的值写成文本；
/// 2. `deserialize` 解析文本，并把擦除后的反序列化器交给 [`DecodeTarget`] 还原为具体类型；
/// 3. `deserialize_generic` 处理“原始类型 + 类型参数”的目标，默认与 `deserialize` 相同；
/// 4. `to_byte_stream` 产出可惰性消费的字节序列，实现可以选择先缓冲再交付。
///
/// # 契约说明（What）
/// - **线程安全**：实现需满足 `Send + Sync + 'static`，门面会在任意线程并发调用；
/// - **错误语义**：语法错误返回 [`JsonError::Decode`]，结构不符返回 [`JsonError::TypeMismatch`]，
///   无法表示的值返回 [`JsonError::Encode`]，底层流失败返回 [`JsonError::Io`]；
/// - **确定性**：相等的值必须产出相等的文本（格式相关的空白除外）。
///
/// # 风险提示（Trade-offs）
/// - 类型擦除带来一次虚表跳转；热路径上若已知具体后端，可直接调用该后端的泛型 API。
pub trait JsonCodec: Send + Sync + 'static {
    /// 返回实现描述符。
    fn descriptor(&self) -> &CodecDescriptor;

    /// 将值编码为 JSON 文本。
    fn serialize(&self, value: &dyn ErasedSerialize) -> Result<String>;

    /// 解析文本并交由 `target` 还原为具体类型。
    fn deserialize(&self, json: &str, target: &mut dyn DecodeTarget) -> Result<()>;

    /// 解析单参数泛型目标。
    ///
    /// 默认实现与 [`JsonCodec::deserialize`] 相同：serde 数据模型天然支持嵌套泛型。
    /// 无法重建泛型形状的实现应覆盖本方法并返回 [`JsonError::UnsupportedShape`]。
    fn deserialize_generic(&self, json: &str, target: &mut dyn DecodeTarget) -> Result<()> {
        self.deserialize(json, target)
    }

    /// 将值转换为可惰性消费的字节流。
    fn to_byte_stream(
        &self,
        value: &dyn ErasedSerialize,
        ty: &TypeDescriptor,
    ) -> Result<ByteStream>;

    /// 将值直接写入调用方提供的输出端。
    ///
    /// 默认实现先物化文本再整体写出；支持流式输出的实现应覆盖本方法。
    fn to_writer(&self, value: &dyn ErasedSerialize, writer: &mut dyn Write) -> Result<()> {
        let json = self.serialize(value)?;
        writer.write_all(json.as_bytes())?;
        Ok(())
    }

    /// 从输入端读取一份 JSON 文档并还原为具体类型。
    ///
    /// 默认实现读取全部字节，非 UTF-8 内容视为 [`JsonError::Decode`]。
    fn from_reader(&self, reader: &mut dyn Read, target: &mut dyn DecodeTarget) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let json = String::from_utf8(bytes).map_err(JsonError::decode)?;
        self.deserialize(&json, target)
    }
}

/// 反序列化目标：接收擦除后的反序列化器并保存还原出的值。
///
/// # 教案式说明
/// - **意图 (Why)**：对象安全的编解码器无法声明 `fn deserialize<T>()`，于是把“具体类型”一侧
///   封装为目标对象，由编解码器驱动；
/// - **逻辑 (How)**：编解码器构造自己格式的反序列化器，擦除后传入 [`DecodeTarget::decode`]；
/// - **契约 (What)**：`decode` 失败时目标不得保留任何值；同一目标可被重复驱动，以最后一次成功为准。
pub trait DecodeTarget {
    /// 目标形状。
    fn descriptor(&self) -> &TypeDescriptor;

    /// 从擦除后的反序列化器中还原值。
    fn decode<'de>(
        &mut self,
        deserializer: &mut dyn ErasedDeserializer<'de>,
    ) -> core::result::Result<(), erased_serde::Error>;
}

/// 面向具体类型 `T` 的 [`DecodeTarget`] 实现。
pub struct TypedTarget<T> {
    descriptor: TypeDescriptor,
    value: Option<T>,
}

impl<T> TypedTarget<T>
where
    T: DeserializeOwned,
{
    /// 以 `T` 自身的描述符创建目标。
    pub fn new() -> Self {
        Self::with_descriptor(TypeDescriptor::of::<T>())
    }

    /// 以调用方给定的描述符创建目标，用于泛型形状。
    pub fn with_descriptor(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            value: None,
        }
    }

    /// 是否已持有还原出的值。
    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    /// 取出还原出的值。
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// 取出值；编解码器声称成功却未驱动目标时返回类型不匹配错误。
    pub(crate) fn finish(self, codec: &CodecDescriptor) -> Result<T> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(JsonError::type_mismatch(
                &self.descriptor,
                format_args!("codec `{}` completed without producing a value", codec.name()),
            )),
        }
    }
}

impl<T> Default for TypedTarget<T>
where
    T: DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DecodeTarget for TypedTarget<T>
where
    T: DeserializeOwned,
{
    fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn decode<'de>(
        &mut self,
        deserializer: &mut dyn ErasedDeserializer<'de>,
    ) -> core::result::Result<(), erased_serde::Error> {
        self.value = None;
        self.value = Some(erased_serde::deserialize::<T>(deserializer)?);
        Ok(())
    }
}

impl<T> fmt::Debug for TypedTarget<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedTarget")
            .field("descriptor", &self.descriptor)
            .field("filled", &self.value.is_some())
            .finish()
    }
}

/// 可惰性消费的 JSON 字节流。
///
/// # 契约说明（What）
/// - 对外只暴露 [`Read`]，调用方负责把它接到下游 I/O 并在需要时取消；
/// - 实现可以交付预先缓冲的内容，也可以交付边生成边读取的管道。
pub struct ByteStream {
    inner: Box<dyn Read + Send>,
}

impl ByteStream {
    /// 包装任意读取端。
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            inner: Box::new(reader),
        }
    }

    /// 由已物化的字节构造流。
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self::new(io::Cursor::new(bytes))
    }

    /// 读尽剩余字节。
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.inner.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}
