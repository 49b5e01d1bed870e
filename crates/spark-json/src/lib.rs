#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
//! spark-json：可插拔的 JSON 编解码门面。
//!
//! # 教案式综述（Why / How / What）
//! - **为什么存在**：业务代码需要在值与 JSON 之间转换，但不应与某一个序列化库的 API 绑死；
//!   门面提供唯一稳定的入口，背后的实现可以在部署时替换。
//! - **如何工作**：首次调用时向 [`CodecRegistry`] 发现编解码工厂，实例化第一个；
//!   没有任何工厂时回退到内置的 [`DefaultJsonCodec`]（基于 `serde_json`）。绑定只发生一次，
//!   此后所有调用直接转发给绑定的实例。
//! - **对外契约**：
//!   - 普通类型：[`to_json`] / [`from_json`]；
//!   - 单参数泛型：[`from_json_generic`]，以 [`ListOf`]、[`OptionOf`]、[`MapOf`]、[`BoxOf`] 标记原始类型；
//!   - 流：[`to_byte_stream`]、[`to_writer`]、[`from_reader`]；
//!   - 错误：统一为 [`JsonError`]，每个变体携带稳定错误码。
//!
//! # 插件接入
//! 1. 实现 [`JsonCodec`] 与 [`JsonCodecFactory`]；
//! 2. 在第一次编解码调用之前调用 [`register_codec_factory`]，或在插件 crate 中使用
//!    `submit_codec_factory!`（`auto-register` 特性，默认开启）；
//! 3. 用 `spark-json-tck` 的契约套件验证实现。
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//! }
//!
//! let json = spark_json::to_json(&Person { name: "A".into() }).unwrap();
//! assert_eq!(json, r#"{"name":"A"}"#);
//! let back: Person = spark_json::from_json(&json).unwrap();
//! assert_eq!(back.name, "A");
//! ```
//!
//! # 模块结构
//! - `codec`：对象安全的编解码契约、反序列化目标与字节流；
//! - `descriptor`：类型描述符、原始类型标记与实现描述符；
//! - `default_codec`：内置的 `serde_json` 实现及其工厂；
//! - `registry`：工厂注册与发现；
//! - `facade`：绑定一次的门面实例；
//! - `config`：默认实现的输出参数，可从 TOML 加载；
//! - `error`：错误分类与错误码。

pub mod codec;
pub mod config;
pub mod default_codec;
pub mod descriptor;
pub mod error;
pub mod facade;
mod global;
pub mod registry;

pub use codec::{ByteStream, DecodeTarget, JsonCodec, TypedTarget};
pub use config::DefaultCodecConfig;
pub use default_codec::{DefaultCodecFactory, DefaultJsonCodec};
pub use descriptor::{
    BoxOf, CodecDescriptor, ContentType, ListOf, MapOf, OptionOf, RawType, TypeDescriptor,
    TypeShape,
};
pub use error::{BoxError, ConfigError, JsonError, RegistryError, Result};
pub use facade::JsonFacade;
pub use global::{
    codec_descriptor, from_json, from_json_generic, from_reader, global_facade,
    register_codec_factory, register_static_codec_factory, to_byte_stream, to_json, to_writer,
};
#[cfg(feature = "auto-register")]
pub use registry::AutoRegisteredFactory;
pub use registry::{CodecRegistry, Discovery, JsonCodecFactory};

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "auto-register")]
    pub use inventory;
}
