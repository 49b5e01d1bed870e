//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为门面与编解码器之间的全部失败路径提供集中定义，调用方只需面对一个错误域；
//! - 每个变体都映射到稳定错误码（[`codes`]），便于日志检索与告警聚合。
//!
//! ## 设计要求（What）
//! - 门面不翻译、不吞掉编解码器返回的错误，原样透传给调用方；
//! - 没有部分成功：任何失败都意味着调用方拿不到半成品值；
//! - `CodecInitialization` 属于致命错误，绑定失败后每次调用都会重复返回，不会静默回退到默认实现。

use std::{borrow::Cow, error::Error as StdError, fmt, io, sync::Arc};

use thiserror::Error;

use crate::descriptor::TypeDescriptor;

/// 插件实现可返回的任意底层错误。
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// `spark-json` 统一的结果别名。
pub type Result<T, E = JsonError> = core::result::Result<T, E>;

/// 稳定错误码，遵循 `<领域>.<语义>` 命名约定。
pub mod codes {
    /// 值无法编码为 JSON。
    pub const JSON_ENCODE: &str = "json.encode";
    /// 输入不是合法 JSON。
    pub const JSON_DECODE: &str = "json.decode";
    /// JSON 结构与目标类型不匹配。
    pub const JSON_TYPE_MISMATCH: &str = "json.type_mismatch";
    /// 编解码器无法重建泛型形状。
    pub const JSON_UNSUPPORTED_SHAPE: &str = "json.unsupported_shape";
    /// 字节流读写失败。
    pub const JSON_IO: &str = "json.io";
    /// 发现的编解码工厂初始化失败。
    pub const JSON_CODEC_INITIALIZATION: &str = "json.codec_initialization";
    /// 门面已绑定，注册中心拒绝新的工厂。
    pub const REGISTRY_SEALED: &str = "registry.sealed";
    /// 默认编解码器配置无法解析。
    pub const CONFIG_INVALID: &str = "config.invalid";
}

/// 门面与编解码器共享的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：插件实现来自不同的序列化库，错误类型五花八门；统一收敛为少量语义化变体，
///   调用方才能依据“输入有误”还是“配置有误”采取不同处置。
/// - **契约 (What)**：
///   - 所有变体均满足 `Send + Sync + 'static`，可跨线程传播；
///   - [`JsonError::code`] 返回的错误码在版本间保持稳定；
///   - 底层原因通过 [`std::error::Error::source`] 暴露。
/// - **设计权衡 (Trade-offs)**：`Encode`/`Decode` 以 [`BoxError`] 保存底层原因，牺牲一次装箱换取对任意
///   序列化库的兼容。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonError {
    /// 值无法转换为文本，例如映射键不是字符串，或 `Serialize` 实现主动报错。
    #[error("failed to encode value as JSON: {source}")]
    Encode {
        #[source]
        source: BoxError,
    },

    /// 文本不是合法的 JSON（语法错误、提前结束或尾随垃圾）。
    #[error("malformed JSON input: {source}")]
    Decode {
        #[source]
        source: BoxError,
    },

    /// 文本语法合法，但结构无法转换为目标类型。
    #[error("JSON structure does not match `{expected}`: {detail}")]
    TypeMismatch {
        expected: TypeDescriptor,
        detail: String,
    },

    /// 当前编解码器无法由“原始类型 + 类型参数”重建泛型形状。
    #[error("codec `{codec}` cannot reconstruct generic shape `{shape}`")]
    UnsupportedShape {
        codec: Cow<'static, str>,
        shape: TypeDescriptor,
    },

    /// 底层流无法打开、写入或读取。
    #[error("JSON stream I/O failed: {0}")]
    Io(#[from] io::Error),

    /// 发现的工厂在 `create` 阶段失败。
    ///
    /// - **意图 (Why)**：存在显式的外部配置却构造失败，静默回退会掩盖错误配置；
    /// - **契约 (What)**：绑定状态随之终结，后续所有调用都会得到携带相同原因的本错误。
    #[error("codec factory `{factory}` failed to initialise: {source}")]
    CodecInitialization {
        factory: Arc<str>,
        #[source]
        source: Arc<dyn StdError + Send + Sync + 'static>,
    },
}

impl JsonError {
    /// 包装编码阶段的底层错误。
    pub fn encode(source: impl Into<BoxError>) -> Self {
        JsonError::Encode {
            source: source.into(),
        }
    }

    /// 包装解析阶段的底层错误。
    pub fn decode(source: impl Into<BoxError>) -> Self {
        JsonError::Decode {
            source: source.into(),
        }
    }

    /// 构造类型不匹配错误。
    pub fn type_mismatch(expected: &TypeDescriptor, detail: impl fmt::Display) -> Self {
        JsonError::TypeMismatch {
            expected: expected.clone(),
            detail: detail.to_string(),
        }
    }

    /// 构造泛型形状不受支持的错误。
    pub fn unsupported_shape(codec: impl Into<Cow<'static, str>>, shape: &TypeDescriptor) -> Self {
        JsonError::UnsupportedShape {
            codec: codec.into(),
            shape: shape.clone(),
        }
    }

    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            JsonError::Encode { .. } => codes::JSON_ENCODE,
            JsonError::Decode { .. } => codes::JSON_DECODE,
            JsonError::TypeMismatch { .. } => codes::JSON_TYPE_MISMATCH,
            JsonError::UnsupportedShape { .. } => codes::JSON_UNSUPPORTED_SHAPE,
            JsonError::Io(_) => codes::JSON_IO,
            JsonError::CodecInitialization { .. } => codes::JSON_CODEC_INITIALIZATION,
        }
    }

    /// 错误是否由调用方输入引起（相同输入重试必然再次失败）。
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            JsonError::Encode { .. } | JsonError::Decode { .. } | JsonError::TypeMismatch { .. }
        )
    }
}

/// 注册中心拒绝注册时返回的错误。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// 门面已经完成绑定，迟到的注册将永远不会生效。
    #[error("codec registry is sealed; factory `{factory}` registered after the facade was bound")]
    Sealed { factory: String },
}

impl RegistryError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::Sealed { .. } => codes::REGISTRY_SEALED,
        }
    }
}

/// 默认编解码器配置解析失败。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// TOML 文本无法解析或字段非法。
    #[error("invalid default codec configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    /// 返回稳定错误码。
    pub fn code(&self) -> &'static str {
        codes::CONFIG_INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_variants() {
        let descriptor = TypeDescriptor::of::<u32>();
        assert_eq!(JsonError::decode("eof").code(), codes::JSON_DECODE);
        assert_eq!(JsonError::encode("cycle").code(), codes::JSON_ENCODE);
        assert_eq!(
            JsonError::type_mismatch(&descriptor, "expected u32").code(),
            codes::JSON_TYPE_MISMATCH
        );
        assert_eq!(
            JsonError::unsupported_shape("strict", &descriptor).code(),
            codes::JSON_UNSUPPORTED_SHAPE
        );
        assert_eq!(
            JsonError::from(io::Error::other("broken pipe")).code(),
            codes::JSON_IO
        );
    }

    #[test]
    fn initialization_error_exposes_source() {
        let source: Arc<dyn StdError + Send + Sync> = Arc::from(BoxError::from("missing license"));
        let err = JsonError::CodecInitialization {
            factory: Arc::from("acme"),
            source,
        };
        assert_eq!(err.code(), codes::JSON_CODEC_INITIALIZATION);
        assert!(!err.is_input_error(), "初始化失败不属于输入错误");
        let source = StdError::source(&err).expect("应暴露底层原因");
        assert_eq!(source.to_string(), "missing license");
        assert!(err.to_string().contains("acme"));
    }

    #[test]
    fn type_mismatch_message_names_target() {
        let err =
            JsonError::type_mismatch(&TypeDescriptor::of::<Vec<u8>>(), "invalid type: string");
        assert!(err.to_string().contains("Vec<u8>"));
        assert!(err.is_input_error());
    }
}
