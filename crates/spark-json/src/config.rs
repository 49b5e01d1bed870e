//! 默认编解码器配置。
//!
//! 配置可由代码以 Builder 方式组装，也可从 TOML 片段加载：
//!
//! ```toml
//! pretty = true
//! indent = 4
//! stream_buffer_capacity = 1024
//! ```
//!
//! 未出现的字段取默认值；未知字段视为配置错误，避免拼写错误被静默忽略。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// [`DefaultJsonCodec`](crate::DefaultJsonCodec) 的输出与缓冲参数。
///
/// # 契约说明（What）
/// - `pretty`：是否美化输出，默认紧凑输出；
/// - `indent`：美化输出时每级缩进的空格数，默认 2；
/// - `stream_buffer_capacity`：`to_byte_stream` 缓冲区的初始容量（字节），默认 256。
///
/// 文本输出与字节流输出共用同一套格式参数，二者逐字节一致。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultCodecConfig {
    pub pretty: bool,
    pub indent: usize,
    pub stream_buffer_capacity: usize,
}

impl DefaultCodecConfig {
    /// 默认缩进宽度。
    pub const DEFAULT_INDENT: usize = 2;
    /// 默认流缓冲容量。
    pub const DEFAULT_STREAM_BUFFER_CAPACITY: usize = 256;

    /// 切换美化输出。
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// 设置缩进宽度，仅在美化输出时生效。
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// 设置流缓冲初始容量。
    pub fn with_stream_buffer_capacity(mut self, capacity: usize) -> Self {
        self.stream_buffer_capacity = capacity;
        self
    }

    /// 从 TOML 文本加载配置。
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

impl Default for DefaultCodecConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: Self::DEFAULT_INDENT,
            stream_buffer_capacity: Self::DEFAULT_STREAM_BUFFER_CAPACITY,
        }
    }
}
