//! 内置默认编解码器：基于 `serde_json`，零配置即可使用。
//!
//! # 设计背景（Why）
//! - 门面在没有任何插件时也必须可用，因此内置一个功能完整的实现；
//! - 对常见数据形状（原始类型、结构体、序列、映射、一层泛型嵌套），“默认实现生效”与
//!   “插件生效”对调用方不可区分。
//!
//! # 行为逻辑（How）
//! - 解析分两段：先以 [`IgnoredAny`] 做一次只校验语法的扫描，语法错误归类为 `Decode`；
//!   再由 `serde_json::Deserializer` 直接驱动目标，数据错误归类为 `TypeMismatch`。
//!   不经过 `Value` 中间树，`u128`/`i128` 与重复字段检测保持 `serde_json` 自身的语义；
//! - 编码直接驱动 `serde_json::Serializer`，文本与字节流共用同一格式化器，输出逐字节一致。

use std::io::{Read, Write};

use erased_serde::{Deserializer as ErasedDeserializer, Serialize as ErasedSerialize};
use serde::de::IgnoredAny;
use serde_json::{Deserializer, Serializer, error::Category, ser::PrettyFormatter};

use crate::{
    Result,
    codec::{ByteStream, DecodeTarget, JsonCodec},
    config::DefaultCodecConfig,
    descriptor::{CodecDescriptor, TypeDescriptor},
    error::{BoxError, JsonError},
    registry::JsonCodecFactory,
};

/// 基于 `serde_json` 的默认实现。
#[derive(Debug)]
pub struct DefaultJsonCodec {
    descriptor: CodecDescriptor,
    config: DefaultCodecConfig,
    indent: Vec<u8>,
}

impl DefaultJsonCodec {
    /// 描述符中的实现名。
    pub const NAME: &'static str = "serde_json";

    /// 以默认配置创建。
    pub fn new() -> Self {
        Self::with_config(DefaultCodecConfig::default())
    }

    /// 以给定配置创建。
    pub fn with_config(config: DefaultCodecConfig) -> Self {
        Self {
            descriptor: CodecDescriptor::new(Self::NAME),
            indent: vec![b' '; config.indent],
            config,
        }
    }

    /// 当前配置。
    pub fn config(&self) -> &DefaultCodecConfig {
        &self.config
    }

    fn write_value<W: Write>(
        &self,
        value: &dyn ErasedSerialize,
        writer: W,
    ) -> serde_json::Result<()> {
        if self.config.pretty {
            let formatter = PrettyFormatter::with_indent(&self.indent);
            let mut serializer = Serializer::with_formatter(writer, formatter);
            serde::Serialize::serialize(value, &mut serializer)
        } else {
            let mut serializer = Serializer::new(writer);
            serde::Serialize::serialize(value, &mut serializer)
        }
    }

    fn decode_str(&self, json: &str, target: &mut dyn DecodeTarget) -> Result<()> {
        serde_json::from_str::<IgnoredAny>(json)
            .map_err(|err| classify(err, target.descriptor()))?;

        let mut deserializer = Deserializer::from_str(json);
        let outcome = target.decode(&mut <dyn ErasedDeserializer>::erase(&mut deserializer));
        // 语法已校验，此处的失败只可能来自结构不符。
        outcome.map_err(|err| JsonError::type_mismatch(target.descriptor(), err))?;
        deserializer
            .end()
            .map_err(|err| classify(err, target.descriptor()))
    }
}

impl Default for DefaultJsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// 写出阶段的错误：底层 I/O 失败与“值无法表示”分开归类。
fn encode_error(err: serde_json::Error) -> JsonError {
    if err.is_io() {
        JsonError::Io(err.into())
    } else {
        JsonError::encode(err)
    }
}

/// 读入阶段的错误按 `serde_json` 自身的分类映射。
fn classify(err: serde_json::Error, expected: &TypeDescriptor) -> JsonError {
    match err.classify() {
        Category::Io => JsonError::Io(err.into()),
        Category::Syntax | Category::Eof => JsonError::decode(err),
        Category::Data => JsonError::type_mismatch(expected, err),
    }
}

impl JsonCodec for DefaultJsonCodec {
    fn descriptor(&self) -> &CodecDescriptor {
        &self.descriptor
    }

    fn serialize(&self, value: &dyn ErasedSerialize) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_value(value, &mut buffer).map_err(encode_error)?;
        // serde_json 只会写出合法 UTF-8。
        String::from_utf8(buffer).map_err(JsonError::encode)
    }

    fn deserialize(&self, json: &str, target: &mut dyn DecodeTarget) -> Result<()> {
        self.decode_str(json, target)
    }

    fn to_byte_stream(
        &self,
        value: &dyn ErasedSerialize,
        _ty: &TypeDescriptor,
    ) -> Result<ByteStream> {
        let mut buffer = Vec::with_capacity(self.config.stream_buffer_capacity);
        self.write_value(value, &mut buffer).map_err(encode_error)?;
        Ok(ByteStream::from_vec(buffer))
    }

    fn to_writer(&self, value: &dyn ErasedSerialize, writer: &mut dyn Write) -> Result<()> {
        self.write_value(value, writer).map_err(encode_error)
    }

    fn from_reader(&self, reader: &mut dyn Read, target: &mut dyn DecodeTarget) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let json = std::str::from_utf8(&bytes).map_err(JsonError::decode)?;
        self.decode_str(json, target)
    }
}

/// 产出 [`DefaultJsonCodec`] 的工厂。
///
/// 门面回退时使用默认配置；需要定制输出格式时，把带配置的工厂当作插件注册即可。
#[derive(Clone, Debug, Default)]
pub struct DefaultCodecFactory {
    config: DefaultCodecConfig,
}

impl DefaultCodecFactory {
    /// 以给定配置创建工厂。
    pub fn new(config: DefaultCodecConfig) -> Self {
        Self { config }
    }
}

impl JsonCodecFactory for DefaultCodecFactory {
    fn name(&self) -> &str {
        DefaultJsonCodec::NAME
    }

    fn create(&self) -> core::result::Result<Box<dyn JsonCodec>, BoxError> {
        Ok(Box::new(DefaultJsonCodec::with_config(self.config.clone())))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    use super::*;
    use crate::codec::TypedTarget;
    use crate::descriptor::{ListOf, TypeDescriptor};
    use crate::error::codes;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Person {
        name: String,
        age: Option<u8>,
    }

    fn decode<T: serde::de::DeserializeOwned>(codec: &DefaultJsonCodec, json: &str) -> Result<T> {
        let mut target = TypedTarget::<T>::new();
        codec.deserialize(json, &mut target)?;
        target.finish(codec.descriptor())
    }

    #[test]
    fn compact_output_is_stable() {
        let codec = DefaultJsonCodec::new();
        let person = Person {
            name: "A".to_owned(),
            age: Some(7),
        };
        let json = codec.serialize(&person).expect("结构体应可编码");
        assert_eq!(json, r#"{"name":"A","age":7}"#);
        assert_eq!(codec.serialize(&person).expect("重复编码"), json);
    }

    #[test]
    fn pretty_output_uses_configured_indent() {
        let codec = DefaultJsonCodec::with_config(
            DefaultCodecConfig::default().with_pretty(true).with_indent(4),
        );
        let json = codec.serialize(&vec![1u8]).expect("数组应可编码");
        assert_eq!(json, "[\n    1\n]");
    }

    #[test]
    fn syntax_error_is_decode() {
        let codec = DefaultJsonCodec::new();
        let err = decode::<Value>(&codec, "{not valid}").expect_err("非法文本应失败");
        assert_eq!(err.code(), codes::JSON_DECODE);

        let err = decode::<u32>(&codec, "1 2").expect_err("尾随内容应失败");
        assert_eq!(err.code(), codes::JSON_DECODE);

        let err = decode::<Vec<u32>>(&codec, "[1, 2").expect_err("提前结束应失败");
        assert_eq!(err.code(), codes::JSON_DECODE);
    }

    #[test]
    fn structural_error_is_type_mismatch() {
        let codec = DefaultJsonCodec::new();
        let err = decode::<Person>(&codec, r#"{"name": 42}"#).expect_err("字段类型不符应失败");
        assert_eq!(err.code(), codes::JSON_TYPE_MISMATCH);
        match err {
            JsonError::TypeMismatch { expected, .. } => {
                assert_eq!(expected, TypeDescriptor::of::<Person>());
            }
            other => panic!("意外的错误变体: {other:?}"),
        }
    }

    #[test]
    fn wide_integers_round_trip_exactly() {
        let codec = DefaultJsonCodec::new();
        let json = codec.serialize(&u128::MAX).expect("u128 应可编码");
        assert_eq!(json, u128::MAX.to_string());
        assert_eq!(decode::<u128>(&codec, &json).expect("u128 应可解析"), u128::MAX);

        let json = codec.serialize(&i128::MIN).expect("i128 应可编码");
        assert_eq!(decode::<i128>(&codec, &json).expect("i128 应可解析"), i128::MIN);

        let mut reader = json.as_bytes();
        let mut target = TypedTarget::<i128>::new();
        codec.from_reader(&mut reader, &mut target).expect("读入端同样保持精度");
        assert_eq!(target.into_value(), Some(i128::MIN));
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let codec = DefaultJsonCodec::new();
        let err = decode::<Person>(&codec, r#"{"name":"A","name":"B"}"#)
            .expect_err("重复字段不得静默保留最后一个值");
        assert_eq!(err.code(), codes::JSON_TYPE_MISMATCH);
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn out_of_range_number_is_type_mismatch() {
        let codec = DefaultJsonCodec::new();
        let err = decode::<u8>(&codec, "300").expect_err("越界数字应失败");
        assert_eq!(err.code(), codes::JSON_TYPE_MISMATCH);
    }

    #[test]
    fn non_string_map_keys_fail_to_encode() {
        let codec = DefaultJsonCodec::new();
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "a");
        let err = codec.serialize(&map).expect_err("数组键无法表示为 JSON 对象键");
        assert_eq!(err.code(), codes::JSON_ENCODE);
    }

    #[test]
    fn generic_target_is_reconstructed() {
        let codec = DefaultJsonCodec::new();
        let mut target = TypedTarget::<Vec<Person>>::with_descriptor(
            TypeDescriptor::parameterized::<ListOf, Person>(),
        );
        codec
            .deserialize_generic(r#"[{"name":"A"},{"name":"B","age":3}]"#, &mut target)
            .expect("列表应可还原");
        let people = target.into_value().expect("目标应被填充");
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].name, "A");
        assert_eq!(people[1].age, Some(3));
    }

    #[test]
    fn byte_stream_matches_text() {
        let codec = DefaultJsonCodec::with_config(DefaultCodecConfig::default().with_pretty(true));
        let value = serde_json::json!({"k": [1, 2, {"n": null}]});
        let text = codec.serialize(&value).expect("文本编码");
        let bytes = codec
            .to_byte_stream(&value, &TypeDescriptor::of::<Value>())
            .expect("流编码")
            .into_bytes()
            .expect("读尽字节流");
        assert_eq!(bytes, text.into_bytes());
    }

    #[test]
    fn reader_rejects_invalid_utf8_as_decode() {
        let codec = DefaultJsonCodec::new();
        let mut target = TypedTarget::<String>::new();
        let mut reader: &[u8] = b"\"\xff\"";
        let err = codec
            .from_reader(&mut reader, &mut target)
            .expect_err("非法 UTF-8 应失败");
        assert_eq!(err.code(), codes::JSON_DECODE);
        assert!(!target.is_filled());
    }

    #[test]
    fn factory_applies_config() {
        let factory = DefaultCodecFactory::new(DefaultCodecConfig::default().with_pretty(true));
        let codec = factory.create().expect("默认工厂不会失败");
        assert_eq!(codec.descriptor().name(), DefaultJsonCodec::NAME);
        assert_eq!(codec.serialize(&[1u8]).expect("编码"), "[\n  1\n]");
    }
}
