//! 链接期提交的工厂按名称排序参与发现，排在首位者被绑定。

use erased_serde::Serialize as ErasedSerialize;
use spark_json::{
    BoxError, ByteStream, CodecDescriptor, CodecRegistry, DecodeTarget, DefaultJsonCodec,
    JsonCodec, JsonCodecFactory, Result, TypeDescriptor,
};

/// 把编码结果包在固定信封里，便于区分是哪个实现生效。
struct EnvelopeCodec {
    descriptor: CodecDescriptor,
    inner: DefaultJsonCodec,
}

impl JsonCodec for EnvelopeCodec {
    fn descriptor(&self) -> &CodecDescriptor {
        &self.descriptor
    }

    fn serialize(&self, value: &dyn ErasedSerialize) -> Result<String> {
        Ok(format!("{{\"data\":{}}}", self.inner.serialize(value)?))
    }

    fn deserialize(&self, json: &str, target: &mut dyn DecodeTarget) -> Result<()> {
        self.inner.deserialize(json, target)
    }

    fn to_byte_stream(
        &self,
        value: &dyn ErasedSerialize,
        _ty: &TypeDescriptor,
    ) -> Result<ByteStream> {
        Ok(ByteStream::from_vec(self.serialize(value)?.into_bytes()))
    }
}

struct EnvelopeFactory {
    name: &'static str,
}

impl JsonCodecFactory for EnvelopeFactory {
    fn name(&self) -> &str {
        self.name
    }

    fn create(&self) -> core::result::Result<Box<dyn JsonCodec>, BoxError> {
        Ok(Box::new(EnvelopeCodec {
            descriptor: CodecDescriptor::new(self.name),
            inner: DefaultJsonCodec::new(),
        }))
    }
}

spark_json::submit_codec_factory!(EnvelopeFactory { name: "zz-envelope" });
spark_json::submit_codec_factory!(EnvelopeFactory { name: "aa-envelope" });

#[test]
fn auto_registered_factories_are_sorted_by_name() {
    let registry = CodecRegistry::with_auto_registered();
    let names: Vec<String> = registry
        .discover()
        .map(|factory| factory.name().to_owned())
        .collect();
    assert_eq!(names, ["aa-envelope", "zz-envelope"]);
    assert_eq!(registry.len(), 2);

    assert!(CodecRegistry::new().is_empty(), "显式注册中心不枚举链接期工厂");
}

#[test]
fn first_sorted_factory_backs_the_global_facade() {
    let descriptor = spark_json::codec_descriptor().expect("自动注册的工厂可用");
    assert_eq!(descriptor.name(), "aa-envelope");
    assert_eq!(spark_json::to_json(&[1]).expect("编码"), r#"{"data":[1]}"#);
    let stream = spark_json::to_byte_stream(&[1])
        .expect("字节流")
        .into_bytes()
        .expect("读尽");
    assert_eq!(stream, br#"{"data":[1]}"#);
}
