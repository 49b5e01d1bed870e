//! 工厂构造失败是致命的：门面不回退，失败在后续每次调用中保持。

use std::{error::Error as _, io, sync::Arc};

use spark_json::{BoxError, JsonCodec, JsonCodecFactory, JsonError, error::codes};

struct MisconfiguredFactory;

impl JsonCodecFactory for MisconfiguredFactory {
    fn name(&self) -> &str {
        "misconfigured"
    }

    fn create(&self) -> Result<Box<dyn JsonCodec>, BoxError> {
        Err(Box::new(io::Error::new(
            io::ErrorKind::NotFound,
            "schema registry unreachable",
        )))
    }
}

#[test]
fn initialization_failure_is_fatal_and_sticky() {
    spark_json::register_codec_factory(Arc::new(MisconfiguredFactory)).expect("绑定前注册");

    let err = spark_json::to_json(&1).expect_err("首次调用暴露初始化失败");
    match &err {
        JsonError::CodecInitialization { factory, .. } => assert_eq!(&**factory, "misconfigured"),
        other => panic!("意外的错误变体: {other:?}"),
    }
    assert_eq!(err.code(), codes::JSON_CODEC_INITIALIZATION);
    let source = err.source().expect("保留底层原因");
    assert!(source.to_string().contains("schema registry unreachable"));

    for _ in 0..3 {
        let err = spark_json::from_json::<u8>("1").expect_err("失败是终态");
        assert_eq!(err.code(), codes::JSON_CODEC_INITIALIZATION);
    }
    let err = spark_json::codec_descriptor().expect_err("描述符同样不可用");
    assert_eq!(err.code(), codes::JSON_CODEC_INITIALIZATION);
    assert!(spark_json::global_facade().is_bound());
}
