use serde::de::DeserializeOwned;
use spark_json::{
    JsonCodec, JsonError, ListOf, MapOf, OptionOf, RawType, TypeDescriptor, TypedTarget,
};

use crate::case::{TckCase, TckSuite};
use crate::support::{Person, people, scores};

const CASES: &[TckCase] = &[
    TckCase {
        name: "lists_reconstruct_or_refuse",
        test: lists_reconstruct_or_refuse,
    },
    TckCase {
        name: "maps_reconstruct_or_refuse",
        test: maps_reconstruct_or_refuse,
    },
    TckCase {
        name: "options_reconstruct_or_refuse",
        test: options_reconstruct_or_refuse,
    },
    TckCase {
        name: "generic_mismatch_names_parameterized_shape",
        test: generic_mismatch_names_parameterized_shape,
    },
];

const SUITE: TckSuite = TckSuite {
    name: "generic",
    cases: CASES,
};

pub const fn suite() -> &'static TckSuite {
    &SUITE
}

/// 驱动一次泛型解析；实现显式拒绝该形状时返回 `None`。
fn decode_generic<R, A>(codec: &dyn JsonCodec, json: &str) -> Option<R::Apply<A>>
where
    R: RawType,
    A: DeserializeOwned,
{
    let descriptor = TypeDescriptor::parameterized::<R, A>();
    let mut target = TypedTarget::<R::Apply<A>>::with_descriptor(descriptor.clone());
    match codec.deserialize_generic(json, &mut target) {
        Ok(()) => Some(target.into_value().expect("成功时目标必须被填充")),
        Err(JsonError::UnsupportedShape { shape, .. }) => {
            assert_eq!(shape, descriptor, "拒绝时必须报告请求的形状");
            assert!(!target.is_filled());
            None
        }
        Err(other) => panic!("合法泛型文本只允许成功或 UnsupportedShape，实际：{other:?}"),
    }
}

fn lists_reconstruct_or_refuse(codec: &dyn JsonCodec) {
    let original = people();
    let json = codec.serialize(&original).expect("列表应可编码");
    if let Some(back) = decode_generic::<ListOf, Person>(codec, &json) {
        assert_eq!(back, original);
    }

    let literal = r#"[{"name":"A","age":null,"tags":[]},{"name":"B","age":1,"tags":["x"]}]"#;
    if let Some(back) = decode_generic::<ListOf, Person>(codec, literal) {
        let names: Vec<_> = back.iter().map(|person| person.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }
}

fn maps_reconstruct_or_refuse(codec: &dyn JsonCodec) {
    let original = scores();
    let json = codec.serialize(&original).expect("映射应可编码");
    if let Some(back) = decode_generic::<MapOf, i64>(codec, &json) {
        assert_eq!(back, original);
    }
}

fn options_reconstruct_or_refuse(codec: &dyn JsonCodec) {
    if let Some(back) = decode_generic::<OptionOf, u32>(codec, "7") {
        assert_eq!(back, Some(7));
    }
    if let Some(back) = decode_generic::<OptionOf, u32>(codec, "null") {
        assert_eq!(back, None);
    }
}

fn generic_mismatch_names_parameterized_shape(codec: &dyn JsonCodec) {
    let descriptor = TypeDescriptor::parameterized::<ListOf, u8>();
    let mut target = TypedTarget::<Vec<u8>>::with_descriptor(descriptor.clone());
    let err = codec
        .deserialize_generic(r#"{"not":"a list"}"#, &mut target)
        .expect_err("对象无法还原为列表");
    match err {
        JsonError::TypeMismatch { expected, .. } => assert_eq!(expected, descriptor),
        JsonError::UnsupportedShape { shape, .. } => assert_eq!(shape, descriptor),
        other => panic!("意外的错误：{other:?}"),
    }
    assert!(!target.is_filled());
}
