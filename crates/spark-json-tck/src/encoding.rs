use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::Error as _};
use spark_json::{JsonCodec, JsonError};

use crate::case::{TckCase, TckSuite};

const CASES: &[TckCase] = &[
    TckCase {
        name: "non_string_keys_fail_to_encode",
        test: non_string_keys_fail_to_encode,
    },
    TckCase {
        name: "serialize_errors_surface_as_encode",
        test: serialize_errors_surface_as_encode,
    },
];

const SUITE: TckSuite = TckSuite {
    name: "encoding",
    cases: CASES,
};

pub const fn suite() -> &'static TckSuite {
    &SUITE
}

/// `Serialize` 实现总是报错的值。
struct Poisoned;

impl Serialize for Poisoned {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("poisoned value refuses to serialize"))
    }
}

fn non_string_keys_fail_to_encode(codec: &dyn JsonCodec) {
    let mut map = BTreeMap::new();
    map.insert(vec![1u8, 2], "composite key");
    let err = codec.serialize(&map).expect_err("复合键无法表示为对象键");
    assert!(matches!(err, JsonError::Encode { .. }), "意外的错误：{err:?}");
}

fn serialize_errors_surface_as_encode(codec: &dyn JsonCodec) {
    let err = codec
        .serialize(&vec![Poisoned])
        .expect_err("Serialize 报错必须传播");
    assert!(matches!(err, JsonError::Encode { .. }), "意外的错误：{err:?}");
    assert!(err.to_string().contains("poisoned"));
}
