use std::collections::BTreeMap;

use serde_json::{Value, json};
use spark_json::JsonCodec;

use crate::case::{TckCase, TckSuite};
use crate::support::{Person, decode, people, scores};

const CASES: &[TckCase] = &[
    TckCase {
        name: "structs_round_trip",
        test: structs_round_trip,
    },
    TckCase {
        name: "primitives_round_trip",
        test: primitives_round_trip,
    },
    TckCase {
        name: "maps_round_trip",
        test: maps_round_trip,
    },
    TckCase {
        name: "encoding_is_deterministic",
        test: encoding_is_deterministic,
    },
    TckCase {
        name: "untyped_documents_round_trip",
        test: untyped_documents_round_trip,
    },
];

const SUITE: TckSuite = TckSuite {
    name: "round_trip",
    cases: CASES,
};

pub const fn suite() -> &'static TckSuite {
    &SUITE
}

fn structs_round_trip(codec: &dyn JsonCodec) {
    let original = people();
    let json = codec.serialize(&original).expect("结构体序列应可编码");
    let back: Vec<Person> = decode(codec, &json).expect("编码结果应可解析");
    assert_eq!(back, original);
}

fn primitives_round_trip(codec: &dyn JsonCodec) {
    let json = codec.serialize(&u64::MAX).expect("u64");
    assert_eq!(decode::<u64>(codec, &json).expect("u64"), u64::MAX);

    let json = codec.serialize(&i64::MIN).expect("i64");
    assert_eq!(decode::<i64>(codec, &json).expect("i64"), i64::MIN);

    let json = codec.serialize(&u128::MAX).expect("u128");
    assert_eq!(decode::<u128>(codec, &json).expect("u128"), u128::MAX);

    let json = codec.serialize(&i128::MIN).expect("i128");
    assert_eq!(decode::<i128>(codec, &json).expect("i128"), i128::MIN);

    let json = codec.serialize(&true).expect("bool");
    assert!(decode::<bool>(codec, &json).expect("bool"));

    let json = codec.serialize(&Option::<u8>::None).expect("null");
    assert_eq!(decode::<Option<u8>>(codec, &json).expect("null"), None);

    let json = codec.serialize(&"\u{1F600}\t").expect("str");
    assert_eq!(decode::<String>(codec, &json).expect("str"), "\u{1F600}\t");
}

fn maps_round_trip(codec: &dyn JsonCodec) {
    let original = scores();
    let json = codec.serialize(&original).expect("映射应可编码");
    let back: BTreeMap<String, i64> = decode(codec, &json).expect("映射应可解析");
    assert_eq!(back, original);
}

fn encoding_is_deterministic(codec: &dyn JsonCodec) {
    let original = people();
    let first = codec.serialize(&original).expect("首次编码");
    let second = codec.serialize(&original).expect("再次编码");
    assert_eq!(first, second, "相同的值必须产出相同的文本");
}

fn untyped_documents_round_trip(codec: &dyn JsonCodec) {
    let original = json!({
        "nested": {"list": [1, -2, "three", null, false]},
        "empty_object": {},
        "empty_list": [],
    });
    let json = codec.serialize(&original).expect("文档应可编码");
    let back: Value = decode(codec, &json).expect("文档应可解析");
    assert_eq!(back, original);
}
