use serde_json::Value;
use spark_json::{JsonCodec, JsonError, TypeDescriptor};

use crate::case::{TckCase, TckSuite};
use crate::support::{Person, decode};

const CASES: &[TckCase] = &[
    TckCase {
        name: "syntax_errors_are_decode",
        test: syntax_errors_are_decode,
    },
    TckCase {
        name: "structural_errors_are_type_mismatch",
        test: structural_errors_are_type_mismatch,
    },
    TckCase {
        name: "duplicate_fields_are_rejected",
        test: duplicate_fields_are_rejected,
    },
];

const SUITE: TckSuite = TckSuite {
    name: "malformed",
    cases: CASES,
};

pub const fn suite() -> &'static TckSuite {
    &SUITE
}

fn syntax_errors_are_decode(codec: &dyn JsonCodec) {
    for input in ["{not valid}", "[1, 2", "1 2", "", "{\"a\":}", "'single'"] {
        let err = decode::<Value>(codec, input).expect_err("非法文本必须失败");
        assert!(
            matches!(err, JsonError::Decode { .. }),
            "输入 {input:?} 应归类为 Decode，实际：{err:?}"
        );
    }
}

fn structural_errors_are_type_mismatch(codec: &dyn JsonCodec) {
    let err = decode::<Person>(codec, r#"{"name": 42, "age": null, "tags": []}"#)
        .expect_err("字段类型不符必须失败");
    match err {
        JsonError::TypeMismatch { expected, .. } => {
            assert_eq!(expected, TypeDescriptor::of::<Person>());
        }
        other => panic!("应归类为 TypeMismatch，实际：{other:?}"),
    }

    let err = decode::<u8>(codec, "300").expect_err("越界数字必须失败");
    assert!(matches!(err, JsonError::TypeMismatch { .. }), "实际：{err:?}");
}

fn duplicate_fields_are_rejected(codec: &dyn JsonCodec) {
    let err = decode::<Person>(codec, r#"{"name":"A","name":"B","age":null,"tags":[]}"#)
        .expect_err("重复字段不得静默保留最后一个值");
    assert!(
        matches!(err, JsonError::TypeMismatch { .. }),
        "应归类为 TypeMismatch，实际：{err:?}"
    );
}
