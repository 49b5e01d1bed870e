use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::panic;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spark_json::{JsonCodec, JsonError, TypedTarget};

/// 在附加上下文的情况下重新抛出 panic。
///
/// # 教案式说明
/// - **意图 (Why)**：`run_suite` 捕获 panic 后，需要在原始 payload 之上追加“实现/套件/用例”描述；
/// - **逻辑 (How)**：尝试将 payload 解析为 `&str` / `String`，格式化后通过 [`panic::resume_unwind`] 抛出；
/// - **契约 (What)**：函数不会正常返回。
pub fn panic_with_context(
    codec: &str,
    suite: &str,
    case: &str,
    payload: Box<dyn Any + Send>,
) -> ! {
    let mut message = String::new();
    let _ = write!(&mut message, "[spark-json-tck::{codec}::{suite}::{case}] 测试失败：");

    if let Some(text) = payload.downcast_ref::<&str>() {
        let _ = write!(&mut message, "{text}");
    } else if let Some(text) = payload.downcast_ref::<String>() {
        let _ = write!(&mut message, "{text}");
    } else {
        let _ = write!(&mut message, "<未知 panic 类型>");
    }

    panic::resume_unwind(Box::new(message));
}

/// 通过对象安全接口把文本解析为 `T`，并检查“失败不留半成品”。
pub fn decode<T>(codec: &dyn JsonCodec, json: &str) -> Result<T, JsonError>
where
    T: DeserializeOwned,
{
    let mut target = TypedTarget::<T>::new();
    match codec.deserialize(json, &mut target) {
        Ok(()) => Ok(target
            .into_value()
            .unwrap_or_else(|| panic!("`{}` 声称成功却未驱动目标", codec.descriptor().name()))),
        Err(err) => {
            assert!(!target.is_filled(), "失败后目标不得残留值：{err}");
            Err(err)
        }
    }
}

/// 用例共享的业务样例。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: Option<u8>,
    pub tags: Vec<String>,
}

/// 覆盖字符串转义、可选字段与嵌套集合的样例。
pub fn people() -> Vec<Person> {
    vec![
        Person {
            name: "A".to_owned(),
            age: Some(30),
            tags: vec!["admin".to_owned()],
        },
        Person {
            name: "B \"quoted\" \\ 路径\n".to_owned(),
            age: None,
            tags: Vec::new(),
        },
    ]
}

/// 以字符串为键的映射样例。
pub fn scores() -> BTreeMap<String, i64> {
    BTreeMap::from([
        ("alpha".to_owned(), -1),
        ("beta".to_owned(), 0),
        ("gamma".to_owned(), i64::MAX),
    ])
}
