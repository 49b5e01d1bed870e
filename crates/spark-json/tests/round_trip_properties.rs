//! 往返性质：对受支持的数据形状，`from_json(to_json(v)) == v`。
//!
//! - 紧凑与美化两种输出都参与验证；
//! - 整数覆盖到 `u128`/`i128` 全范围；浮点数不在生成范围内：文本往返不保证逐位一致；
//! - 字节流、写出端与文本三条编码路径的输出必须一致。

use std::collections::BTreeMap;
use std::sync::Arc;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use spark_json::{DefaultCodecConfig, DefaultJsonCodec, JsonFacade, ListOf, MapOf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum Role {
    Admin,
    Guest { invited_by: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Account {
    id: u64,
    balance: u128,
    debt: i128,
    handle: String,
    tags: Vec<String>,
    quota: Option<i32>,
    roles: Vec<Role>,
    labels: BTreeMap<String, bool>,
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Admin),
        ".{0,12}".prop_map(|invited_by| Role::Guest { invited_by }),
    ]
}

fn account() -> impl Strategy<Value = Account> {
    (
        (any::<u64>(), any::<u128>(), any::<i128>()),
        "\\PC{0,24}",
        prop::collection::vec("[a-z0-9_]{0,8}", 0..6),
        any::<Option<i32>>(),
        prop::collection::vec(role(), 0..4),
        prop::collection::btree_map("\\PC{0,8}", any::<bool>(), 0..5),
    )
        .prop_map(|((id, balance, debt), handle, tags, quota, roles, labels)| Account {
            id,
            balance,
            debt,
            handle,
            tags,
            quota,
            roles,
            labels,
        })
}

fn facades() -> [JsonFacade; 2] {
    [
        JsonFacade::with_default_codec(),
        JsonFacade::with_codec(Arc::new(DefaultJsonCodec::with_config(
            DefaultCodecConfig::default().with_pretty(true).with_indent(3),
        ))),
    ]
}

proptest! {
    #[test]
    fn accounts_round_trip(account in account()) {
        for facade in facades() {
            let json = facade.to_json(&account).expect("编码");
            let back: Account = facade.from_json(&json).expect("解码");
            prop_assert_eq!(&back, &account);
        }
    }

    #[test]
    fn generic_lists_round_trip(accounts in prop::collection::vec(account(), 0..4)) {
        let facade = JsonFacade::with_default_codec();
        let json = facade.to_json(&accounts).expect("编码");
        let back = facade.from_json_generic::<ListOf, Account>(&json).expect("泛型解码");
        prop_assert_eq!(back, accounts);
    }

    #[test]
    fn generic_maps_round_trip(
        map in prop::collection::btree_map("\\PC{0,10}", any::<i64>(), 0..8),
    ) {
        let facade = JsonFacade::with_default_codec();
        let json = facade.to_json(&map).expect("编码");
        let back = facade.from_json_generic::<MapOf, i64>(&json).expect("泛型解码");
        prop_assert_eq!(back, map);
    }

    #[test]
    fn all_encoding_paths_agree(account in account()) {
        for facade in facades() {
            let text = facade.to_json(&account).expect("文本");
            let streamed = facade
                .to_byte_stream(&account)
                .expect("字节流")
                .into_bytes()
                .expect("读尽");
            let mut written = Vec::new();
            facade.to_writer(&account, &mut written).expect("写出");
            prop_assert_eq!(&streamed, text.as_bytes());
            prop_assert_eq!(&written, text.as_bytes());
            let back: Account = facade.from_reader(written.as_slice()).expect("读回");
            prop_assert_eq!(&back, &account);
        }
    }
}
