//! spark-json 编解码契约测试套件（TCK）。
//!
//! # 教案式综述（Why / How / What）
//! - **为什么存在**：门面只有在“默认实现生效”与“插件生效”对调用方不可区分时才有意义；
//!   本 crate 把这些不变式沉淀为可复用的用例，任何 [`JsonCodec`] 实现都能在自己的测试里一键运行。
//! - **如何集成**：在实现方的 `tests` 目录中构造编解码实例，调用 [`run_codec_suite`]
//!   （或单独调用 `run_*_suite`）即可；失败信息会携带“套件/用例”上下文。
//! - **覆盖范围**：往返与确定性、非法输入分类、单参数泛型重建、流式输出一致性。
//!
//! # 契约说明（What）
//! - 用例只通过 [`JsonCodec`] 的对象安全接口驱动实现，不依赖门面或全局状态；
//! - 对泛型形状，实现可以正确重建，也可以显式返回 `UnsupportedShape`，两者都视为合规。
//!
//! ```rust
//! use spark_json::DefaultJsonCodec;
//!
//! spark_json_tck::run_codec_suite(&DefaultJsonCodec::new());
//! ```

mod encoding;
mod generic;
mod malformed;
mod round_trip;
mod streams;
mod support;

use case::{TckSuite, run_suite};
use spark_json::JsonCodec;

pub use case::TckCase;

const ALL_SUITES: [&TckSuite; 5] = [
    round_trip::suite(),
    encoding::suite(),
    malformed::suite(),
    generic::suite(),
    streams::suite(),
];

pub mod case {
    use super::support;
    use spark_json::JsonCodec;
    use std::panic;

    /// 表示单个 TCK 用例的元信息。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：以结构体封装测试函数与名称，便于统一遍历并在失败时打印上下文；
    /// - **逻辑 (How)**：`test` 为接收被测实现的函数指针，使 `const` 数组定义成为可能；
    /// - **契约 (What)**：`test` 必须在失败时 `panic`，名称会用于错误提示。
    #[derive(Clone, Copy)]
    pub struct TckCase {
        /// 用例的人类可读名称。
        pub name: &'static str,
        /// 实际执行的断言逻辑。
        pub test: fn(&dyn JsonCodec),
    }

    /// 代表同一主题的一组 TCK 用例。
    #[derive(Clone, Copy)]
    pub struct TckSuite {
        /// 套件名称。
        pub name: &'static str,
        /// 归属该套件的用例集合。
        pub cases: &'static [TckCase],
    }

    /// 在捕获 panic 的前提下对 `codec` 执行整个套件。
    pub fn run_suite(suite: &TckSuite, codec: &dyn JsonCodec) {
        assert!(!suite.cases.is_empty(), "TCK 套件不应为空");
        for case in suite.cases {
            let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| (case.test)(codec)));
            if let Err(payload) = outcome {
                support::panic_with_context(
                    codec.descriptor().name(),
                    suite.name,
                    case.name,
                    payload,
                );
            }
        }
    }
}

/// 返回所有套件，顺序与 [`run_codec_suite`] 的执行顺序一致。
pub fn all_suites() -> &'static [&'static TckSuite] {
    &ALL_SUITES
}

/// 对 `codec` 运行全部套件。
pub fn run_codec_suite(codec: &dyn JsonCodec) {
    for suite in all_suites() {
        run_suite(suite, codec);
    }
}

/// 往返与确定性：`decode(encode(v)) == v`，相同的值产出相同的文本。
pub fn run_round_trip_suite(codec: &dyn JsonCodec) {
    run_suite(round_trip::suite(), codec);
}

/// 无法表示的值必须以 `Encode` 失败。
pub fn run_encoding_suite(codec: &dyn JsonCodec) {
    run_suite(encoding::suite(), codec);
}

/// 非法输入的错误分类与“失败不留半成品”。
pub fn run_malformed_suite(codec: &dyn JsonCodec) {
    run_suite(malformed::suite(), codec);
}

/// 单参数泛型目标：正确重建，或显式拒绝。
pub fn run_generic_suite(codec: &dyn JsonCodec) {
    run_suite(generic::suite(), codec);
}

/// 字节流、写出端与读入端和文本接口保持一致。
pub fn run_streams_suite(codec: &dyn JsonCodec) {
    run_suite(streams::suite(), codec);
}
