use std::io::{self, Write};

use spark_json::{JsonCodec, JsonError, TypeDescriptor, TypedTarget};

use crate::case::{TckCase, TckSuite};
use crate::support::{Person, decode, people};

const CASES: &[TckCase] = &[
    TckCase {
        name: "byte_stream_matches_text",
        test: byte_stream_matches_text,
    },
    TckCase {
        name: "writer_matches_text",
        test: writer_matches_text,
    },
    TckCase {
        name: "reader_matches_text",
        test: reader_matches_text,
    },
    TckCase {
        name: "broken_sink_is_io",
        test: broken_sink_is_io,
    },
];

const SUITE: TckSuite = TckSuite {
    name: "streams",
    cases: CASES,
};

pub const fn suite() -> &'static TckSuite {
    &SUITE
}

/// 写入总是失败的输出端。
struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn byte_stream_matches_text(codec: &dyn JsonCodec) {
    let original = people();
    let text = codec.serialize(&original).expect("文本编码");
    let bytes = codec
        .to_byte_stream(&original, &TypeDescriptor::of::<Vec<Person>>())
        .expect("字节流编码")
        .into_bytes()
        .expect("读尽字节流");
    assert_eq!(bytes, text.as_bytes(), "字节流必须与文本逐字节一致");
}

fn writer_matches_text(codec: &dyn JsonCodec) {
    let original = people();
    let text = codec.serialize(&original).expect("文本编码");
    let mut written = Vec::new();
    codec.to_writer(&original, &mut written).expect("写出");
    assert_eq!(written, text.as_bytes(), "写出端必须与文本逐字节一致");
}

fn reader_matches_text(codec: &dyn JsonCodec) {
    let original = people();
    let text = codec.serialize(&original).expect("文本编码");
    let mut target = TypedTarget::<Vec<Person>>::new();
    let mut reader = text.as_bytes();
    codec.from_reader(&mut reader, &mut target).expect("读入");
    let from_reader = target.into_value().expect("成功时目标必须被填充");
    let from_text: Vec<Person> = decode(codec, &text).expect("文本解析");
    assert_eq!(from_reader, from_text);
    assert_eq!(from_reader, original);
}

fn broken_sink_is_io(codec: &dyn JsonCodec) {
    let mut sink = BrokenSink;
    let err = codec
        .to_writer(&people(), &mut sink)
        .expect_err("失效的输出端必须报错");
    assert!(matches!(err, JsonError::Io(_)), "应归类为 Io，实际：{err:?}");
}
