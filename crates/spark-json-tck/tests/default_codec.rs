use spark_json::{DefaultCodecConfig, DefaultJsonCodec};

#[test]
fn compact_default_codec_passes_the_suite() {
    spark_json_tck::run_codec_suite(&DefaultJsonCodec::new());
}

#[test]
fn pretty_default_codec_passes_the_suite() {
    let config = DefaultCodecConfig::from_toml_str("pretty = true\nindent = 4\n")
        .expect("配置片段合法");
    spark_json_tck::run_codec_suite(&DefaultJsonCodec::with_config(config));
}

#[test]
fn suites_are_listed_in_execution_order() {
    let names: Vec<_> = spark_json_tck::all_suites()
        .iter()
        .map(|suite| suite.name)
        .collect();
    assert_eq!(
        names,
        ["round_trip", "encoding", "malformed", "generic", "streams"]
    );
    assert!(
        spark_json_tck::all_suites()
            .iter()
            .all(|suite| !suite.cases.is_empty())
    );
}
