//! Golden-file tests over `testdata/`.
//!
//! Each subdirectory names a configuration; every `<name>.input.bin` in it
//! must transcode to `<name>.expected.bin`, and transcoding the expected
//! bytes again must leave them unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use stridecodec::{
    Normalization, PaddingPolicy, TargetVariant, TranscodeConfig, Transcoder, transcode,
};
use walkdir::WalkDir;

fn config_for(dir: &str) -> TranscodeConfig {
    match dir {
        "preserve" => TranscodeConfig::new(),
        "force-packed" => TranscodeConfig::new().with_target(TargetVariant::ForcePacked),
        "force-strided-16" => TranscodeConfig::new()
            .with_target(TargetVariant::ForceStrided)
            .with_default_stride(16),
        "zero-padding" => TranscodeConfig::new().with_padding(PaddingPolicy::Zero),
        "redeye" => TranscodeConfig::new().with_normalization(Normalization::RedEyeCorrection),
        other => panic!("no configuration for fixture directory {other:?}"),
    }
}

fn fixtures() -> Vec<(PathBuf, PathBuf, TranscodeConfig)> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata");
    let mut found = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.unwrap();
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(stem) = name.strip_suffix(".input.bin") else {
            continue;
        };
        let dir = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap();
        let expected = path.with_file_name(format!("{stem}.expected.bin"));
        found.push((path.to_path_buf(), expected, config_for(dir)));
    }
    found
}

#[test]
fn fixtures_present() {
    assert!(fixtures().len() >= 10);
}

#[test]
fn fixtures_match_expected() {
    for (input_path, expected_path, config) in fixtures() {
        let input = fs::read(&input_path).unwrap();
        let expected = fs::read(&expected_path)
            .unwrap_or_else(|e| panic!("{}: {e}", expected_path.display()));
        let output = transcode(&input, &config)
            .unwrap_or_else(|e| panic!("{}: {e}", input_path.display()));
        assert_eq!(output, expected, "{}", input_path.display());
    }
}

#[test]
fn fixtures_are_idempotent() {
    for (_, expected_path, config) in fixtures() {
        let expected = fs::read(&expected_path).unwrap();
        let again = transcode(&expected, &config).unwrap();
        assert_eq!(again, expected, "{}", expected_path.display());
    }
}

#[test]
fn fixture_spans_cover_input() {
    for (input_path, _, config) in fixtures() {
        let input = fs::read(&input_path).unwrap();
        let output = Transcoder::new(config).transcode(&input).unwrap();
        let mut input_end = 0;
        let mut output_end = 0;
        for span in output.spans() {
            assert_eq!(span.input_offset, input_end, "{}", input_path.display());
            assert_eq!(span.output_offset, output_end, "{}", input_path.display());
            input_end += span.input_len;
            output_end += span.output_len;
        }
        assert_eq!(input_end, input.len());
        assert_eq!(output_end, output.len());
    }
}

#[test]
fn fixtures_reject_truncation() {
    for (input_path, _, config) in fixtures() {
        let input = fs::read(&input_path).unwrap();
        if input.is_empty() {
            continue;
        }
        let result = transcode(&input[..input.len() - 1], &config);
        assert!(result.is_err(), "{}", input_path.display());
    }
}
