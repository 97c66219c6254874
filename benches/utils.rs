#![allow(dead_code)]

use srcsrv::vlq;

pub const SOURCES: u32 = 8;
pub const NAMES: u32 = 16;
pub const COLUMN_STEP: u32 = 7;

/// Original location of segment `segment` on generated line `line`.
pub fn expected(line: u32, segment: u32) -> (u32, u32, u32) {
    (line % SOURCES, line, segment * 3)
}

/// Builds a v3 source map with `lines` lines of `segments` segments each.
///
/// Every segment carries a source; every fourth one a name.
pub fn synthetic_map(lines: u32, segments: u32) -> Vec<u8> {
    let mut mappings = String::new();
    let (mut source, mut original_line, mut original_col, mut name) = (0i64, 0i64, 0i64, 0i64);

    for line in 0..lines {
        if line > 0 {
            mappings.push(';');
        }
        let mut generated_col = 0i64;
        for segment in 0..segments {
            if segment > 0 {
                mappings.push(',');
            }
            let col = i64::from(segment * COLUMN_STEP);
            vlq::encode((col - generated_col) as i32, &mut mappings);
            generated_col = col;

            let (s, l, c) = expected(line, segment);
            let (s, l, c) = (i64::from(s), i64::from(l), i64::from(c));
            vlq::encode((s - source) as i32, &mut mappings);
            vlq::encode((l - original_line) as i32, &mut mappings);
            vlq::encode((c - original_col) as i32, &mut mappings);
            (source, original_line, original_col) = (s, l, c);

            if segment % 4 == 0 {
                let n = i64::from((line + segment) % NAMES);
                vlq::encode((n - name) as i32, &mut mappings);
                name = n;
            }
        }
    }

    let map = serde_json::json!({
        "version": 3,
        "file": "bundle.min.js",
        "sourceRoot": "webpack://bench/",
        "sources": (0..SOURCES).map(|i| format!("src/module{i}.ts")).collect::<Vec<_>>(),
        "sourcesContent": (0..SOURCES).map(|i| format!("export const m{i} = {i};\n")).collect::<Vec<_>>(),
        "names": (0..NAMES).map(|i| format!("ident{i}")).collect::<Vec<_>>(),
        "mappings": mappings,
    });
    serde_json::to_vec(&map).unwrap()
}
