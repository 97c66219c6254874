#![allow(dead_code)]

use srcsrv::vlq;
use std::fs;

pub fn read_file(path: &str) -> Vec<u8> {
    fs::read(path).unwrap()
}

/// One segment as absolute values: generated column, then optionally
/// `(source, original line, original column, name)`.
pub type Segment = (u32, Option<(u32, u32, u32, Option<u32>)>);

/// Writes `lines` as a `mappings` string, segments in the given order.
pub fn encode_mappings(lines: &[Vec<Segment>]) -> String {
    let mut out = String::new();
    let (mut source, mut line, mut column, mut name) = (0i64, 0i64, 0i64, 0i64);

    for (idx, segments) in lines.iter().enumerate() {
        if idx > 0 {
            out.push(';');
        }
        let mut generated_col = 0i64;
        for (seg_idx, (col, original)) in segments.iter().enumerate() {
            if seg_idx > 0 {
                out.push(',');
            }
            vlq::encode((*col as i64 - generated_col) as i32, &mut out);
            generated_col = *col as i64;

            if let Some((s, l, c, n)) = original {
                vlq::encode((*s as i64 - source) as i32, &mut out);
                vlq::encode((*l as i64 - line) as i32, &mut out);
                vlq::encode((*c as i64 - column) as i32, &mut out);
                (source, line, column) = (*s as i64, *l as i64, *c as i64);
                if let Some(n) = n {
                    vlq::encode((*n as i64 - name) as i32, &mut out);
                    name = *n as i64;
                }
            }
        }
    }

    out
}
