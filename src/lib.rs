//! # srcsrv
//!
//! Decoding engine for JavaScript source maps (revision 3), and the library
//! half of the `srcsrv` tool that recovers original source trees from them.
//!
//! ## Getting Started
//!
//! ```
//! use srcsrv::SourceMap;
//!
//! let sm = SourceMap::parse(r#"{
//!     "version": 3,
//!     "sources": ["src/main.ts"],
//!     "sourcesContent": ["export const answer = 42;\n"],
//!     "names": ["answer"],
//!     "mappings": ";;UAAaA"
//! }"#).unwrap();
//!
//! // Where does line 2, column 12 of the generated file come from?
//! let original = sm.original_position_for(2, 12).unwrap();
//! assert_eq!(original.source, Some("src/main.ts"));
//! assert_eq!(original.name, Some("answer"));
//!
//! // Recover the original file
//! let content = sm.source_content_for("src/main.ts", false).unwrap();
//! assert_eq!(content, Some("export const answer = 42;\n"));
//! ```
//!
//! ## Overview
//!
//! ### `SourceMap`
//!
//! [SourceMap] owns the parsed document and its decoded mapping table. It is
//! built once and only read afterwards, so it can be shared between threads.
//!
//! ### `Position`
//!
//! [Position] represents a 0-based line and 0-based column in a file.
//!
//! ### `Mapping`
//!
//! [Mapping] presents one decoded segment of `mappings`; [Mappings] is the
//! whole table, sorted by generated position.
//!
//! ### `vlq`
//!
//! [vlq] holds the base64 VLQ codec the `mappings` field is written in.

mod error;
mod finder;
mod mapping;
mod mappings;
mod sourcemap;
mod splitter;
pub mod vlq;

pub use error::*;
pub use finder::*;
pub use mapping::*;
pub use mappings::*;
pub use sourcemap::*;
