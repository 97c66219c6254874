/// The JSON shape of a source map document, borrowing from the input buffer.
///
/// Unknown properties are ignored; whether required ones are present is
/// decided by the caller.
#[derive(Debug, simd_json_derive::Deserialize)]
#[simd_json(rename_all = "camelCase")]
pub(crate) struct RawSourceMap<'a> {
    pub version: Option<u32>,
    pub file: Option<&'a str>,
    pub sources: Option<Vec<Option<&'a str>>>,
    pub source_root: Option<&'a str>,
    pub sources_content: Option<Vec<Option<&'a str>>>,
    pub names: Option<Vec<&'a str>>,
    pub mappings: Option<&'a str>,
}
