use memchr::Memchr;

/// Splits a string on a single ASCII separator, yielding empty pieces too.
#[derive(Debug)]
pub(crate) struct Splitter<'a> {
    string: &'a str,
    cur_start: usize,
    memchr: Memchr<'a>,
}

impl<'a> Splitter<'a> {
    pub fn new(string: &'a str, separator: u8) -> Self {
        debug_assert!(separator.is_ascii());
        Self {
            string,
            memchr: memchr::memchr_iter(separator, string.as_bytes()),
            cur_start: 0,
        }
    }
}

impl<'a> Iterator for Splitter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let cur_end = match self.memchr.next() {
            Some(end) => end,
            None => {
                if self.cur_start > self.string.len() {
                    return None;
                }
                self.string.len()
            }
        };
        // separator is ASCII, so both ends are char boundaries
        let s = &self.string[self.cur_start..cur_end];
        self.cur_start = cur_end + 1;
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::Splitter;

    #[test]
    fn test_splitter() {
        let text = ";;yZCTnK,IAAO5F,gBAAkB;IAAOC,oBAAsB;;cAAe";

        let result = Splitter::new(text, b';')
            .map(|line| {
                let segments = Splitter::new(line, b',').collect::<Vec<_>>();
                format!("[{}]", segments.join("|"))
            })
            .collect::<String>();
        insta::assert_snapshot!(result, @"[][][yZCTnK|IAAO5F|gBAAkB][IAAOC|oBAAsB][][cAAe]");
    }

    #[test]
    fn test_splitter_edges() {
        assert_eq!(Splitter::new("", b';').collect::<Vec<_>>(), [""]);
        assert_eq!(Splitter::new(";", b';').collect::<Vec<_>>(), ["", ""]);
        assert_eq!(Splitter::new("A;", b';').collect::<Vec<_>>(), ["A", ""]);
        assert_eq!(Splitter::new("A,,B", b',').collect::<Vec<_>>(), ["A", "", "B"]);
    }
}
