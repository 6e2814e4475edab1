//! Line-oriented declaration scanner.
//!
//! Extracts the three declaration forms the binder cares about from raw
//! shader text, ignoring everything else:
//!   • `#define NAME VALUE`            (one per line)
//!   • `struct Name { fields... };`    (body may span lines, braces non-nested)
//!   • `uniform [precision] T name[N];` (one per line)
//!
//! This is not a GLSL parser. Lines that do not match a declaration form
//! are skipped without comment.

use crate::error::{Error, ErrorCode};
use crate::scan::{DefineTable, LenToken, RawDecl, RawStruct};

#[derive(Debug, Default, PartialEq)]
pub struct ScanOutput {
    pub defines: DefineTable,
    pub structs: Vec<RawStruct>,
    pub uniforms: Vec<RawDecl>,
}

/// Scan shader source text for defines, struct blocks and uniform lines.
pub fn scan(source: &str) -> Result<ScanOutput, Vec<Error>> {
    let mut out = ScanOutput::default();
    let mut errors = Vec::new();

    scan_structs(source, &mut out, &mut errors);

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if let Some(rest) = line.strip_prefix("#define") {
            if let Some((name, value)) = split_define(rest) {
                out.defines.insert(name.to_string(), value.to_string());
            }
            continue;
        }

        if let Some(pos) = find_keyword(line, "uniform") {
            let mut cur = Cursor::new(&line[pos + "uniform".len()..], line_no);
            if let Some(decl) = cur.read_decl() {
                out.uniforms.push(decl);
            }
        }
    }

    if errors.is_empty() { Ok(out) } else { Err(errors) }
}

/// `#define NAME VALUE` — returns None when the name or value is missing.
/// A trailing `// ...` comment is not part of the value.
fn split_define(rest: &str) -> Option<(&str, &str)> {
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None; // e.g. `#defines`
    }
    let rest = rest.find("//").map_or(rest, |at| &rest[..at]);
    let rest = rest.trim();
    let name_end = rest.find(|c: char| c.is_whitespace())?;
    let (name, value) = rest.split_at(name_end);
    let value = value.trim();
    if name.is_empty() || value.is_empty() { None } else { Some((name, value)) }
}

/// Byte offset of `keyword` in `text` as a whole word, or None.
fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(rel) = text[from..].find(keyword) {
        let at = from + rel;
        let before_ok = at == 0 || !is_ident_byte(bytes[at - 1]);
        let end = at + keyword.len();
        let after_ok = end >= bytes.len() || !is_ident_byte(bytes[end]);
        if before_ok && after_ok {
            return Some(at);
        }
        from = at + keyword.len();
    }
    None
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// 1-based line number of a byte offset.
fn line_of(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

// ─── Struct blocks ───────────────────────────────────────────────────────────

fn scan_structs(source: &str, out: &mut ScanOutput, errors: &mut Vec<Error>) {
    let mut from = 0;
    while let Some(at) = find_keyword(&source[from..], "struct").map(|rel| from + rel) {
        from = at + "struct".len();
        let line = line_of(source, at);

        let mut cur = Cursor::new(&source[from..], line);
        cur.skip_whitespace();
        let name = cur.read_word();
        if name.is_empty() {
            continue; // not a struct declaration (e.g. part of a comment)
        }
        cur.skip_whitespace();
        if cur.peek() != b'{' {
            continue;
        }
        let body_start = from + cur.pos + 1;
        let Some(body_len) = source[body_start..].find('}') else {
            errors.push(Error::new(ErrorCode::D001, line,
                format!("struct `{name}` has no closing `}}`")));
            return;
        };
        let body = &source[body_start..body_start + body_len];

        let mut fields = Vec::new();
        let mut seg_start = 0;
        for (i, ch) in body.char_indices().chain([(body.len(), ';')]) {
            if ch != ';' {
                continue;
            }
            let seg = &body[seg_start..i];
            let seg_line = line_of(source, body_start + seg_start);
            seg_start = i + 1;
            if seg.trim().is_empty() {
                continue;
            }
            let mut field_cur = Cursor::new(seg, seg_line);
            match field_cur.read_decl() {
                Some(decl) => fields.push(decl),
                None => errors.push(Error::new(ErrorCode::D002, seg_line,
                    format!("unreadable field `{}` in struct `{name}`", seg.trim()))),
            }
        }

        out.structs.push(RawStruct { name, fields, line });
        from = body_start + body_len + 1;
    }
}

// ─── Declaration cursor ──────────────────────────────────────────────────────

/// Minimal byte cursor over one declaration: `[precision] Type name [\[N\]]`.
struct Cursor<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
}

const PRECISION_QUALIFIERS: [&str; 3] = ["lowp", "mediump", "highp"];

impl<'a> Cursor<'a> {
    fn new(source: &'a str, line: usize) -> Self {
        Self { source: source.as_bytes(), pos: 0, line }
    }

    /// Parse one declaration. Returns None when the text does not look like
    /// one — callers decide whether that is an error or just a skipped line.
    fn read_decl(&mut self) -> Option<RawDecl> {
        self.skip_whitespace();
        let mut type_name = self.read_word();
        if PRECISION_QUALIFIERS.contains(&type_name.as_str()) {
            self.skip_whitespace();
            type_name = self.read_word();
        }
        self.skip_whitespace();
        let name = self.read_word();
        if type_name.is_empty() || name.is_empty() {
            return None;
        }

        let mut array_len = None;
        self.skip_whitespace();
        if self.peek() == b'[' {
            self.pos += 1;
            self.skip_whitespace();
            let token = self.read_word();
            self.skip_whitespace();
            if token.is_empty() || self.peek() != b']' {
                return None;
            }
            self.pos += 1;
            array_len = Some(match token.parse::<usize>() {
                Ok(n) => LenToken::Literal(n),
                Err(_) => LenToken::Symbol(token),
            });
        }

        Some(RawDecl { type_name, name, array_len, line: self.line })
    }

    fn peek(&self) -> u8 {
        if self.pos >= self.source.len() { 0 } else { self.source[self.pos] }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_byte(self.source[self.pos]) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
