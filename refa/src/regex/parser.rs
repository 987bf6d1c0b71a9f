//! Two-pass parser: pass 1 tokenizes the body, pass 2 builds the [`RegexTree`].
//!
//! Mirrors the shape of `regexp_first_pass`/`regexp_second_pass` in the `re2fa` C sources this
//! engine was distilled from, but pass 2 here is a recursive-descent builder that keeps ancestry
//! on the Rust call stack instead of threading parent pointers through the tree.

use crate::charclass::{classes, ByteSet};
use crate::config::RegexFlags;
use crate::error::ParseError;
use crate::regex::tree::{RegexTree, Repeat};

const MAX_DEPTH: u32 = 240;

/// Parses a full `/body/flags` pattern into a tree and the flags that produced it.
pub fn compile(pattern: &str) -> Result<(RegexTree, RegexFlags), ParseError> {
    let bytes = pattern.as_bytes();
    if bytes.len() < 2 {
        return Err(ParseError::TooShort);
    }
    if bytes[0] != b'/' {
        return Err(ParseError::NoBegin { offset: 0 });
    }
    let last_slash = match bytes[1..].iter().rposition(|&b| b == b'/') {
        Some(p) => p + 1,
        None => return Err(ParseError::NoEnd { offset: bytes.len() }),
    };
    let body = &bytes[1..last_slash];
    let flags = RegexFlags::from_bytes(&bytes[last_slash + 1..]);

    let tokens = tokenize(body)?;
    let tree = build_tree(&tokens, flags)?;
    Ok((tree, flags))
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    BeginEnd,
    LParen,
    RParen,
    Pipe,
    Dot,
    Caret,
    Dollar,
    Byte(u8),
    Class(ByteSet),
    MinMax(u32, Option<u32>),
}

#[derive(Debug, Clone)]
struct TokInfo {
    tok: Tok,
    offset: usize,
}

enum Escaped {
    Byte(u8),
    Class(ByteSet),
}

fn resolve_charset(c: u8) -> ByteSet {
    match c {
        b'd' => classes::digit(),
        b'D' => classes::digit().complement(),
        b'h' => classes::horizontal_space(),
        b'H' => classes::horizontal_space().complement(),
        b's' => classes::whitespace(),
        b'S' => classes::whitespace().complement(),
        b'v' => classes::vertical_space(),
        b'V' => classes::vertical_space().complement(),
        b'w' => classes::word(),
        b'W' => classes::word().complement(),
        _ => unreachable!("resolve_charset called with non-charset byte"),
    }
}

/// Decodes one `\x` escape. `i` indexes the byte right after the backslash; the body's index
/// space (not the whole-pattern one), so callers add 1 for the leading `/` when reporting offsets.
fn decode_escape(body: &[u8], i: usize) -> Result<(Escaped, usize), ParseError> {
    let offset = i + 1;
    let c = *body.get(i).ok_or(ParseError::WrongSyntax { offset })?;
    match c {
        b'{' | b'}' | b'[' | b']' | b'(' | b')' | b'^' | b'$' | b'.' | b'|' | b'*' | b'+'
        | b'?' | b'\\' | b'\'' | b'%' | b'=' | b'/' | b'#' => Ok((Escaped::Byte(c), i + 1)),
        b'a' => Ok((Escaped::Byte(0x07), i + 1)),
        b'e' => Ok((Escaped::Byte(0x1B), i + 1)),
        b'f' => Ok((Escaped::Byte(0x0C), i + 1)),
        b'n' => Ok((Escaped::Byte(0x0A), i + 1)),
        b'r' => Ok((Escaped::Byte(0x0D), i + 1)),
        b't' => Ok((Escaped::Byte(0x09), i + 1)),
        b'x' => {
            let digits = body.get(i + 1..i + 3).ok_or(ParseError::WrongSyntax { offset })?;
            let s = std::str::from_utf8(digits).map_err(|_| ParseError::WrongSyntax { offset })?;
            let v = u8::from_str_radix(s, 16).map_err(|_| ParseError::WrongSyntax { offset })?;
            Ok((Escaped::Byte(v), i + 3))
        }
        b'0' | b'1' => {
            let first = c - b'0';
            let rest = body.get(i + 1..i + 3).ok_or(ParseError::WrongSyntax { offset })?;
            if !rest.iter().all(|b| (b'0'..=b'7').contains(b)) {
                return Err(ParseError::WrongSyntax { offset });
            }
            let v = first * 64 + (rest[0] - b'0') * 8 + (rest[1] - b'0');
            Ok((Escaped::Byte(v), i + 3))
        }
        b'd' | b'D' | b'h' | b'H' | b's' | b'S' | b'v' | b'V' | b'w' | b'W' => {
            Ok((Escaped::Class(resolve_charset(c)), i + 1))
        }
        _ => Err(ParseError::WrongSyntax { offset }),
    }
}

/// One item inside `[...]`: either a plain byte (for range detection) or an already-resolved class.
fn decode_cc_item(body: &[u8], i: usize) -> Result<(Escaped, usize), ParseError> {
    match body.get(i) {
        Some(&b'\\') => decode_escape(body, i + 1),
        Some(&b) => Ok((Escaped::Byte(b), i + 1)),
        None => Err(ParseError::NoClosedBracket { offset: i + 1 }),
    }
}

/// Parses `[...]` starting right after the `[`. Returns the resolved mask (inverse already
/// applied if `^` was present) and the index right after the closing `]`.
fn parse_charclass(body: &[u8], mut i: usize) -> Result<(ByteSet, usize), ParseError> {
    let open_offset = i;
    let mut inverse = false;
    if body.get(i) == Some(&b'^') {
        inverse = true;
        i += 1;
    }
    let mut mask = ByteSet::empty();
    let mut pending: Option<u8> = None;
    let mut first = true;
    loop {
        match body.get(i) {
            None => return Err(ParseError::NoClosedBracket { offset: open_offset }),
            Some(&b']') if !first => {
                i += 1;
                break;
            }
            Some(&b']') => {
                // literal ']' as the first character of the class
                if let Some(p) = pending.take() {
                    mask.insert(p);
                }
                pending = Some(b']');
                i += 1;
                first = false;
            }
            Some(&b'-') => {
                let at_end = matches!(body.get(i + 1), None | Some(&b']'));
                if let Some(p) = pending.take() {
                    if at_end {
                        mask.insert(p);
                        mask.insert(b'-');
                        i += 1;
                    } else {
                        let (hi, ni) = decode_cc_item(body, i + 1)?;
                        match hi {
                            Escaped::Byte(hi) if hi >= p => {
                                mask.union_with(&ByteSet::from_range(p, hi));
                                i = ni;
                            }
                            _ => {
                                mask.insert(p);
                                mask.insert(b'-');
                                i += 1;
                            }
                        }
                    }
                } else {
                    // '-' as the first character of the class: literal
                    mask.insert(b'-');
                    i += 1;
                }
                first = false;
            }
            Some(_) => {
                if let Some(p) = pending.take() {
                    mask.insert(p);
                }
                let (item, ni) = decode_cc_item(body, i)?;
                match item {
                    Escaped::Byte(b) => pending = Some(b),
                    Escaped::Class(m) => mask.union_with(&m),
                }
                i = ni;
                first = false;
            }
        }
    }
    if let Some(p) = pending.take() {
        mask.insert(p);
    }
    let resolved = if inverse { mask.complement() } else { mask };
    Ok((resolved, i))
}

fn parse_minmax(body: &[u8], mut i: usize, offset: usize) -> Result<(u32, Option<u32>, usize), ParseError> {
    let start = i;
    while body.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if i == start {
        return Err(ParseError::WrongSyntax { offset });
    }
    let min: u32 = std::str::from_utf8(&body[start..i])
        .unwrap()
        .parse()
        .map_err(|_| ParseError::WrongSyntax { offset })?;
    let max = if body.get(i) == Some(&b',') {
        i += 1;
        let start2 = i;
        while body.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start2 {
            None
        } else {
            let v: u32 = std::str::from_utf8(&body[start2..i])
                .unwrap()
                .parse()
                .map_err(|_| ParseError::WrongSyntax { offset })?;
            Some(v)
        }
    } else {
        Some(min)
    };
    if body.get(i) != Some(&b'}') {
        return Err(ParseError::WrongSyntax { offset });
    }
    i += 1;
    if let Some(max_v) = max {
        if min > max_v {
            return Err(ParseError::WrongSyntax { offset });
        }
    }
    Ok((min, max, i))
}

fn tokenize(body: &[u8]) -> Result<Vec<TokInfo>, ParseError> {
    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(TokInfo { tok: Tok::BeginEnd, offset: 0 });

    let mut depth: u32 = 0;
    let mut i = 0;
    let mut allows_quant = false;

    while i < body.len() {
        let offset = i + 1;
        let b = body[i];
        match b {
            b'(' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(ParseError::TooDeep { offset, max: MAX_DEPTH });
                }
                out.push(TokInfo { tok: Tok::LParen, offset });
                allows_quant = false;
                i += 1;
            }
            b')' => {
                if depth == 0 {
                    return Err(ParseError::NoOpenBracket { offset });
                }
                depth -= 1;
                out.push(TokInfo { tok: Tok::RParen, offset });
                allows_quant = true;
                i += 1;
            }
            b'|' => {
                out.push(TokInfo { tok: Tok::Pipe, offset });
                allows_quant = false;
                i += 1;
            }
            b'.' => {
                out.push(TokInfo { tok: Tok::Dot, offset });
                allows_quant = true;
                i += 1;
            }
            b'^' => {
                if offset != 1 {
                    return Err(ParseError::NotImplemented { offset });
                }
                out.push(TokInfo { tok: Tok::Caret, offset });
                allows_quant = false;
                i += 1;
            }
            b'$' => {
                if i + 1 != body.len() {
                    return Err(ParseError::NotImplemented { offset });
                }
                out.push(TokInfo { tok: Tok::Dollar, offset });
                allows_quant = false;
                i += 1;
            }
            b'[' => {
                let (mask, ni) = parse_charclass(body, i + 1)?;
                out.push(TokInfo { tok: Tok::Class(mask), offset });
                allows_quant = true;
                i = ni;
            }
            b'\\' => {
                let (esc, ni) = decode_escape(body, i + 1)?;
                match esc {
                    Escaped::Byte(byte) => out.push(TokInfo { tok: Tok::Byte(byte), offset }),
                    Escaped::Class(mask) => out.push(TokInfo { tok: Tok::Class(mask), offset }),
                }
                allows_quant = true;
                i = ni;
            }
            b'*' | b'+' | b'?' | b'{' => {
                if !allows_quant {
                    return Err(ParseError::WrongSyntax { offset });
                }
                let (min, max, ni) = match b {
                    b'*' => (0, None, i + 1),
                    b'+' => (1, None, i + 1),
                    b'?' => (0, Some(1), i + 1),
                    b'{' => parse_minmax(body, i + 1, offset)?,
                    _ => unreachable!(),
                };
                out.push(TokInfo { tok: Tok::MinMax(min, max), offset });
                i = ni;
                // trailing non-greedy marker: accepted, no behavioral effect
                if body.get(i) == Some(&b'?') {
                    i += 1;
                }
                allows_quant = false;
            }
            b'}' => return Err(ParseError::WrongSyntax { offset }),
            _ => {
                out.push(TokInfo { tok: Tok::Byte(b), offset });
                allows_quant = true;
                i += 1;
            }
        }
    }

    if depth != 0 {
        return Err(ParseError::NoClosedBracket { offset: body.len() + 1 });
    }
    out.push(TokInfo { tok: Tok::BeginEnd, offset: body.len() + 1 });
    Ok(out)
}

struct Builder<'a> {
    toks: &'a [TokInfo],
    pos: usize,
    flags: RegexFlags,
}

impl<'a> Builder<'a> {
    fn peek_is(&self, tok: &Tok) -> bool {
        self.toks.get(self.pos).map(|t| &t.tok) == Some(tok)
    }

    fn parse_union(&mut self) -> Result<RegexTree, ParseError> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek_is(&Tok::Pipe) {
            self.pos += 1;
            branches.push(self.parse_concat()?);
        }
        if branches.len() == 1 {
            Ok(branches.pop().unwrap())
        } else {
            Ok(RegexTree::Union(branches))
        }
    }

    fn parse_concat(&mut self) -> Result<RegexTree, ParseError> {
        let mut items = Vec::new();
        loop {
            match self.toks.get(self.pos).map(|t| &t.tok) {
                None | Some(Tok::RParen) | Some(Tok::Pipe) | Some(Tok::BeginEnd) => break,
                Some(Tok::LParen) => {
                    let offset = self.toks[self.pos].offset;
                    self.pos += 1;
                    let inner = self.parse_union()?;
                    if !self.peek_is(&Tok::RParen) {
                        return Err(ParseError::NoClosedBracket { offset });
                    }
                    self.pos += 1;
                    items.push(self.apply_quant(inner));
                }
                Some(Tok::Dot) => {
                    self.pos += 1;
                    let node = RegexTree::any_byte(self.flags.dot_all);
                    items.push(self.apply_quant(node));
                }
                Some(&Tok::Byte(b)) => {
                    self.pos += 1;
                    let node = if self.flags.case_insensitive && b.is_ascii_alphabetic() {
                        let mut mask = ByteSet::empty();
                        mask.insert(b.to_ascii_lowercase());
                        mask.insert(b.to_ascii_uppercase());
                        RegexTree::char_class(mask)
                    } else {
                        RegexTree::Char(b)
                    };
                    items.push(self.apply_quant(node));
                }
                Some(&Tok::Class(mask)) => {
                    self.pos += 1;
                    let mask = if self.flags.case_insensitive {
                        RegexTree::case_fold_mask(&mask)
                    } else {
                        mask
                    };
                    let node = RegexTree::char_class(mask);
                    items.push(self.apply_quant(node));
                }
                Some(Tok::Caret) | Some(Tok::Dollar) => {
                    // Anchors do not produce a node here; they are applied as a whole-tree wrap
                    // by `build_tree` after the full parse.
                    self.pos += 1;
                }
                Some(Tok::MinMax(..)) => {
                    let offset = self.toks[self.pos].offset;
                    return Err(ParseError::WrongSyntax { offset });
                }
            }
        }
        match items.len() {
            0 => Ok(RegexTree::Empty),
            1 => Ok(items.pop().unwrap()),
            _ => Ok(RegexTree::Concat(items)),
        }
    }

    fn apply_quant(&mut self, node: RegexTree) -> RegexTree {
        if let Some(TokInfo { tok: Tok::MinMax(min, max), .. }) = self.toks.get(self.pos) {
            let r = Repeat { min: *min, max: *max };
            self.pos += 1;
            node.repeat(r)
        } else {
            node
        }
    }
}

fn wrap_anchors(tree: RegexTree, has_caret: bool, has_dollar: bool, flags: RegexFlags) -> RegexTree {
    let mut tree = tree;
    let star = || RegexTree::any_byte(true).repeat(Repeat { min: 0, max: None });

    if !has_caret || flags.multiline {
        let prefix = if flags.multiline {
            RegexTree::Union(vec![
                RegexTree::Empty,
                RegexTree::Concat(vec![star(), RegexTree::Char(b'\n')]),
            ])
        } else {
            star()
        };
        tree = RegexTree::Concat(vec![prefix, tree]);
    }

    if !has_dollar || flags.multiline {
        let suffix = if flags.multiline {
            RegexTree::Union(vec![
                RegexTree::Concat(vec![RegexTree::Char(b'\n'), star()]),
                RegexTree::Empty,
            ])
        } else {
            star()
        };
        tree = RegexTree::Concat(vec![tree, suffix]);
    }

    tree
}

fn build_tree(toks: &[TokInfo], flags: RegexFlags) -> Result<RegexTree, ParseError> {
    let has_caret = matches!(toks.get(1).map(|t| &t.tok), Some(Tok::Caret));
    let has_dollar = toks.len() >= 2
        && matches!(toks.get(toks.len() - 2).map(|t| &t.tok), Some(Tok::Dollar));

    let mut builder = Builder { toks, pos: 1, flags };
    let tree = builder.parse_union()?;
    if builder.pos != toks.len() - 1 {
        let offset = toks.get(builder.pos).map(|t| t.offset).unwrap_or(0);
        return Err(ParseError::WrongSyntax { offset });
    }

    Ok(wrap_anchors(tree, has_caret, has_dollar, flags))
}
