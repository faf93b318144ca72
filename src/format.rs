//! Formatter for the slice of TypeScript the generator emits: a list of
//! `type Name = <type>;` aliases whose right-hand side is either a type
//! reference or an object type literal.
//!
//! Layout follows prettier: an object literal stays on one line when the whole
//! line fits in the print width, otherwise every member goes on its own line.

use thiserror::Error;
use unicode_width::UnicodeWidthStr;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("expected {expected} at offset {offset}, found `{found}`")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub print_width: usize,
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 80,
            indent: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'s> {
    Ident(&'s str),
    Eq,
    LBrace,
    RBrace,
    Colon,
    Question,
    Semi,
    Comma,
}

impl Token<'_> {
    fn text(&self) -> &str {
        match self {
            Token::Ident(s) => *s,
            Token::Eq => "=",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Colon => ":",
            Token::Question => "?",
            Token::Semi => ";",
            Token::Comma => ",",
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_ident_part(ch: char) -> bool {
    is_ident_start(ch) || ch.is_alphanumeric()
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token<'_>)>, FormatError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '=' => Token::Eq,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            ':' => Token::Colon,
            '?' => Token::Question,
            ';' => Token::Semi,
            ',' => Token::Comma,
            c if is_ident_start(c) => {
                let mut end = offset + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !is_ident_part(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                Token::Ident(&source[offset..end])
            }
            c => return Err(FormatError::UnexpectedChar { ch: c, offset }),
        };
        tokens.push((offset, token));
    }

    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeExpr<'s> {
    Reference(&'s str),
    Object(Vec<Member<'s>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Member<'s> {
    name: &'s str,
    optional: bool,
    ty: TypeExpr<'s>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeAlias<'s> {
    name: &'s str,
    ty: TypeExpr<'s>,
}

struct Parser<'s> {
    tokens: Vec<(usize, Token<'s>)>,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn peek(&self) -> Option<&Token<'s>> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self, expected: &'static str) -> Result<(usize, Token<'s>), FormatError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FormatError::UnexpectedEof { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(
        &mut self,
        want: Token<'static>,
        expected: &'static str,
    ) -> Result<(), FormatError> {
        let (offset, token) = self.next(expected)?;
        if token != want {
            return Err(FormatError::UnexpectedToken {
                expected,
                found: token.text().to_string(),
                offset,
            });
        }

        Ok(())
    }

    fn ident(&mut self, expected: &'static str) -> Result<&'s str, FormatError> {
        match self.next(expected)? {
            (_, Token::Ident(name)) => Ok(name),
            (offset, token) => Err(FormatError::UnexpectedToken {
                expected,
                found: token.text().to_string(),
                offset,
            }),
        }
    }

    fn type_alias(&mut self) -> Result<TypeAlias<'s>, FormatError> {
        let (offset, keyword) = self.next("`type`")?;
        if keyword != Token::Ident("type") {
            return Err(FormatError::UnexpectedToken {
                expected: "`type`",
                found: keyword.text().to_string(),
                offset,
            });
        }

        let name = self.ident("type name")?;
        self.expect(Token::Eq, "`=`")?;
        let ty = self.type_expr()?;
        self.expect(Token::Semi, "`;`")?;
        Ok(TypeAlias { name, ty })
    }

    fn type_expr(&mut self) -> Result<TypeExpr<'s>, FormatError> {
        match self.next("a type")? {
            (_, Token::Ident(name)) => Ok(TypeExpr::Reference(name)),
            (_, Token::LBrace) => self.object_body(),
            (offset, token) => Err(FormatError::UnexpectedToken {
                expected: "a type",
                found: token.text().to_string(),
                offset,
            }),
        }
    }

    fn object_body(&mut self) -> Result<TypeExpr<'s>, FormatError> {
        let mut members = Vec::new();
        loop {
            if let Some(Token::RBrace) = self.peek() {
                self.pos += 1;
                return Ok(TypeExpr::Object(members));
            }

            let name = self.ident("member name or `}`")?;
            let optional = if let Some(Token::Question) = self.peek() {
                self.pos += 1;
                true
            } else {
                false
            };
            self.expect(Token::Colon, "`:`")?;
            let ty = self.type_expr()?;
            members.push(Member { name, optional, ty });

            match self.next("`;`, `,` or `}`")? {
                (_, Token::Semi | Token::Comma) => continue,
                (_, Token::RBrace) => return Ok(TypeExpr::Object(members)),
                (offset, token) => {
                    return Err(FormatError::UnexpectedToken {
                        expected: "`;`, `,` or `}`",
                        found: token.text().to_string(),
                        offset,
                    })
                }
            }
        }
    }
}

fn parse(source: &str) -> Result<Vec<TypeAlias<'_>>, FormatError> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        pos: 0,
    };
    let mut aliases = Vec::new();
    while parser.peek().is_some() {
        aliases.push(parser.type_alias()?);
    }
    Ok(aliases)
}

/// Display columns, so wide characters count double like they do in prettier.
fn width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn member_head(member: &Member) -> String {
    let optional = if member.optional { "?" } else { "" };
    format!("{}{}: ", member.name, optional)
}

fn flat(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Reference(name) => name.to_string(),
        TypeExpr::Object(members) if members.is_empty() => "{}".to_string(),
        TypeExpr::Object(members) => {
            let inner: Vec<String> = members
                .iter()
                .map(|m| format!("{}{}", member_head(m), flat(&m.ty)))
                .collect();
            format!("{{ {} }}", inner.join("; "))
        }
    }
}

/// Prints `ty` starting at `column`; `suffix` is what follows it on the line.
fn print_type(
    out: &mut String,
    ty: &TypeExpr,
    column: usize,
    depth: usize,
    suffix: &str,
    opts: &FormatOptions,
) {
    let flat_text = flat(ty);
    let members = match ty {
        TypeExpr::Object(members) if !members.is_empty() => members,
        _ => {
            out.push_str(&flat_text);
            return;
        }
    };

    if column + width(&flat_text) + width(suffix) <= opts.print_width {
        out.push_str(&flat_text);
        return;
    }

    let pad = " ".repeat(opts.indent * (depth + 1));
    out.push_str("{\n");
    for member in members {
        let head = member_head(member);
        out.push_str(&pad);
        out.push_str(&head);
        let column = pad.len() + width(&head);
        print_type(out, &member.ty, column, depth + 1, ";", opts);
        out.push_str(";\n");
    }
    out.push_str(&" ".repeat(opts.indent * depth));
    out.push('}');
}

pub fn format_with(source: &str, opts: &FormatOptions) -> Result<String, FormatError> {
    let aliases = parse(source)?;

    let mut out = String::with_capacity(source.len() + 64);
    for (i, alias) in aliases.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let head = format!("type {} = ", alias.name);
        out.push_str(&head);
        print_type(&mut out, &alias.ty, width(&head), 0, ";", opts);
        out.push_str(";\n");
    }

    Ok(out)
}

pub fn format(source: &str) -> Result<String, FormatError> {
    format_with(source, &FormatOptions::default())
}
