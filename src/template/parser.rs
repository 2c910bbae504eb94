//! TMPL mini-language parser.
//!
//! Recursive descent parser for the tag grammar used by the report templates:
//! `<TMPL_VAR NAME>`, `<TMPL_LOOP NAME=X>...</TMPL_LOOP>` and
//! `<TMPL_IF NAME=X>...<TMPL_ELSE>...</TMPL_IF>`. Errors carry the character
//! offset of the offending tag.

use crate::domain::error::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Var(String),
    Loop { name: String, body: Vec<Node> },
    If {
        name: String,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// What stopped a block parse.
enum Terminator {
    Eof,
    Else,
    EndIf,
    EndLoop,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn consume_exact(&mut self, s: &str) -> bool {
        if self.remaining().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Opening tag keyword, which must be followed by whitespace so that
    /// `<TMPL_VARX>` is not read as `<TMPL_VAR X>`.
    fn consume_open_tag(&mut self, keyword: &str) -> bool {
        match self.remaining().strip_prefix(keyword) {
            Some(after) if after.chars().next().is_some_and(char::is_whitespace) => {
                self.pos += keyword.len();
                true
            }
            _ => false,
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), SyntaxError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(SyntaxError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(SyntaxError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    /// Tag name: alphanumerics and underscores, optionally double-quoted.
    fn parse_name(&mut self) -> Result<String, SyntaxError> {
        self.skip_whitespace();
        let quoted = self.peek() == Some('"');
        if quoted {
            self.advance();
        }

        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if name.is_empty() {
            return Err(SyntaxError {
                message: "expected name".to_string(),
                position: self.pos,
            });
        }

        if quoted {
            if self.peek() == Some('"') {
                self.advance();
            } else {
                return Err(SyntaxError {
                    message: "unterminated quoted name".to_string(),
                    position: self.pos,
                });
            }
        }

        Ok(name)
    }

    /// Name attribute: either a bare name or `NAME=name`.
    fn parse_name_attr(&mut self) -> Result<String, SyntaxError> {
        self.skip_whitespace();
        if self.consume_exact("NAME=") {
            return self.parse_name();
        }
        self.parse_name()
    }

    /// Next position at which a template tag starts, if any.
    fn next_tag(&self) -> Option<usize> {
        let rest = self.remaining();
        let mut offset = 0;
        while let Some(idx) = rest[offset..].find('<') {
            let at = offset + idx;
            if rest[at..].starts_with("<TMPL_") || rest[at..].starts_with("</TMPL_") {
                return Some(self.pos + at);
            }
            offset = at + 1;
        }
        None
    }

    /// Parse a run of nodes until a closing construct or end of input.
    fn parse_nodes(&mut self) -> Result<(Vec<Node>, Terminator), SyntaxError> {
        let mut nodes = Vec::new();

        loop {
            let tag_at = match self.next_tag() {
                Some(at) => at,
                None => {
                    if self.pos < self.input.len() {
                        nodes.push(Node::Text(self.remaining().to_string()));
                        self.pos = self.input.len();
                    }
                    return Ok((nodes, Terminator::Eof));
                }
            };

            if tag_at > self.pos {
                nodes.push(Node::Text(self.input[self.pos..tag_at].to_string()));
                self.pos = tag_at;
            }

            if self.consume_exact("<TMPL_ELSE>") {
                return Ok((nodes, Terminator::Else));
            }
            if self.consume_exact("</TMPL_IF>") {
                return Ok((nodes, Terminator::EndIf));
            }
            if self.consume_exact("</TMPL_LOOP>") {
                return Ok((nodes, Terminator::EndLoop));
            }

            if self.consume_open_tag("<TMPL_VAR") {
                let name = self.parse_name_attr()?;
                self.expect_char('>')?;
                nodes.push(Node::Var(name));
                continue;
            }

            if self.consume_open_tag("<TMPL_LOOP") {
                let open_at = self.pos;
                let name = self.parse_name_attr()?;
                self.expect_char('>')?;
                let (body, term) = self.parse_nodes()?;
                match term {
                    Terminator::EndLoop => nodes.push(Node::Loop { name, body }),
                    Terminator::Eof => {
                        return Err(SyntaxError {
                            message: format!("unclosed <TMPL_LOOP NAME={}>", name),
                            position: open_at,
                        });
                    }
                    Terminator::Else | Terminator::EndIf => {
                        return Err(SyntaxError {
                            message: format!(
                                "expected </TMPL_LOOP> to close loop '{}'",
                                name
                            ),
                            position: self.pos,
                        });
                    }
                }
                continue;
            }

            if self.consume_open_tag("<TMPL_IF") {
                let open_at = self.pos;
                let name = self.parse_name_attr()?;
                self.expect_char('>')?;
                let (then, term) = self.parse_nodes()?;
                let (otherwise, term) = match term {
                    Terminator::Else => self.parse_nodes()?,
                    other => (Vec::new(), other),
                };
                match term {
                    Terminator::EndIf => nodes.push(Node::If {
                        name,
                        then,
                        otherwise,
                    }),
                    Terminator::Eof => {
                        return Err(SyntaxError {
                            message: format!("unclosed <TMPL_IF NAME={}>", name),
                            position: open_at,
                        });
                    }
                    Terminator::Else | Terminator::EndLoop => {
                        return Err(SyntaxError {
                            message: format!("expected </TMPL_IF> to close '{}'", name),
                            position: self.pos,
                        });
                    }
                }
                continue;
            }

            // Starts like a tag but matches no known form.
            return Err(SyntaxError {
                message: format!(
                    "unknown template tag: '{}'",
                    tag_preview(self.remaining())
                ),
                position: self.pos,
            });
        }
    }

    fn parse(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let (nodes, term) = self.parse_nodes()?;
        match term {
            Terminator::Eof => Ok(nodes),
            Terminator::Else => Err(SyntaxError {
                message: "<TMPL_ELSE> outside <TMPL_IF>".to_string(),
                position: self.pos,
            }),
            Terminator::EndIf => Err(SyntaxError {
                message: "</TMPL_IF> without matching <TMPL_IF>".to_string(),
                position: self.pos,
            }),
            Terminator::EndLoop => Err(SyntaxError {
                message: "</TMPL_LOOP> without matching <TMPL_LOOP>".to_string(),
                position: self.pos,
            }),
        }
    }
}

fn tag_preview(rest: &str) -> &str {
    match rest.find('>') {
        Some(end) if end < 40 => &rest[..=end],
        _ => {
            let mut cut = rest.len().min(40);
            while !rest.is_char_boundary(cut) {
                cut -= 1;
            }
            &rest[..cut]
        }
    }
}

pub fn parse(input: &str) -> Result<Vec<Node>, SyntaxError> {
    let mut parser = Parser::new(input);
    parser.parse()
}
