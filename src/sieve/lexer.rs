/// SIEVE script tokenizer (RFC 3028 §2 / §8.1).
use crate::error::SieveError;
use crate::model::script::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A `:tag` like `:is`, `:contains`, `:over`, `:domain`, etc. Lowercased.
    Tag(String),
    /// An unquoted identifier like `if`, `header`, `allof`, `fileinto`, etc.
    Identifier(String),
    /// A double-quoted string, kept verbatim including quotes and escapes.
    QuotedString(String),
    /// A multi-line string `text:\r\n...\r\n.\r\n`, kept verbatim.
    MultiLineString(String),
    /// A numeric value, possibly with K/M/G suffix.
    Number(String),
    /// A `# ...` single-line comment.
    Comment(String),
    /// A `/* ... */` block comment.
    BlockComment(String),
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
}

impl Token {
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_) | Self::BlockComment(_))
    }

    /// Short human description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            Self::Tag(t) => format!("tag '{t}'"),
            Self::Identifier(s) => format!("identifier '{s}'"),
            Self::QuotedString(_) | Self::MultiLineString(_) => "string".to_string(),
            Self::Number(n) => format!("number {n}"),
            Self::Comment(_) | Self::BlockComment(_) => "comment".to_string(),
            Self::Semicolon => "';'".to_string(),
            Self::Comma => "','".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub token: Token,
    pub position: Position,
}

/// Maps byte offsets to line/column positions.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(input: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            input
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Span>, SieveError> {
    let index = LineIndex::new(input);
    let error = |message: String, offset: usize| SieveError::syntax(message).at(index.position(offset));

    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    let mut push = |token: Token, start: usize| {
        tokens.push(Span {
            token,
            position: index.position(start),
        });
    };

    while i < bytes.len() {
        // Skip whitespace
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        match bytes[i] {
            b';' | b',' | b'(' | b')' | b'{' | b'}' | b'[' | b']' => {
                let token = match bytes[i] {
                    b';' => Token::Semicolon,
                    b',' => Token::Comma,
                    b'(' => Token::LParen,
                    b')' => Token::RParen,
                    b'{' => Token::LBrace,
                    b'}' => Token::RBrace,
                    b'[' => Token::LBracket,
                    _ => Token::RBracket,
                };
                i += 1;
                push(token, start);
            }

            // Single-line comment: # ...
            b'#' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                let text = input[start + 1..i].trim().to_string();
                push(Token::Comment(text), start);
            }

            // Block comment: /* ... */
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i += 2;
                let comment_start = i;
                loop {
                    if i + 1 >= bytes.len() {
                        return Err(error("unterminated block comment".to_string(), start));
                    }
                    if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                        break;
                    }
                    i += 1;
                }
                let text = input[comment_start..i].trim().to_string();
                i += 2; // skip */
                push(Token::BlockComment(text), start);
            }

            // Quoted string
            b'"' => {
                i += 1;
                loop {
                    if i >= bytes.len() {
                        return Err(error("unterminated string".to_string(), start));
                    }
                    if bytes[i] == b'\\' && i + 1 < bytes.len() {
                        i += 2;
                    } else if bytes[i] == b'"' {
                        i += 1;
                        break;
                    } else {
                        i += 1;
                    }
                }
                push(Token::QuotedString(input[start..i].to_string()), start);
            }

            // Multi-line string: text:
            b't' | b'T'
                if input
                    .get(i..i + 5)
                    .is_some_and(|p| p.eq_ignore_ascii_case("text:")) =>
            {
                i += 5;
                // Skip to end of line
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                if i < bytes.len() {
                    i += 1; // skip \n
                }
                // Read until a line that is just "."
                loop {
                    if i >= bytes.len() {
                        return Err(error("unterminated multi-line string".to_string(), start));
                    }
                    if bytes[i] == b'.' {
                        let next = i + 1;
                        if next >= bytes.len()
                            || bytes[next] == b'\n'
                            || (bytes[next] == b'\r'
                                && next + 1 < bytes.len()
                                && bytes[next + 1] == b'\n')
                        {
                            // Skip past the dot and newline
                            i += 1;
                            if i < bytes.len() && bytes[i] == b'\r' {
                                i += 1;
                            }
                            if i < bytes.len() && bytes[i] == b'\n' {
                                i += 1;
                            }
                            push(Token::MultiLineString(input[start..i].to_string()), start);
                            break;
                        }
                    }
                    // Skip to next line
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    if i < bytes.len() {
                        i += 1;
                    }
                }
            }

            // Tag: :identifier
            b':' => {
                i += 1;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                if i == start + 1 {
                    return Err(error("expected tag name after ':'".to_string(), start));
                }
                push(Token::Tag(input[start..i].to_lowercase()), start);
            }

            // Number
            b'0'..=b'9' => {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                // Optional K/M/G suffix
                if i < bytes.len() && matches!(bytes[i], b'K' | b'k' | b'M' | b'm' | b'G' | b'g')
                {
                    i += 1;
                }
                push(Token::Number(input[start..i].to_string()), start);
            }

            // Identifier
            _ if bytes[i].is_ascii_alphabetic() || bytes[i] == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                push(Token::Identifier(input[start..i].to_string()), start);
            }

            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(error(format!("unexpected character '{ch}'"), start));
            }
        }
    }

    Ok(tokens)
}
