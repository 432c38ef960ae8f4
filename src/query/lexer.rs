/// Lexical token of a search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare term, quoted phrase (quotes kept), or field:value pair
    Value(String),
    And,
    Or,
    LParen,
    RParen,
}

impl Token {
    /// Tokens after which an implicit AND may follow
    pub(crate) fn ends_operand(&self) -> bool {
        matches!(self, Token::Value(_) | Token::RParen)
    }

    /// Tokens before which an implicit AND may be inserted
    pub(crate) fn starts_operand(&self) -> bool {
        matches!(self, Token::Value(_) | Token::LParen)
    }
}

/// Split a query string into tokens, inserting implicit ANDs
/// between adjacent operands.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens: Vec<Token> = Vec::new();

    while let Some(token) = lexer.next_token() {
        if let Some(prev) = tokens.last() {
            if prev.ends_operand() && token.starts_operand() {
                tokens.push(Token::And);
            }
        }
        tokens.push(token);
    }

    tokens
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        match self.peek_char()? {
            '"' => Some(self.scan_phrase()),
            '(' => {
                self.advance();
                Some(Token::LParen)
            }
            ')' => {
                self.advance();
                Some(Token::RParen)
            }
            _ => {
                if self.consume_keyword("AND") {
                    return Some(Token::And);
                }
                if self.consume_keyword("OR") {
                    return Some(Token::Or);
                }
                Some(self.scan_term())
            }
        }
    }

    /// Quoted phrase including its quotes. An unterminated phrase runs to
    /// the end of input.
    fn scan_phrase(&mut self) -> Token {
        let start = self.pos;
        self.advance(); // opening quote

        while let Some(ch) = self.peek_char() {
            self.advance();
            if ch == '"' {
                break;
            }
        }

        Token::Value(self.input[start..self.pos].to_string())
    }

    fn scan_term(&mut self) -> Token {
        let start = self.pos;

        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == '(' || ch == ')' {
                break;
            }
            self.advance();
        }

        Token::Value(self.input[start..self.pos].to_string())
    }

    /// Match an operator keyword only when it stands alone, so `ORANGE`
    /// stays a term.
    fn consume_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.remaining();
        if !rest.starts_with(keyword) {
            return false;
        }

        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .map(|c| c.is_whitespace() || c == '(' || c == ')' || c == '"')
            .unwrap_or(true);

        if boundary {
            self.pos += keyword.len();
        }
        boundary
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map(|c| c.is_whitespace()).unwrap_or(false) {
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }
}
