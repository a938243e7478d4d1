use crate::types::SuiAddress;
use serde::Serialize;

/// Move type tag in wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl std::str::FromStr for TypeTag {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s)?;
        let mut p = Parser { tokens, pos: 0 };
        let tag = p.type_tag()?;
        if p.peek().is_some() {
            eyre::bail!("trailing input in type tag: {s}");
        }
        Ok(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Lt,
    Gt,
    Comma,
    ColonColon,
}

fn tokenize(s: &str) -> eyre::Result<Vec<Token>> {
    let mut out = vec![];
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' => out.push(Token::Lt),
            '>' => out.push(Token::Gt),
            ',' => out.push(Token::Comma),
            ':' => {
                if chars.next() != Some(':') {
                    eyre::bail!("expected '::' in type tag: {s}");
                }
                out.push(Token::ColonColon);
            }
            c if c.is_whitespace() => {}
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut w = String::from(c);
                while let Some(&n) = chars.peek() {
                    if !(n.is_ascii_alphanumeric() || n == '_') {
                        break;
                    }
                    w.push(n);
                    chars.next();
                }
                out.push(Token::Word(w));
            }
            other => eyre::bail!("unexpected character {other:?} in type tag: {s}"),
        }
    }
    Ok(out)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> eyre::Result<Token> {
        let t = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| eyre::eyre!("unexpected end of type tag"))?;
        self.pos = self.pos.saturating_add(1);
        Ok(t)
    }

    fn expect(&mut self, want: &Token) -> eyre::Result<()> {
        let got = self.bump()?;
        if &got != want {
            eyre::bail!("expected {want:?}, found {got:?}");
        }
        Ok(())
    }

    fn identifier(&mut self) -> eyre::Result<String> {
        match self.bump()? {
            Token::Word(w) if w.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') => {
                Ok(w)
            }
            other => eyre::bail!("expected identifier, found {other:?}"),
        }
    }

    fn type_tag(&mut self) -> eyre::Result<TypeTag> {
        let Token::Word(w) = self.bump()? else {
            eyre::bail!("expected a type");
        };
        let tag = match w.as_str() {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            "vector" => {
                self.expect(&Token::Lt)?;
                let inner = self.type_tag()?;
                self.expect(&Token::Gt)?;
                TypeTag::Vector(Box::new(inner))
            }
            addr => TypeTag::Struct(Box::new(self.struct_tag(addr)?)),
        };
        Ok(tag)
    }

    fn struct_tag(&mut self, addr: &str) -> eyre::Result<StructTag> {
        let address = SuiAddress::from_hex_literal(addr)?;
        self.expect(&Token::ColonColon)?;
        let module = self.identifier()?;
        self.expect(&Token::ColonColon)?;
        let name = self.identifier()?;
        let mut type_params = vec![];
        if self.peek() == Some(&Token::Lt) {
            self.pos = self.pos.saturating_add(1);
            loop {
                type_params.push(self.type_tag()?);
                match self.bump()? {
                    Token::Comma => {}
                    Token::Gt => break,
                    other => eyre::bail!("expected ',' or '>', found {other:?}"),
                }
            }
        }
        Ok(StructTag {
            address,
            module,
            name,
            type_params,
        })
    }
}
