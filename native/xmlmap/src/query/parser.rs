//! Query Parser
//!
//! Grammar:
//!
//! ```text
//! union     := path ('|' path)*
//! path      := '.' | './' step | step
//! step      := axis? test predicate?
//! axis      := 'self::' | 'child::' | 'attribute::' | '@'
//!            | 'following-sibling::' | 'preceding-sibling::'
//! test      := '*' | 'text()' | 'node()' | QName
//! predicate := '[' 'name()' '=' literal ']'
//! ```

use crate::error::{Error, Result};

/// Supported axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Self_,
    Child,
    Attribute,
    FollowingSibling,
    PrecedingSibling,
}

/// Node tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// `*` - any node of the axis' principal type
    Any,
    /// A qualified name
    Name(String),
    /// `text()`
    Text,
    /// `node()`
    Node,
}

/// One location step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    /// `[name() = '...']`
    pub name_filter: Option<String>,
}

/// A union of steps, evaluated from one context node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub branches: Vec<Step>,
}

const AXES: &[(&str, Axis)] = &[
    ("self::", Axis::Self_),
    ("child::", Axis::Child),
    ("attribute::", Axis::Attribute),
    ("following-sibling::", Axis::FollowingSibling),
    ("preceding-sibling::", Axis::PrecedingSibling),
    ("@", Axis::Attribute),
];

/// Compile an expression
pub fn compile(expr: &str) -> Result<CompiledQuery> {
    let mut parser = Parser { input: expr, pos: 0 };
    let mut branches = vec![parser.path()?];

    loop {
        parser.skip_whitespace();
        if parser.at_end() {
            break;
        }
        if !parser.eat("|") {
            return Err(parser.error("expected `|` or end of expression"));
        }
        branches.push(parser.path()?);
    }

    Ok(CompiledQuery { branches })
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.remaining().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.remaining().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn error(&self, reason: &str) -> Error {
        Error::invalid_query(self.input, format!("{reason} at position {}", self.pos))
    }

    fn path(&mut self) -> Result<Step> {
        self.skip_whitespace();

        if self.remaining().starts_with("..") {
            return Err(self.error("parent steps are not supported"));
        }
        if self.remaining().starts_with('/') {
            return Err(self.error("absolute paths are not supported"));
        }
        if self.eat("./") {
            return self.step();
        }
        if self.eat(".") {
            return Ok(Step {
                axis: Axis::Self_,
                node_test: NodeTest::Node,
                name_filter: None,
            });
        }
        self.step()
    }

    fn step(&mut self) -> Result<Step> {
        let axis = AXES
            .iter()
            .find(|(token, _)| self.remaining().starts_with(token))
            .map(|&(token, axis)| {
                self.pos += token.len();
                axis
            })
            .unwrap_or(Axis::Child);

        let node_test = self.node_test()?;
        let name_filter = self.predicate()?;

        Ok(Step {
            axis,
            node_test,
            name_filter,
        })
    }

    fn node_test(&mut self) -> Result<NodeTest> {
        if self.eat("*") {
            return Ok(NodeTest::Any);
        }
        if self.eat("text()") {
            return Ok(NodeTest::Text);
        }
        if self.eat("node()") {
            return Ok(NodeTest::Node);
        }

        let name = self.qname()?;
        if self.remaining().starts_with("::") {
            return Err(self.error(&format!("unsupported axis `{name}`")));
        }
        Ok(NodeTest::Name(name))
    }

    fn qname(&mut self) -> Result<String> {
        let start = self.pos;
        self.ncname();
        if self.pos == start {
            return Err(self.error("expected a node test"));
        }

        // prefix:local, but not the `::` of an axis
        let rest = self.remaining();
        if rest.starts_with(':') && !rest.starts_with("::") {
            self.pos += 1;
            let local_start = self.pos;
            self.ncname();
            if self.pos == local_start {
                return Err(self.error("expected a local name after `:`"));
            }
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn ncname(&mut self) {
        let len = self
            .remaining()
            .char_indices()
            .find(|&(i, c)| !(c.is_alphanumeric() || c == '_' || (i > 0 && (c == '-' || c == '.'))))
            .map_or(self.remaining().len(), |(i, _)| i);
        self.pos += len;
    }

    fn predicate(&mut self) -> Result<Option<String>> {
        self.skip_whitespace();
        if !self.eat("[") {
            return Ok(None);
        }

        self.skip_whitespace();
        if !self.eat("name()") {
            return Err(self.error("only `name() = '...'` predicates are supported"));
        }
        self.skip_whitespace();
        if !self.eat("=") {
            return Err(self.error("expected `=`"));
        }
        self.skip_whitespace();
        let literal = self.literal()?;
        self.skip_whitespace();
        if !self.eat("]") {
            return Err(self.error("expected `]`"));
        }

        Ok(Some(literal))
    }

    fn literal(&mut self) -> Result<String> {
        let quote = match self.remaining().chars().next() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a string literal")),
        };
        self.pos += 1;

        let end = self
            .remaining()
            .find(quote)
            .ok_or_else(|| self.error("unterminated string literal"))?;
        let literal = self.remaining()[..end].to_string();
        self.pos += end + 1;
        Ok(literal)
    }
}
