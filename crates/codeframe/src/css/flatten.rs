//! Flattening of nested CSS.
//!
//! Base styles are authored with CSS nesting so they read like the markup
//! they target:
//!
//! ```css
//! .codeframe {
//!     margin: 0;
//!     & pre { overflow-x: auto; }
//!     @media (max-width: 30em) { margin: 0 -1rem; }
//! }
//! ```
//!
//! [`flatten_nested_css`] rewrites that into plain rules, so the output keeps
//! working in browsers without nesting support and can be placed inside an
//! `@layer` block as a single unit:
//!
//! ```css
//! .codeframe{margin:0}.codeframe pre{overflow-x:auto}@media (max-width: 30em){.codeframe{margin:0 -1rem}}
//! ```
//!
//! # Rules
//!
//! - A nested selector containing the `&` nesting selector has every one
//!   replaced by the parent selector; any other nested selector is a
//!   descendant of the parent. An `&` inside a string or an escaped
//!   identifier is left alone.
//! - Selector lists combine as a cross product, parents first.
//! - Declarations keep their source order. Declarations that follow a nested
//!   rule start a new rule for the parent.
//! - `@media`, `@supports`, `@container`, `@layer` and `@scope` blocks keep
//!   their prelude and wrap the flattened rules they contain, wherever they
//!   appear. Other at-rules (`@keyframes`, `@font-face`, ...) are copied
//!   verbatim.
//!
//! The parser is built on `cssparser`, so comments, strings and nested
//! parentheses in values are handled by a real tokenizer. Invalid rules are
//! skipped with a warning, as a browser would.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, Token,
};
use tracing::warn;

use super::rule::{at_rule, CssRule};

/// Parses nested CSS and returns the equivalent flat CSS.
pub fn flatten_nested_css(css: &str) -> String {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut nesting = NestingParser;

    let nodes = collect(cssparser::StyleSheetParser::new(&mut parser, &mut nesting));

    let mut out = String::new();
    emit(&nodes, &[], &mut out);
    out
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Declaration { name: String, value: String },
    Rule { selectors: Vec<String>, children: Vec<Node> },
    Group { name: String, prelude: String, children: Vec<Node> },
    Verbatim(String),
}

fn collect<'i, I>(items: I) -> Vec<Node>
where
    I: Iterator<Item = Result<Node, (ParseError<'i, ()>, &'i str)>>,
{
    items
        .filter_map(|item| match item {
            Ok(node) => Some(node),
            Err((_, source)) => {
                warn!(source = source.trim(), "skipping invalid CSS");
                None
            }
        })
        .collect()
}

fn emit(nodes: &[Node], parents: &[String], out: &mut String) {
    let mut pending = CssRule::with_selectors(parents.iter().cloned());

    for node in nodes {
        if let Node::Declaration { name, value } = node {
            if parents.is_empty() {
                warn!(property = %name, "skipping declaration outside of a rule");
            } else {
                pending.push(name.as_str(), value.as_str());
            }
            continue;
        }

        pending.write_to(out);
        pending = CssRule::with_selectors(parents.iter().cloned());

        match node {
            Node::Rule {
                selectors,
                children,
            } => emit(children, &combine(parents, selectors), out),
            Node::Group {
                name,
                prelude,
                children,
            } => {
                let mut inner = String::new();
                emit(children, parents, &mut inner);
                out.push_str(&at_rule(name, prelude, &inner));
            }
            Node::Verbatim(text) => out.push_str(text),
            Node::Declaration { .. } => {}
        }
    }

    pending.write_to(out);
}

fn combine(parents: &[String], selectors: &[String]) -> Vec<String> {
    if parents.is_empty() {
        return selectors.to_vec();
    }
    let nesting: Vec<Vec<usize>> = selectors
        .iter()
        .map(|selector| nesting_positions(selector))
        .collect();
    parents
        .iter()
        .flat_map(|parent| {
            selectors
                .iter()
                .zip(&nesting)
                .map(move |(selector, positions)| {
                    if positions.is_empty() {
                        return format!("{parent} {selector}");
                    }
                    let mut combined = String::with_capacity(selector.len() + parent.len());
                    let mut last = 0;
                    for &position in positions {
                        combined.push_str(&selector[last..position]);
                        combined.push_str(parent);
                        last = position + 1;
                    }
                    combined.push_str(&selector[last..]);
                    combined
                })
        })
        .collect()
}

/// Byte offsets of the `&` nesting selectors in `selector`.
///
/// Only `&` delimiter tokens count, at any parenthesis depth (`:is(&.a)`);
/// an `&` inside a string or an escaped identifier is part of that token.
fn nesting_positions(selector: &str) -> Vec<usize> {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let mut positions = Vec::new();
    collect_nesting_positions(&mut parser, &mut positions);
    positions
}

fn collect_nesting_positions<'i>(input: &mut Parser<'i, '_>, positions: &mut Vec<usize>) {
    loop {
        let start = input.position().byte_index();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Delim('&') => positions.push(start),
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                let _ = input.parse_nested_block(|nested| {
                    collect_nesting_positions(nested, positions);
                    Ok::<(), ParseError<'i, ()>>(())
                });
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// At-rules whose block holds rules (or, when nested, declarations).
fn is_conditional_group(name: &str) -> bool {
    ["media", "supports", "container", "layer", "scope"]
        .iter()
        .any(|group| name.eq_ignore_ascii_case(group))
}

struct NestingParser;

struct AtPrelude {
    name: String,
    prelude: String,
}

impl<'i> QualifiedRuleParser<'i> for NestingParser {
    type Prelude = Vec<String>;
    type QualifiedRule = Node;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let mut selectors = Vec::new();
        let mut start = input.position();

        loop {
            let before = input.position();
            match input.next() {
                Ok(Token::Comma) => {
                    selectors.push(collapse_whitespace(input.slice(start..before)));
                    start = input.position();
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        selectors.push(collapse_whitespace(input.slice_from(start)));

        if selectors.iter().any(String::is_empty) {
            return Err(input.new_custom_error::<(), ()>(()));
        }
        Ok(selectors)
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let children = collect(RuleBodyParser::new(input, self));
        Ok(Node::Rule {
            selectors,
            children,
        })
    }
}

impl<'i> AtRuleParser<'i> for NestingParser {
    type Prelude = AtPrelude;
    type AtRule = Node;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        Ok(AtPrelude {
            name: name.as_ref().to_ascii_lowercase(),
            prelude: collapse_whitespace(input.slice_from(start)),
        })
    }

    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(Node::Verbatim(format!("@{} {};", prelude.name, prelude.prelude)))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        if is_conditional_group(&prelude.name) {
            let children = collect(RuleBodyParser::new(input, self));
            return Ok(Node::Group {
                name: prelude.name,
                prelude: prelude.prelude,
                children,
            });
        }

        let start = input.position();
        while input.next().is_ok() {}
        let body = input.slice_from(start).trim();
        Ok(Node::Verbatim(format!(
            "{}{{{body}}}",
            at_rule_head(&prelude.name, &prelude.prelude)
        )))
    }
}

fn at_rule_head(name: &str, prelude: &str) -> String {
    if prelude.is_empty() {
        format!("@{name}")
    } else {
        format!("@{name} {prelude}")
    }
}

impl<'i> DeclarationParser<'i> for NestingParser {
    type Declaration = Node;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        loop {
            match input.next() {
                // `a:hover { ... }` starts like a declaration; reject it so the
                // body parser retries it as a nested rule.
                Ok(Token::CurlyBracketBlock) => return Err(input.new_custom_error::<(), ()>(())),
                Ok(_) => {}
                Err(_) => break,
            }
        }
        Ok(Node::Declaration {
            name: name.as_ref().to_string(),
            value: input.slice_from(start).trim().to_string(),
        })
    }
}

impl<'i> RuleBodyItemParser<'i, Node, ()> for NestingParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_css_is_compacted() {
        let css = ".a {\n  color: red;\n  margin: 0 auto;\n}\n\n.b, .c { padding: 0 }";
        assert_eq!(
            flatten_nested_css(css),
            ".a{color:red;margin:0 auto}.b,.c{padding:0}"
        );
    }

    #[test]
    fn test_descendant_nesting() {
        assert_eq!(
            flatten_nested_css(".a{color:red;& .b{margin:0}.c{padding:0}}"),
            ".a{color:red}.a .b{margin:0}.a .c{padding:0}"
        );
    }

    #[test]
    fn test_ampersand_compound() {
        assert_eq!(
            flatten_nested_css(".a{&:hover{color:red}&.b{color:blue}}"),
            ".a:hover{color:red}.a.b{color:blue}"
        );
    }

    #[test]
    fn test_ident_selector_with_pseudo_class() {
        assert_eq!(
            flatten_nested_css(".a{pre:hover{color:red}}"),
            ".a pre:hover{color:red}"
        );
    }

    #[test]
    fn test_ampersand_in_attribute_value_is_kept() {
        assert_eq!(
            flatten_nested_css(".a{&[title='x&y']{c:d}}"),
            ".a[title='x&y']{c:d}"
        );
        assert_eq!(
            flatten_nested_css(".a{[data-q=\"&\"]{c:d}}"),
            ".a [data-q=\"&\"]{c:d}"
        );
    }

    #[test]
    fn test_escaped_ampersand_in_identifier_is_kept() {
        assert_eq!(
            flatten_nested_css(".a{& .x\\&y{c:d}}"),
            ".a .x\\&y{c:d}"
        );
    }

    #[test]
    fn test_ampersand_inside_functional_pseudo_class() {
        assert_eq!(
            flatten_nested_css(".a{:is(&.b, .c &){c:d}}"),
            ":is(.a.b, .c .a){c:d}"
        );
    }

    #[test]
    fn test_selector_lists_cross_product() {
        assert_eq!(
            flatten_nested_css(".a,.b{& .c,& .d{x:y}}"),
            ".a .c,.a .d,.b .c,.b .d{x:y}"
        );
    }

    #[test]
    fn test_declaration_order_preserved_around_nested_rules() {
        assert_eq!(
            flatten_nested_css(".a{x:1;& .b{y:2}z:3}"),
            ".a{x:1}.a .b{y:2}.a{z:3}"
        );
    }

    #[test]
    fn test_media_inside_rule() {
        assert_eq!(
            flatten_nested_css(".a{color:red;@media (min-width: 10px){color:blue}}"),
            ".a{color:red}@media (min-width: 10px){.a{color:blue}}"
        );
    }

    #[test]
    fn test_top_level_media_with_nesting() {
        assert_eq!(
            flatten_nested_css("@media (prefers-color-scheme: dark){.a{& .b{c:d}}}"),
            "@media (prefers-color-scheme: dark){.a .b{c:d}}"
        );
    }

    #[test]
    fn test_values_keep_functions_and_commas() {
        assert_eq!(
            flatten_nested_css(".a{color:var(--x, inherit);font-family:'A B', monospace}"),
            ".a{color:var(--x, inherit);font-family:'A B', monospace}"
        );
    }

    #[test]
    fn test_keyframes_verbatim() {
        assert_eq!(
            flatten_nested_css("@keyframes fade{from{opacity:0}to{opacity:1}}"),
            "@keyframes fade{from{opacity:0}to{opacity:1}}"
        );
    }

    #[test]
    fn test_invalid_rule_skipped() {
        assert_eq!(flatten_nested_css(",{x:y}.b{x:y}"), ".b{x:y}");
    }

    #[test]
    fn test_empty_rules_dropped() {
        assert_eq!(flatten_nested_css(".a{& .b{}}"), "");
        assert_eq!(flatten_nested_css("@media (x){.a{}}"), "");
    }
}
