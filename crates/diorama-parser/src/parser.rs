//! Line classifier and attribute list grammar.
//!
//! The public entry point is [`parse_document`]. Each line is tried, in
//! order, as a delimited-block fence, a line comment, an attribute entry and
//! a block macro; anything else is text.

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::space0,
    combinator::opt,
    error::{ContextError, ErrMode},
    token::{any, one_of, rest, take_till, take_while},
};

use diorama_core::attributes::AttributeMap;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    source::{Directive, Item, ItemKind, SourceDocument},
    span::Span,
};

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Characters that open verbatim blocks whose content is never processed:
/// listing (`----`), literal (`....`), passthrough (`++++`), comment (`////`).
const VERBATIM_FENCES: [char; 4] = ['-', '.', '+', '/'];

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parse an attribute or macro name: a word character followed by word
/// characters and hyphens.
fn name<'s>(input: &mut &'s str) -> IResult<&'s str> {
    (
        one_of(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        take_while(0.., is_name_char),
    )
        .take()
        .parse_next(input)
}

/// Parse an attribute entry: `:name: value`, `:name!:` or `:!name:`.
///
/// Returns the name and `None` for an unset entry.
fn attribute_entry<'s>(input: &mut &'s str) -> IResult<(&'s str, Option<&'s str>)> {
    ':'.parse_next(input)?;
    let leading_bang = opt('!').parse_next(input)?.is_some();
    let name = name.parse_next(input)?;
    let trailing_bang = opt('!').parse_next(input)?.is_some();
    ':'.parse_next(input)?;
    let value = rest.parse_next(input)?;

    // `:name:value` is not an attribute entry
    if !value.is_empty() && !value.starts_with([' ', '\t']) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }

    if leading_bang || trailing_bang {
        Ok((name, None))
    } else {
        Ok((name, Some(value.trim())))
    }
}

/// Parse the head of a block macro up to and including `[`.
///
/// Returns the macro name and target.
fn macro_head<'s>(input: &mut &'s str) -> IResult<(&'s str, &'s str)> {
    let name = (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(0.., is_name_char),
    )
        .take()
        .parse_next(input)?;
    "::".parse_next(input)?;
    let target = take_till(0.., |c: char| c == '[' || c.is_whitespace()).parse_next(input)?;
    '['.parse_next(input)?;
    Ok((name, target))
}

/// Parse a quoted value starting at its opening quote.
///
/// A backslash escapes the quote character; other backslashes are kept.
fn quoted_value(input: &mut &str) -> IResult<String> {
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let mut value = String::new();

    loop {
        let chunk = take_till(0.., |c: char| c == quote || c == '\\').parse_next(input)?;
        value.push_str(chunk);

        match any.parse_next(input)? {
            '\\' => {
                let escaped = any.parse_next(input)?;
                if escaped != quote {
                    value.push('\\');
                }
                value.push(escaped);
            }
            _ => return Ok(value),
        }
    }
}

/// Skip spaces and tabs.
fn skip_space(input: &mut &str) {
    let _: IResult<&str> = space0.parse_next(input);
}

/// Take everything up to the next `,` (or the end of the list).
fn until_comma<'s>(input: &mut &'s str) -> &'s str {
    let taken: IResult<&str> = take_till(0.., ',').parse_next(input);
    taken.unwrap_or_default()
}

/// Parse the prefix of a named entry: `name =`.
fn named_prefix<'s>(input: &mut &'s str) -> IResult<&'s str> {
    (name, space0, '=', space0)
        .map(|(name, ..)| name)
        .parse_next(input)
}

/// Parse the body of an attribute list (the text between `[` and `]`).
///
/// `base` is the absolute offset of the body in the document source and is
/// only used to build spans.
fn attribute_list(body: &str, base: usize) -> Result<AttributeMap, Diagnostic> {
    let mut input = body;
    let offset = |input: &str| base + body.len() - input.len();

    let mut attributes = AttributeMap::new();
    let mut positional = 0;

    loop {
        skip_space(&mut input);
        if input.is_empty() {
            break;
        }

        let entry_start = offset(input);
        let checkpoint = input;
        let entry_name = match named_prefix.parse_next(&mut input) {
            Ok(name) => Some(name),
            Err(_) => {
                input = checkpoint;
                None
            }
        };

        if entry_name.is_none() && input.starts_with('=') {
            return Err(Diagnostic::error("attribute name is empty")
                .with_code(ErrorCode::E102)
                .with_label(
                    Span::new(entry_start..entry_start + 1),
                    "expected a name before `=`",
                )
                .with_help("write the entry as `name=value`"));
        }

        let value = if input.starts_with(['"', '\'']) {
            let value_start = offset(input);
            let value = quoted_value.parse_next(&mut input).map_err(|_| {
                Diagnostic::error("unterminated quoted value")
                    .with_code(ErrorCode::E101)
                    .with_label(
                        Span::new(value_start..base + body.len()),
                        "closing quote is missing",
                    )
                    .with_secondary_label(
                        Span::new(value_start..value_start + 1),
                        "value starts here",
                    )
                    .with_help("add the closing quote before `]`")
            })?;

            skip_space(&mut input);
            if !input.is_empty() && !input.starts_with(',') {
                let unexpected_start = offset(input);
                let unexpected = until_comma(&mut input);
                return Err(Diagnostic::error("unexpected text after quoted value")
                    .with_code(ErrorCode::E103)
                    .with_label(
                        Span::new(unexpected_start..unexpected_start + unexpected.len()),
                        "expected `,` or the end of the attribute list",
                    )
                    .with_help("quote the whole value or separate entries with `,`"));
            }
            value
        } else {
            until_comma(&mut input).trim().to_string()
        };

        match entry_name {
            Some(name) => {
                attributes.insert(name, value);
            }
            None => {
                positional += 1;
                attributes.insert(positional.to_string(), value);
            }
        }

        let _: IResult<Option<char>> = opt(',').parse_next(&mut input);
    }

    Ok(attributes)
}

/// Try to read a block macro directive from one line.
///
/// Returns `Ok(None)` for lines that are not directives, including lines that
/// merely look like a macro followed by prose (`a::b[c] and more`).
fn directive(line: &str, line_start: usize) -> Result<Option<Directive>, Diagnostic> {
    let mut input = line;
    let Ok((name, target)) = macro_head.parse_next(&mut input) else {
        return Ok(None);
    };

    let open = line_start + line.len() - input.len() - 1;
    let rest = input.trim_end();

    match rest.strip_suffix(']') {
        Some(body) => {
            let attributes = attribute_list(body, open + 1)?;
            trace!(name, target; "Directive parsed");
            Ok(Some(Directive::new(name, target, attributes)))
        }
        None if rest.contains(']') => Ok(None),
        None => Err(Diagnostic::error("unterminated attribute list")
            .with_code(ErrorCode::E100)
            .with_label(
                Span::new(open..line_start + line.trim_end().len()),
                "expected `]` at the end of the line",
            )
            .with_help("close the attribute list with `]`")),
    }
}

/// Returns `true` for fences of verbatim delimited blocks (`----`, `....`, ...).
fn is_verbatim_fence(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some(first) if VERBATIM_FENCES.contains(&first) => {
            line.len() >= 4 && chars.all(|c| c == first)
        }
        _ => false,
    }
}

/// Classify every line of `source`.
pub(crate) fn parse_document(source: &str) -> Result<SourceDocument, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut items = Vec::new();
    let mut open_fence: Option<(&str, Span)> = None;
    let mut offset = 0;

    for (idx, raw) in source.split_inclusive('\n').enumerate() {
        let text = raw.trim_end_matches(['\n', '\r']);
        let span = Span::new(offset..offset + text.len());
        let line = idx + 1;
        offset += raw.len();

        if let Some((fence, _)) = open_fence {
            if text == fence {
                open_fence = None;
            }
            items.push(Item::new(line, span, text, ItemKind::Text));
            continue;
        }

        if is_verbatim_fence(text) {
            open_fence = Some((text, span));
            items.push(Item::new(line, span, text, ItemKind::Text));
            continue;
        }

        let kind = if text.starts_with("//") {
            ItemKind::Text
        } else if let Ok((name, value)) = attribute_entry.parse_next(&mut &*text) {
            ItemKind::AttributeEntry {
                name: name.to_string(),
                value: value.map(str::to_string),
            }
        } else {
            match directive(text, span.start()) {
                Ok(Some(directive)) => ItemKind::Directive(directive),
                Ok(None) => ItemKind::Text,
                Err(diagnostic) => {
                    collector.emit(diagnostic);
                    ItemKind::Text
                }
            }
        };

        items.push(Item::new(line, span, text, kind));
    }

    if let Some((fence, span)) = open_fence {
        collector.emit(
            Diagnostic::warning("delimited block is never closed")
                .with_code(ErrorCode::W001)
                .with_label(span, "block opened here")
                .with_help(format!("add a closing `{fence}` line")),
        );
    }

    let warnings = collector.finish()?;
    debug!(lines = items.len(), warnings = warnings.len(); "Document parsed");

    Ok(SourceDocument::new(items, warnings))
}
