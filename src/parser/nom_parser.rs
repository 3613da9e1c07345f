use super::{Literal, RemapDef, TreeDef, TreeRootDef, TreeSource};
use crate::error::LoadError;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{
        alpha1, alphanumeric1, char, digit1, multispace0, newline, none_of, one_of, space0,
    },
    combinator::{map, opt, recognize, value},
    multi::{many0, many1},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn newlines(i: &str) -> IResult<&str, ()> {
    delimited(space0, many1(one_of("\r\n")), space0)(i).map(|(rest, _)| (rest, ()))
}

fn open_paren(i: &str) -> IResult<&str, ()> {
    value((), delimited(space0, char('('), space0))(i)
}

fn close_paren(i: &str) -> IResult<&str, ()> {
    value((), delimited(multispace0, char(')'), space0))(i)
}

fn open_brace(i: &str) -> IResult<&str, ()> {
    value((), delimited(space0, char('{'), space0))(i)
}

fn close_brace(i: &str) -> IResult<&str, ()> {
    value((), delimited(space0, char('}'), space0))(i)
}

fn line_comment<T>(i: &str) -> IResult<&str, Option<T>> {
    let (i, _) = tuple((space0, char('#'), opt(is_not("\n\r"))))(i)?;

    Ok((i, None))
}

fn some<I, R>(f: impl Fn(I) -> IResult<I, R>) -> impl Fn(I) -> IResult<I, Option<R>> {
    move |i| {
        let (i, res) = f(i)?;
        Ok((i, Some(res)))
    }
}

fn str_literal(input: &str) -> IResult<&str, String> {
    let (r, val) = delimited(char('"'), many0(none_of("\"")), char('"'))(input)?;
    Ok((
        r,
        val.iter()
            .collect::<String>()
            .replace("\\\\", "\\")
            .replace("\\n", "\n"),
    ))
}

fn bool_literal(i: &str) -> IResult<&str, Literal> {
    alt((
        value(Literal::Bool(true), tag("true")),
        value(Literal::Bool(false), tag("false")),
    ))(i)
}

/// An integer, or a float if it has a fractional part.
fn num_literal(i: &str) -> IResult<&str, Literal> {
    let (r, text) = recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(i)?;
    let literal = if text.contains('.') {
        text.parse().ok().map(Literal::Float)
    } else {
        text.parse().ok().map(Literal::Int)
    };
    match literal {
        Some(literal) => Ok((r, literal)),
        None => Err(nom::Err::Failure(nom::error::Error::new(
            i,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

fn literal(i: &str) -> IResult<&str, Literal> {
    alt((map(str_literal, Literal::Str), bool_literal, num_literal))(i)
}

#[derive(Debug, PartialEq)]
enum Param {
    Data(String, Literal),
    Remap(RemapDef),
}

/// `key = literal` or `key <- node.key`
fn param(i: &str) -> IResult<&str, Param> {
    let (i, key) = delimited(space0, identifier, space0)(i)?;

    alt((
        map(
            preceded(
                pair(tag("<-"), space0),
                separated_pair(identifier, char('.'), identifier),
            ),
            move |(source_node, source_key)| {
                Param::Remap(RemapDef {
                    key: key.to_owned(),
                    source_node: source_node.to_owned(),
                    source_key: source_key.to_owned(),
                })
            },
        ),
        map(preceded(pair(char('='), space0), literal), move |literal| {
            Param::Data(key.to_owned(), literal)
        }),
    ))(i)
}

fn params(i: &str) -> IResult<&str, Vec<Param>> {
    many0(delimited(
        multispace0,
        param,
        many0(pair(multispace0, char(','))),
    ))(i)
}

fn tree_children(i: &str) -> IResult<&str, Vec<TreeDef>> {
    let (i, _) = many0(newlines)(i)?;

    let (i, v) = many0(delimited(
        space0,
        alt((line_comment, some(tree_node))),
        many0(newlines),
    ))(i)?;

    Ok((i, v.into_iter().flatten().collect()))
}

/// `Type [name] [(params)] [{ children }]`
fn tree_node(i: &str) -> IResult<&str, TreeDef> {
    let (i, ty) = delimited(space0, identifier, space0)(i)?;

    let (i, name) = opt(terminated(identifier, space0))(i)?;

    let (i, params) = opt(delimited(open_paren, params, close_paren))(i)?;

    let (i, children) = opt(delimited(open_brace, tree_children, close_brace))(i)?;

    let (i, _) = opt(line_comment::<()>)(i)?;

    let mut node = TreeDef::new(ty);
    node.name = name.map(str::to_owned);
    node.children = children.unwrap_or_default();
    for param in params.unwrap_or_default() {
        match param {
            Param::Data(key, value) => node.data.push((key, value)),
            Param::Remap(remap) => node.remaps.push(remap),
        }
    }
    Ok((i, node))
}

fn tree_root(i: &str) -> IResult<&str, TreeRootDef> {
    let (i, _) = delimited(multispace0, tag("tree"), space0)(i)?;

    let (i, name) = delimited(space0, identifier, space0)(i)?;

    let (i, _) = delimited(space0, char('='), space0)(i)?;

    let (i, root) = tree_node(i)?;

    Ok((
        i,
        TreeRootDef {
            name: name.to_owned(),
            root,
        },
    ))
}

pub fn parse_file(i: &str) -> IResult<&str, TreeSource> {
    let (i, trees) = many0(alt((
        delimited(multispace0, line_comment, opt(newline)),
        some(tree_root),
    )))(i)?;

    // Eat up trailing newlines to indicate that the input was thoroughly consumed
    let (i, _) = multispace0(i)?;

    Ok((
        i,
        TreeSource {
            tree_defs: trees.into_iter().flatten().collect(),
        },
    ))
}

/// Parses a whole source text, failing if anything is left unparsed.
pub fn parse_source(i: &str) -> Result<TreeSource, LoadError> {
    match parse_file(i) {
        Ok(("", source)) => Ok(source),
        Ok((rest, _)) => Err(LoadError::Parse(format!(
            "unexpected input {:?}",
            rest.lines().next().unwrap_or_default()
        ))),
        Err(e) => Err(LoadError::Parse(e.to_string())),
    }
}
