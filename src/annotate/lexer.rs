//! Tokenizer using nom.
//!
//! Splits text into e-mail addresses, numeric runs, words, contractions and
//! single punctuation characters.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{recognize, verify},
    multi::{many0, separated_list1},
    sequence::{pair, tuple},
};

/// A token with its byte span in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split `input` into tokens. Never fails; unrecognized characters become
/// one-character tokens.
pub fn tokenize(input: &str) -> Vec<RawToken<'_>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let start = input.len() - rest.len();
        match parse_token(rest) {
            Ok((remaining, text)) => {
                tokens.push(RawToken {
                    text,
                    start,
                    end: start + text.len(),
                });
                rest = remaining;
            }
            Err(_) => {
                // Unreachable while `punct` accepts any non-space char; skip one.
                let skip = rest.chars().next().map_or(rest.len(), char::len_utf8);
                rest = &rest[skip..];
            }
        }
    }

    tokens
}

fn parse_token(input: &str) -> IResult<&str, &str> {
    alt((email, number, word, contraction, punct))(input)
}

/// `local@domain.tld`; a trailing dot is left for the punctuation rule.
fn email(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        take_while1(|c: char| c.is_ascii_alphanumeric() || "._%+-".contains(c)),
        char('@'),
        separated_list1(
            char('.'),
            take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-'),
        ),
    )))(input)
}

/// Digits with inner separators: `100`, `100.5`, `1,000`, `2023-04-01`.
fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, many0(pair(one_of("-./:,"), digit1))))(input)
}

const CLITICS: &[&str] = &["s", "re", "ve", "ll", "d", "m", "t"];

/// Alphanumeric word with optional inner hyphens, underscores or
/// apostrophes (`o'brien`). A trailing clitic (`'s`) is left for
/// [`contraction`].
fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_word_char),
        many0(alt((
            pair(one_of("-_"), take_while1(is_word_char)),
            pair(
                one_of("'"),
                verify(take_while1(is_word_char), |s: &str| !CLITICS.contains(&s)),
            ),
        ))),
    ))(input)
}

/// `'s`, `'re`, `'t` and friends.
fn contraction(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('\''), take_while1(|c: char| c.is_alphabetic())))(input)
}

fn punct(input: &str) -> IResult<&str, &str> {
    recognize(satisfy(|c| !c.is_whitespace()))(input)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}
