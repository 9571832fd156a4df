// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/parser.rs
//!
//! Combo string parser
//!
//! A combo string holds one or more whitespace-separated alternatives,
//! each written as `modifier+modifier+...+key`:
//! - `"s"` → key `s`, no modifiers
//! - `"ctrl+s"` → key `s`, requires CTRL
//! - `"ctrl+s cmd+s"` → two alternatives for the same handler
//!
//! # Architecture
//! Splitting into segments uses nom combinators; interpreting the segments
//! (modifier names, base key) happens afterwards so errors can name the
//! offending segment. The parser only structures data; resolving the base
//! key to a code is the engine's job.

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::all_consuming,
    multi::separated_list1,
    IResult, Parser,
};
use thiserror::Error;

use crate::core::types::{KeyCombo, Modifier};

/// Combo parse errors
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid combo '{combo}': {message}")]
    InvalidSyntax { combo: String, message: String },

    #[error("Unknown modifier '{modifier}' in combo '{combo}'")]
    UnknownModifier { modifier: String, combo: String },
}

/// Split a combo string into its alternatives
///
/// Any run of whitespace separates alternatives; empty tokens are dropped.
pub fn split_alternatives(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}

/// Split one combo token on `+`
///
/// Every segment must be non-empty, so `"ctrl++s"` and `"ctrl+"` fail.
pub fn parse_segments(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(
        char('+'),
        take_while1(|c: char| c != '+'),
    ))
    .parse(input)
}

/// Parse a single combo alternative
///
/// The token is lowercased; every `+` segment but the last is a modifier,
/// the last is the base key.
///
/// # Example
/// ```
/// use view_keys::core::parser::parse_combo;
/// use view_keys::core::Modifier;
///
/// let combo = parse_combo("Ctrl+Shift+K").unwrap();
/// assert_eq!(combo.key, "k");
/// assert_eq!(combo.modifiers, vec![Modifier::Ctrl, Modifier::Shift]);
/// ```
pub fn parse_combo(token: &str) -> Result<KeyCombo, ParseError> {
    let (token, mut segments) = combo_segments(token)?;

    let Some(key) = segments.pop() else {
        return Err(ParseError::InvalidSyntax {
            combo: token,
            message: "missing key".to_string(),
        });
    };
    let modifiers = segments
        .iter()
        .map(|name| {
            Modifier::from_name(name).ok_or_else(|| ParseError::UnknownModifier {
                modifier: name.clone(),
                combo: token.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(KeyCombo::new(modifiers, &key))
}

/// Base key of every alternative, in written order
///
/// Checks syntax only: modifiers are not validated. Teardown uses this,
/// since only the base key picks the slot a binding lives in.
///
/// # Example
/// ```
/// use view_keys::core::parser::parse_base_keys;
///
/// assert_eq!(parse_base_keys("hyper+S esc").unwrap(), vec!["s", "esc"]);
/// assert!(parse_base_keys("ctrl+").is_err());
/// ```
pub fn parse_base_keys(input: &str) -> Result<Vec<String>, ParseError> {
    let alternatives = split_alternatives(input);
    if alternatives.is_empty() {
        return Err(ParseError::InvalidSyntax {
            combo: input.to_string(),
            message: "empty combo".to_string(),
        });
    }

    alternatives
        .into_iter()
        .map(|token| {
            let (token, mut segments) = combo_segments(token)?;
            segments.pop().ok_or_else(|| ParseError::InvalidSyntax {
                combo: token,
                message: "missing key".to_string(),
            })
        })
        .collect()
}

/// Lowercased token and its `+` segments
fn combo_segments(token: &str) -> Result<(String, Vec<String>), ParseError> {
    let token = token.trim().to_lowercase();

    if token.is_empty() {
        return Err(ParseError::InvalidSyntax {
            combo: token,
            message: "empty combo".to_string(),
        });
    }

    let segments = match parse_segments(&token) {
        Ok((_, segments)) => segments.into_iter().map(str::to_string).collect(),
        Err(_) => {
            return Err(ParseError::InvalidSyntax {
                combo: token.clone(),
                message: "empty segment around '+'".to_string(),
            });
        }
    };

    Ok((token, segments))
}

/// Parse every alternative of a combo string, in written order
///
/// Fails on the first invalid alternative. A blank string is an error
/// rather than an empty list, since it can never bind anything.
pub fn parse_combos(input: &str) -> Result<Vec<KeyCombo>, ParseError> {
    let alternatives = split_alternatives(input);

    if alternatives.is_empty() {
        return Err(ParseError::InvalidSyntax {
            combo: input.to_string(),
            message: "empty combo".to_string(),
        });
    }

    alternatives.into_iter().map(parse_combo).collect()
}
