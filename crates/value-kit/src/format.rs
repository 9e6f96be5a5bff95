use std::sync::LazyLock;

use anyhow::{bail, Result};
use indexmap::IndexMap;
use regex::{Captures, Regex};

use crate::node::Node;

/// `{}` or `{name}` where a name starts with a letter, `_` or `$`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[a-zA-Z_$]?[0-9a-zA-Z_$]*\}").expect("placeholder pattern is valid")
});

/// Substitution values for [`format`]
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArgs {
    /// Consumed in order, one per placeholder, whatever its name
    Positional(Vec<Node>),

    /// Looked up by placeholder name
    Named(IndexMap<String, Node>),
}

impl FormatArgs {
    /// Positional values
    pub fn positional<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        FormatArgs::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Named values
    pub fn named<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Node>,
    {
        FormatArgs::Named(
            params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&Node> for FormatArgs {
    /// Containers become named parameters (array elements are named by
    /// their index, so `{1}` picks the second one). Any other value is a
    /// single positional value.
    fn from(node: &Node) -> Self {
        match node {
            Node::Object(map) => FormatArgs::Named(map.borrow().clone()),
            Node::Array(items) => FormatArgs::Named(
                items
                    .borrow()
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item.clone()))
                    .collect(),
            ),
            leaf => FormatArgs::Positional(vec![leaf.clone()]),
        }
    }
}

/// Fill the placeholders of a template
///
/// Placeholders without a value are replaced by the empty string.
///
/// ```
/// use value_kit::{format, FormatArgs};
///
/// let args = FormatArgs::named([("categ", "books"), ("isbn", "034038204X")]);
/// assert_eq!(format("/{categ}/{isbn}", &args), "/books/034038204X");
///
/// let args = FormatArgs::positional(["people", "good plumbers"]);
/// assert_eq!(format("Other {} are {}", &args), "Other people are good plumbers");
/// ```
pub fn format(template: &str, args: &FormatArgs) -> String {
    substitute(template, args).0
}

/// [`format`] that fails on the first placeholder without a value
pub fn format_strict(template: &str, args: &FormatArgs) -> Result<String> {
    let (rendered, missing) = substitute(template, args);
    if let Some(placeholder) = missing.first() {
        bail!(
            "No value for placeholder {} in template {:?}",
            placeholder,
            template
        );
    }
    Ok(rendered)
}

/// Render the template, returning the placeholders that had no value
fn substitute(template: &str, args: &FormatArgs) -> (String, Vec<String>) {
    let mut next = 0;
    let mut missing = Vec::new();
    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let placeholder = &caps[0];
        let value = match args {
            FormatArgs::Positional(values) => {
                let value = values.get(next);
                if value.is_some() {
                    next += 1;
                }
                value
            }
            FormatArgs::Named(params) => params.get(&placeholder[1..placeholder.len() - 1]),
        };
        match value {
            Some(value) => value.to_string(),
            None => {
                missing.push(placeholder.to_string());
                String::new()
            }
        }
    });
    (rendered.into_owned(), missing)
}
