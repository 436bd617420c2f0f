//! Check a generated file against the directory it was generated from
//!
//! The generated loader is never compiled here. Instead, the file is parsed
//! with `syn`: the encoding is recognised from the structure of its `decode`
//! function, every `assets.insert(<key>, decode(<literal>)?)` call is
//! collected in order, and each literal is decoded with the strategy's
//! host-side decoder. Formatting is irrelevant, so files that went through
//! `rustfmt` verify the same as freshly generated ones.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;

use syn::visit::{self, Visit};
use syn::{Expr, ExprCall, ExprLit, ExprMethodCall, ExprTry, ItemFn, Lit};
use thiserror::Error;

use crate::asset::Asset;
use crate::error::DecodeError;
use crate::strategy::Encoding;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("not valid Rust source: {0}")]
    Syntax(#[from] syn::Error),

    #[error("no known decode function found; not an assetembed file?")]
    UnknownEncoding,

    #[error("insert statement {index} is not `assets.insert(<key>, decode(<literal>)?)`")]
    Malformed { index: usize },

    #[error("failed to decode asset {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: DecodeError,
    },

    #[error("failed to read asset {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Entries recovered from a generated file, in emission order
#[derive(Debug)]
pub struct ParsedFile {
    pub encoding: Encoding,
    pub entries: Vec<(String, Vec<u8>)>,
}

/// Collects decode functions and `assets.insert` calls, in source order.
#[derive(Default)]
struct LoaderVisitor<'ast> {
    decoders: Vec<&'ast ItemFn>,
    inserts: Vec<&'ast ExprMethodCall>,
}

impl<'ast> Visit<'ast> for LoaderVisitor<'ast> {
    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        if node.sig.ident == "decode" {
            self.decoders.push(node);
        }
        visit::visit_item_fn(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        if node.method == "insert" && is_path(&node.receiver, "assets") {
            self.inserts.push(node);
        }
        visit::visit_expr_method_call(self, node);
    }
}

fn is_path(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::Path(path) if path.path.is_ident(name))
}

/// Match `decoder` structurally against every strategy's decode source.
fn detect_encoding(decoder: &ItemFn) -> Option<Encoding> {
    Encoding::ALL.into_iter().find(|encoding| {
        syn::parse_str::<ItemFn>(encoding.strategy().decode_source())
            .is_ok_and(|expected| expected.sig == decoder.sig && expected.block == decoder.block)
    })
}

/// Key and payload of `assets.insert("<key>", decode(<byte string>)?)`
fn insert_arguments(call: &ExprMethodCall) -> Option<(String, Vec<u8>)> {
    let mut args = call.args.iter();
    let (Some(key), Some(value), None) = (args.next(), args.next(), args.next()) else {
        return None;
    };
    let Expr::Lit(ExprLit {
        lit: Lit::Str(key), ..
    }) = key
    else {
        return None;
    };
    let Expr::Try(ExprTry { expr, .. }) = value else {
        return None;
    };
    let Expr::Call(ExprCall { func, args, .. }) = expr.as_ref() else {
        return None;
    };
    if !is_path(func, "decode") || args.len() != 1 {
        return None;
    }
    let Some(Expr::Lit(ExprLit {
        lit: Lit::ByteStr(payload),
        ..
    })) = args.first()
    else {
        return None;
    };
    Some((key.value(), payload.value()))
}

/// Parse generated source back into decoded entries.
pub fn parse_generated(text: &str) -> Result<ParsedFile, VerifyError> {
    let file = syn::parse_file(text)?;
    let mut visitor = LoaderVisitor::default();
    visitor.visit_file(&file);

    let encoding = visitor
        .decoders
        .iter()
        .find_map(|decoder| detect_encoding(decoder))
        .ok_or(VerifyError::UnknownEncoding)?;
    let strategy = encoding.strategy();

    let mut entries = Vec::with_capacity(visitor.inserts.len());
    for (index, call) in visitor.inserts.into_iter().enumerate() {
        let (key, payload) =
            insert_arguments(call).ok_or(VerifyError::Malformed { index: index + 1 })?;
        let bytes = strategy
            .decode_payload(&payload)
            .map_err(|source| VerifyError::Decode {
                key: key.clone(),
                source,
            })?;
        entries.push((key, bytes));
    }

    log::debug!("parsed {} entries ({encoding})", entries.len());
    Ok(ParsedFile { encoding, entries })
}

/// Outcome of comparing one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match { key: String, len: usize },
    Differs { key: String, expected: usize, actual: usize },
    /// On disk but not embedded
    Missing { key: String },
    /// Embedded but not on disk
    Extra { key: String },
}

impl Comparison {
    pub fn is_ok(&self) -> bool {
        matches!(self, Comparison::Match { .. })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Match { key, len } => write!(f, "ok\t{key:?} ({len} bytes)"),
            Comparison::Differs {
                key,
                expected,
                actual,
            } => write!(
                f,
                "fail\t{key:?}: file has {expected} bytes, embedded asset has {actual} bytes"
            ),
            Comparison::Missing { key } => write!(f, "fail\t{key:?}: not embedded"),
            Comparison::Extra { key } => write!(f, "fail\t{key:?}: embedded but not on disk"),
        }
    }
}

/// Per-key results of a verification run
#[derive(Debug, Default)]
pub struct Report {
    pub comparisons: Vec<Comparison>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.comparisons.iter().all(Comparison::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Comparison> {
        self.comparisons.iter().filter(|c| !c.is_ok())
    }
}

/// Compare parsed entries with the original assets.
pub fn compare(parsed: ParsedFile, assets: Vec<Asset>) -> Result<Report, VerifyError> {
    let mut embedded: HashMap<String, Vec<u8>> = parsed.entries.into_iter().collect();
    let mut report = Report::default();

    for mut asset in assets {
        let mut expected = Vec::new();
        asset
            .content
            .read_to_end(&mut expected)
            .map_err(|source| VerifyError::Read {
                key: asset.key.clone(),
                source,
            })?;

        let comparison = match embedded.remove(&asset.key) {
            None => Comparison::Missing { key: asset.key },
            Some(actual) if actual == expected => Comparison::Match {
                key: asset.key,
                len: actual.len(),
            },
            Some(actual) => Comparison::Differs {
                key: asset.key,
                expected: expected.len(),
                actual: actual.len(),
            },
        };
        report.comparisons.push(comparison);
    }

    let mut extra: Vec<String> = embedded.into_keys().collect();
    extra.sort();
    report
        .comparisons
        .extend(extra.into_iter().map(|key| Comparison::Extra { key }));

    Ok(report)
}
