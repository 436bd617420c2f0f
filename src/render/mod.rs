//! Generated-file assembly
//!
//! Renders the loader module from a [`GeneratedFile`] descriptor:
//!
//! ```text
//! pub mod <package> {
//!     use <import>;                       // one per strategy import
//!
//!     pub fn <function>() -> Result<HashMap<&'static str, Vec<u8>>, Box<dyn Error + Send + Sync>> {
//!         fn decode(s: &[u8]) -> ... { ... }  // strategy decode source
//!
//!         let mut assets = HashMap::new();
//!         assets.insert("/key", decode(b"...")?);
//!         Ok(assets)
//!     }
//! }
//! ```
//!
//! Assets are emitted in the order given; callers are responsible for
//! handing over an ordered sequence.

mod counting_writer;

use std::io::Write;

use handlebars::Handlebars;
use once_cell::sync::OnceCell;
use serde::Serialize;

pub use counting_writer::CountingWriter;

use crate::error::EmbedError;
use crate::literal;
use crate::strategy::Strategy;

const LOADER: &str = "loader";
const LOADER_TEMPLATE: &str = include_str!("../../templates/loader.rs.hbs");

static REGISTRY: OnceCell<Handlebars<'static>> = OnceCell::new();

fn registry() -> Result<&'static Handlebars<'static>, EmbedError> {
    REGISTRY.get_or_try_init(|| {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // Output is Rust source, not HTML
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string(LOADER, LOADER_TEMPLATE)?;
        Ok(registry)
    })
}

/// One insert statement in the loader
#[derive(Debug, Serialize)]
pub struct RenderedAsset {
    /// Key as a Rust string literal
    pub key: String,
    /// Delimiter-enclosed encoded payload
    pub literal: String,
}

/// Everything needed to render one generated file
#[derive(Debug, Serialize)]
pub struct GeneratedFile<'a> {
    pub package_name: &'a str,
    pub function_name: &'a str,
    pub imports: &'a [&'static str],
    pub decode_source: &'a str,
    pub assets: Vec<RenderedAsset>,
}

impl<'a> GeneratedFile<'a> {
    /// Build a descriptor from `(key, literal)` pairs, already in output order.
    pub fn new(
        package_name: &'a str,
        function_name: &'a str,
        strategy: &'a dyn Strategy,
        assets: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            package_name,
            function_name,
            imports: strategy.imports(),
            decode_source: strategy.decode_source(),
            assets: assets
                .into_iter()
                .map(|(key, literal)| RenderedAsset {
                    key: literal::string_literal(&key),
                    literal,
                })
                .collect(),
        }
    }
}

/// Render `file` into `dst`, returning the number of bytes written.
///
/// The file is rendered in memory first, so a template failure leaves `dst`
/// untouched. A sink that fails midway may still hold a prefix.
pub fn render<W: Write>(dst: W, file: &GeneratedFile<'_>) -> Result<usize, EmbedError> {
    let mut rendered = Vec::new();
    registry()?.render_to_write(LOADER, file, &mut rendered)?;

    let mut writer = CountingWriter::new(dst);
    writer.write_all(&rendered).map_err(EmbedError::Write)?;
    writer.flush().map_err(EmbedError::Write)?;
    Ok(writer.bytes_written())
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Check that `name` can be used as a module or function name in the
/// generated file.
pub fn validate_identifier(role: &'static str, name: &str) -> Result<(), EmbedError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic());
    let valid = valid_start
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && name != "_"
        && !KEYWORDS.contains(&name);

    if valid {
        Ok(())
    } else {
        Err(EmbedError::InvalidIdentifier {
            role,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Encoding;

    fn render_to_string(file: &GeneratedFile<'_>) -> (String, usize) {
        let mut out = Vec::new();
        let n = render(&mut out, file).unwrap();
        (String::from_utf8(out).unwrap(), n)
    }

    fn trimmed_lines(text: &str) -> Vec<&str> {
        text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
    }

    #[test]
    fn test_render_hex_scenario() {
        let strategy = Encoding::Hex.strategy();
        let file = GeneratedFile::new(
            "testing",
            "loadAssets",
            strategy,
            vec![
                ("/a.txt".to_string(), strategy.encode_bytes(b"hi").unwrap()),
                ("/b/c.bin".to_string(), strategy.encode_bytes(&[0x00, 0xff]).unwrap()),
            ],
        );
        let (text, n) = render_to_string(&file);
        let lines = trimmed_lines(&text);

        assert_eq!(n, text.len());
        assert!(lines.contains(&"pub mod testing {"));
        assert!(lines.contains(&"use hex::FromHex;"));
        assert!(text.contains("pub fn loadAssets() -> Result<"));
        assert!(text.contains(strategy.decode_source()));

        let inserts: Vec<_> = lines
            .iter()
            .filter(|l| l.starts_with("assets.insert("))
            .collect();
        assert_eq!(
            inserts,
            [
                &r#"assets.insert("/a.txt", decode(br"6869")?);"#,
                &r#"assets.insert("/b/c.bin", decode(br"00ff")?);"#,
            ]
        );
    }

    #[test]
    fn test_render_omits_empty_import_block() {
        let file = GeneratedFile::new("assets", "load_assets", Encoding::Quote.strategy(), vec![]);
        let (text, _) = render_to_string(&file);

        assert!(!text.contains("use "));
        assert!(!text.contains("assets.insert("));
        assert!(text.contains("Ok(assets)"));
    }

    #[test]
    fn test_render_does_not_html_escape() {
        let strategy = Encoding::Quote.strategy();
        let file = GeneratedFile::new(
            "assets",
            "load_assets",
            strategy,
            vec![("/q\"<&>.html".to_string(), strategy.encode_bytes(b"<a href=\"x\">&</a>").unwrap())],
        );
        let (text, _) = render_to_string(&file);

        assert!(text.contains(r#"assets.insert("/q\"<&>.html", decode(b"<a href=\"x\">&</a>")?);"#));
        assert!(!text.contains("&quot;"));
        assert!(!text.contains("&lt;"));
    }

    #[test]
    fn test_render_imports_in_order() {
        let strategy = Encoding::Zbase64.strategy();
        let file = GeneratedFile::new("assets", "load_assets", strategy, vec![]);
        let (text, _) = render_to_string(&file);

        let uses: Vec<_> = trimmed_lines(&text)
            .into_iter()
            .filter(|l| l.starts_with("use "))
            .collect();
        assert_eq!(
            uses,
            [
                "use base64::Engine;",
                "use base64::engine::general_purpose::STANDARD;",
                "use flate2::read::ZlibDecoder;",
                "use std::io::Read;",
            ]
        );
    }

    /// Records the size of every write call
    #[derive(Default)]
    struct WriteLog(Vec<usize>);

    impl Write for WriteLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.push(buf.len());
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_render_reaches_sink_in_one_write() {
        let strategy = Encoding::Base64.strategy();
        let assets = (0..20).map(|i| {
            let literal = strategy.encode_bytes(format!("asset {i}").as_bytes()).unwrap();
            (format!("/file{i}.txt"), literal)
        });
        let file = GeneratedFile::new("assets", "load_assets", strategy, assets);

        let mut log = WriteLog::default();
        let n = render(&mut log, &file).unwrap();

        assert_eq!(log.0, vec![n]);
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_render_reports_sink_failure() {
        let file = GeneratedFile::new("assets", "load_assets", Encoding::Hex.strategy(), vec![]);
        assert!(matches!(render(BrokenSink, &file), Err(EmbedError::Write(_))));
    }

    #[test]
    fn test_validate_identifier() {
        for ok in ["assets", "load_assets", "loadAssets", "_private", "a1"] {
            assert!(validate_identifier("function", ok).is_ok(), "{ok}");
        }
        for bad in ["", "_", "1abc", "load-assets", "fn", "mod", "a b", "ünï"] {
            assert!(validate_identifier("function", bad).is_err(), "{bad}");
        }
    }
}
