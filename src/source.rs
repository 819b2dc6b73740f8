use swc_core::{
    common::{comments::SingleThreadedComments, sync::Lrc, BytePos, FileName, SourceMap, Spanned},
    ecma::{
        ast::{EsVersion, Module},
        codegen::{text_writer::JsWriter, Config, Emitter, Node},
        parser::{error::Error as SyntaxFailure, parse_file_as_module, Syntax, TsSyntax},
    },
};

use crate::error::{LoaderError, Result};

/// A parsed module together with the source map and comments it was read
/// with. Positions in `module` resolve against `cm`.
pub struct ParsedSource {
    pub file_name: String,
    pub cm: Lrc<SourceMap>,
    pub comments: SingleThreadedComments,
    pub module: Module,
    /// The text started with a byte order mark, which the source map drops.
    pub bom: bool,
}

impl ParsedSource {
    /// 1-based line and 0-based column of `pos` in the text as given.
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        line_col(&self.cm, self.bom, pos)
    }
}

// Columns on the first line count the BOM like any other leading character.
fn line_col(cm: &SourceMap, bom: bool, pos: BytePos) -> (usize, usize) {
    let loc = cm.lookup_char_pos(pos);
    let column = if bom && loc.line == 1 { loc.col.0 + 1 } else { loc.col.0 };
    (loc.line, column)
}

fn tsx_syntax() -> Syntax {
    Syntax::Typescript(TsSyntax {
        tsx: true,
        ..Default::default()
    })
}

fn to_parse_error(cm: &SourceMap, bom: bool, file_name: &str, err: SyntaxFailure) -> LoaderError {
    let (line, column) = line_col(cm, bom, err.span().lo());
    LoaderError::Parse {
        file: file_name.to_string(),
        line,
        column,
        message: err.kind().msg().into_owned(),
    }
}

/// Parse `code` as an ES module with JSX and TypeScript syntax. Errors the
/// parser recovered from still fail the parse.
pub fn parse_module(file_name: &str, code: &str) -> Result<ParsedSource> {
    let bom = code.starts_with('\u{FEFF}');
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Custom(file_name.to_string())),
        code.to_string(),
    );
    let comments = SingleThreadedComments::default();
    let mut recovered = vec![];

    let module = parse_file_as_module(
        &fm,
        tsx_syntax(),
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    )
    .map_err(|e| to_parse_error(&cm, bom, file_name, e))?;

    if let Some(err) = recovered.into_iter().next() {
        return Err(to_parse_error(&cm, bom, file_name, err));
    }

    tracing::trace!(file = file_name, items = module.body.len(), "parsed module");
    Ok(ParsedSource {
        file_name: file_name.to_string(),
        cm,
        comments,
        module,
        bom,
    })
}

/// Print the (possibly rewritten) module back to source text.
pub fn print_module(parsed: &ParsedSource) -> Result<String> {
    let mut buf = vec![];
    {
        let mut emitter = Emitter {
            cfg: Config::default().with_target(EsVersion::latest()),
            cm: parsed.cm.clone(),
            comments: Some(&parsed.comments),
            wr: JsWriter::new(parsed.cm.clone(), "\n", &mut buf, None),
        };
        parsed.module.emit_with(&mut emitter).map_err(LoaderError::Emit)?;
    }
    let code = String::from_utf8(buf)?;
    tracing::trace!(file = %parsed.file_name, bytes = code.len(), "printed module");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tsx_with_type_annotations() {
        let parsed = parse_module(
            "Card.tsx",
            "import React from 'react';\nconst Card = (props: { title: string }) => <div>{props.title}</div>;\nexport default Card;\n",
        )
        .unwrap();
        assert_eq!(parsed.module.body.len(), 3);
    }

    #[test]
    fn malformed_source_reports_position() {
        match parse_module("Broken.tsx", "const = 5;\nexport {};\n") {
            Err(LoaderError::Parse { file, line, .. }) => {
                assert_eq!(file, "Broken.tsx");
                assert_eq!(line, 1);
            }
            Err(other) => panic!("expected parse error, got {other:?}"),
            Ok(_) => panic!("malformed source parsed"),
        }
    }

    #[test]
    fn bom_shifts_first_line_columns_only() {
        let parsed = parse_module("Bom.tsx", "\u{FEFF}const a = 1;\nconst b = 2;\n").unwrap();
        assert!(parsed.bom);
        let first = parsed.module.body[0].span().lo();
        let second = parsed.module.body[1].span().lo();
        assert_eq!(parsed.line_col(first), (1, 1));
        assert_eq!(parsed.line_col(second), (2, 0));
    }

    #[test]
    fn print_keeps_comments_and_markup() {
        let parsed = parse_module(
            "List.tsx",
            "// list view\nexport const List = () => <ul><li>one</li></ul>;\n",
        )
        .unwrap();
        let code = print_module(&parsed).unwrap();
        assert!(code.contains("// list view"));
        assert!(code.contains("<ul><li>one</li></ul>"));
    }
}
