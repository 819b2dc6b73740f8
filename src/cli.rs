use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::{
    buried_loader_with_config,
    error::{LoaderError, Result},
    locate::{list_elements, SourcePosition},
    source::parse_module,
    LoaderOutput, ReportConfig, ReportInputs, ReportValue,
};

#[derive(Debug, Parser)]
#[command(
    name = "buried-report",
    about = "Wrap the JSX element at a source position in a report component",
    version
)]
pub struct Cli {
    /// Source file to transform.
    pub file: PathBuf,

    /// 1-based line of the element's opening tag.
    #[arg(long, requires = "column")]
    pub line: Option<usize>,

    /// 0-based column of the element's opening tag.
    #[arg(long, requires = "line")]
    pub column: Option<usize>,

    /// Position as JSON, e.g. '{"lineNumer": 12, "columnNumber": 4}'.
    #[arg(long, value_name = "JSON", conflicts_with_all = ["line", "column"])]
    pub source: Option<String>,

    /// Attribute for the wrapper; numeric values become numbers.
    #[arg(long = "input", value_name = "KEY=VALUE")]
    pub inputs: Vec<String>,

    /// Attributes as a JSON object. Applied before --input.
    #[arg(long, value_name = "JSON")]
    pub inputs_json: Option<String>,

    #[arg(long)]
    pub tag_name: Option<String>,

    #[arg(long)]
    pub source_name: Option<String>,

    /// Write the result back to FILE instead of stdout.
    #[arg(long)]
    pub write: bool,

    /// List element positions instead of transforming.
    #[arg(long, conflicts_with = "write")]
    pub list: bool,
}

impl Cli {
    pub fn config(&self) -> ReportConfig {
        let mut map = HashMap::new();
        if let Some(tag) = &self.tag_name {
            map.insert("tag_name".to_string(), serde_json::Value::from(tag.as_str()));
        }
        if let Some(source) = &self.source_name {
            map.insert("source_name".to_string(), serde_json::Value::from(source.as_str()));
        }
        ReportConfig::new(map)
    }

    pub fn position(&self) -> Result<Option<SourcePosition>> {
        if let Some(raw) = &self.source {
            return Ok(Some(serde_json::from_str(raw)?));
        }
        Ok(match (self.line, self.column) {
            (Some(line), Some(column)) => Some(SourcePosition::new(line, column)),
            _ => None,
        })
    }

    pub fn report_inputs(&self) -> Result<ReportInputs> {
        let mut inputs = match &self.inputs_json {
            Some(raw) => ReportInputs::from_json(raw)?,
            None => ReportInputs::new(),
        };
        for pair in &self.inputs {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| LoaderError::invalid(format!("expected KEY=VALUE, got `{pair}`")))?;
            if key.is_empty() {
                return Err(LoaderError::invalid(format!("empty key in `{pair}`")));
            }
            inputs.insert(key, ReportValue::parse_loose(value));
        }
        Ok(inputs)
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Text the command would print.
pub fn render(cli: &Cli) -> Result<String> {
    if cli.list {
        let code = read_file(&cli.file)?;
        let parsed = parse_module(&cli.file.to_string_lossy(), &code)?;
        let mut out = String::new();
        for site in list_elements(&parsed) {
            out.push_str(&format!("{}\t{}\n", site.position, site.name));
        }
        return Ok(out);
    }

    let config = cli.config();
    let inputs = cli.report_inputs()?;
    match buried_loader_with_config(&cli.file, cli.position()?, &inputs, &config)? {
        LoaderOutput::Code(code) => Ok(code),
        LoaderOutput::ReadFailed(source) => Err(LoaderError::Io {
            path: cli.file.clone(),
            source,
        }),
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let out = render(&cli)?;
    if cli.write {
        std::fs::write(&cli.file, &out).map_err(|source| LoaderError::Io {
            path: cli.file.clone(),
            source,
        })?;
        tracing::info!(path = %cli.file.display(), "rewrote file");
    } else {
        print!("{out}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("buried-report").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn line_requires_column() {
        assert!(Cli::try_parse_from(["buried-report", "a.tsx", "--line", "3"]).is_err());
        assert!(Cli::try_parse_from(["buried-report", "a.tsx", "--source", "{}", "--line", "3", "--column", "1"]).is_err());
    }

    #[test]
    fn position_from_flags_or_json() {
        let cli = parse(&["a.tsx", "--line", "3", "--column", "6"]);
        assert_eq!(cli.position().unwrap(), Some(SourcePosition::new(3, 6)));
        let cli = parse(&["a.tsx", "--source", r#"{"lineNumer": 9, "columnNumber": 2}"#]);
        assert_eq!(cli.position().unwrap(), Some(SourcePosition::new(9, 2)));
        assert_eq!(parse(&["a.tsx"]).position().unwrap(), None);
    }

    #[test]
    fn inputs_merge_json_then_pairs() {
        let cli = parse(&[
            "a.tsx",
            "--inputs-json",
            r#"{"type": "area", "ext": {"name": "x"}}"#,
            "--input",
            "count=0",
            "--input",
            "type=page",
        ]);
        let inputs = cli.report_inputs().unwrap();
        let pairs: Vec<(&str, &ReportValue)> = inputs.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("type", &ReportValue::Str("page".into())),
                ("count", &ReportValue::Num(0.0)),
            ]
        );
    }

    #[test]
    fn malformed_pair_is_rejected() {
        let cli = parse(&["a.tsx", "--input", "novalue"]);
        assert!(matches!(cli.report_inputs(), Err(LoaderError::InvalidArgument { .. })));
    }

    #[test]
    fn names_come_from_flags() {
        let cli = parse(&["a.tsx", "--tag-name", "Tracker", "--source-name", "@acme/tracker"]);
        let config = cli.config();
        assert_eq!(config.tag_name, "Tracker");
        assert_eq!(config.source_name, "@acme/tracker");
    }

    #[test]
    fn write_rewrites_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("View.tsx");
        std::fs::write(&path, "const v = <div><A /></div>;\n").unwrap();
        let cli = parse(&[
            path.to_str().unwrap(),
            "--line",
            "1",
            "--column",
            "15",
            "--input",
            "id=7",
            "--write",
        ]);
        run(cli).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<BuriedReport id={7}><A/></BuriedReport>"), "{written}");
        assert!(written.starts_with("import BuriedReport"));
    }

    #[test]
    fn list_prints_positions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("View.tsx");
        std::fs::write(&path, "const v = (\n  <div>\n    <A />\n  </div>\n);\n").unwrap();
        let out = render(&parse(&[path.to_str().unwrap(), "--list"])).unwrap();
        assert_eq!(out, "2:2\tdiv\n3:4\tA\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let cli = parse(&[dir.path().join("nope.tsx").to_str().unwrap()]);
        assert!(matches!(render(&cli), Err(LoaderError::Io { .. })));
    }
}
