use std::ffi::OsString;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use argh::FromArgs;

use fhicl::debug::{self, DebugLevel};
use fhicl::error::{FhiclError, FhiclResult};
use fhicl::preprocess::FsLoader;
use fhicl::value::{Table, Value};

#[derive(FromArgs)]
/// Parse a FHiCL document and print its resolved mapping
#[argh(subcommand, name = "parse")]
pub struct Parse {
    /// input document (reads stdin if omitted)
    #[argh(option, short = 'i')]
    input: Option<OsString>,

    /// pipeline tracing verbosity: off, basic, detailed, trace
    #[argh(option, default = "String::from(\"off\")")]
    debug_level: String,
}

impl Parse {
    pub fn run(self) -> i32 {
        match DebugLevel::from_str(&self.debug_level) {
            Ok(level) => debug::set_debug_level(level),
            Err(e) => {
                eprintln!("{e}");
                return 1;
            }
        }

        let text = match self.read_input() {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{e}");
                return 1;
            }
        };

        let loader = match self.base_dir() {
            Some(dir) => FsLoader::new(dir),
            None => FsLoader::cwd(),
        };

        match fhicl::parse(&text, &loader) {
            Ok(table) => {
                print_table(&table, "");
                0
            }
            Err(e) => {
                eprintln!("{e}");
                1
            }
        }
    }

    /// `#include` paths resolve relative to the directory containing the
    /// input file; for stdin (or `-i -`) they resolve relative to cwd.
    fn base_dir(&self) -> Option<PathBuf> {
        match &self.input {
            Some(path) if path != "-" => {
                PathBuf::from(path).parent().map(|p| p.to_path_buf()).filter(|p| !p.as_os_str().is_empty())
            }
            _ => None,
        }
    }

    fn read_input(&self) -> FhiclResult<String> {
        match &self.input {
            Some(path) if path != "-" => fs::read_to_string(path)
                .map_err(|e| FhiclError::io_error(format!("cannot read '{}': {e}", path.to_string_lossy()))),
            _ => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| FhiclError::io_error(format!("cannot read stdin: {e}")))?;
                Ok(buf)
            }
        }
    }
}

/// Renders one line per leaf value, in hname path notation, in insertion
/// order.
fn print_table(table: &Table, prefix: &str) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };
        print_value(&path, value);
    }
}

fn print_value(path: &str, value: &Value) {
    match value {
        Value::Table(inner) => print_table(inner, path),
        Value::Seq(items) => {
            for (i, item) in items.iter().enumerate() {
                print_value(&format!("{path}[{i}]"), item);
            }
        }
        leaf => println!("{path}: {leaf}"),
    }
}
