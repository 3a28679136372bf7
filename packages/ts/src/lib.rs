//! TypeScript-compatible syntax host used by the AOT cleanup passes.
//!
//! The crate owns everything a transformer needs from "the compiler": an
//! owned, kinded syntax tree built from the `oxc` AST, per-file symbol tables,
//! a node factory, a printer, a minimal `Program`/`TypeChecker` pair and the
//! transformation context handed to each pass.

use std::fmt;
use std::str::FromStr;

pub mod binder;
pub mod error;
pub mod factory;
pub mod node;
pub mod parser;
pub mod printer;
pub mod program;
pub mod transform;
pub mod type_checker;

pub use binder::*;
pub use error::*;
pub use node::*;
pub use parser::*;
pub use printer::*;
pub use program::*;
pub use transform::*;
pub use type_checker::*;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum ScriptTarget {
    ES3,
    ES5,
    ES2015,
    ES2016,
    ES2017,
    ES2018,
    ES2019,
    ES2020,
    ES2021,
    ES2022,
    ESNext,
    JSON,
    Latest,
}

impl FromStr for ScriptTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let target = match s.to_ascii_lowercase().as_str() {
            "es3" => ScriptTarget::ES3,
            "es5" => ScriptTarget::ES5,
            "es6" | "es2015" => ScriptTarget::ES2015,
            "es2016" => ScriptTarget::ES2016,
            "es2017" => ScriptTarget::ES2017,
            "es2018" => ScriptTarget::ES2018,
            "es2019" => ScriptTarget::ES2019,
            "es2020" => ScriptTarget::ES2020,
            "es2021" => ScriptTarget::ES2021,
            "es2022" => ScriptTarget::ES2022,
            "esnext" => ScriptTarget::ESNext,
            "json" => ScriptTarget::JSON,
            "latest" => ScriptTarget::Latest,
            other => return Err(format!("unknown script target '{}'", other)),
        };
        Ok(target)
    }
}

impl TryFrom<String> for ScriptTarget {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum ModuleKind {
    None,
    CommonJS,
    AMD,
    UMD,
    System,
    ES2015,
    ES2020,
    ES2022,
    ESNext,
    Node16,
    NodeNext,
}

impl FromStr for ModuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "none" => ModuleKind::None,
            "commonjs" => ModuleKind::CommonJS,
            "amd" => ModuleKind::AMD,
            "umd" => ModuleKind::UMD,
            "system" => ModuleKind::System,
            "es6" | "es2015" => ModuleKind::ES2015,
            "es2020" => ModuleKind::ES2020,
            "es2022" => ModuleKind::ES2022,
            "esnext" => ModuleKind::ESNext,
            "node16" => ModuleKind::Node16,
            "nodenext" => ModuleKind::NodeNext,
            other => return Err(format!("unknown module kind '{}'", other)),
        };
        Ok(kind)
    }
}

impl TryFrom<String> for ModuleKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

// --- Diagnostic Structures ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: i32,
    pub file: Option<String>,
    pub start: Option<u32>,
    pub length: Option<u32>,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(file: Option<&str>, message_text: impl Into<String>) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code: 0,
            file: file.map(str::to_string),
            start: None,
            length: None,
            message_text: message_text.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.start) {
            (Some(file), Some(start)) => write!(f, "{}({}): {}", file, start, self.message_text),
            (Some(file), None) => write!(f, "{}: {}", file, self.message_text),
            _ => write!(f, "{}", self.message_text),
        }
    }
}
