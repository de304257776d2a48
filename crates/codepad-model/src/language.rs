//! Editor languages.
//!
//! The set is closed: every language has exactly one display label and one
//! starter template that is shown until the user saves their own text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A language the editor can hold a document for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Cpp,
    Java,
}

impl Language {
    /// All languages in selector order.
    pub const ALL: [Language; 4] = [Self::JavaScript, Self::Python, Self::Cpp, Self::Java];

    /// Lowercase tag used in storage keys and on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Cpp => "cpp",
            Self::Java => "java",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Cpp => "C++",
            Self::Java => "Java",
        }
    }

    /// Starter text shown when nothing has been saved for this language.
    pub fn template(&self) -> &'static str {
        match self {
            Self::JavaScript => JAVASCRIPT_TEMPLATE,
            Self::Python => PYTHON_TEMPLATE,
            Self::Cpp => CPP_TEMPLATE,
            Self::Java => JAVA_TEMPLATE,
        }
    }
}

/// Template lookup by raw tag. Unrecognized tags get an empty buffer.
pub fn template_for_tag(tag: &str) -> &'static str {
    tag.parse::<Language>().map_or("", |language| language.template())
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = ModelError;

    /// Parse a tag (case-insensitive). `js` and `c++` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "javascript" | "js" => Ok(Self::JavaScript),
            "python" | "py" => Ok(Self::Python),
            "cpp" | "c++" => Ok(Self::Cpp),
            "java" => Ok(Self::Java),
            _ => Err(ModelError::UnknownLanguage(s.trim().to_string())),
        }
    }
}

const JAVASCRIPT_TEMPLATE: &str = r#"// Welcome to JavaScript!
console.log("Hello, World!");

function fibonacci(n) {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

console.log("Fibonacci(10):", fibonacci(10));"#;

const PYTHON_TEMPLATE: &str = r#"# Welcome to Python!
print("Hello, World!")

def fibonacci(n):
    if n <= 1:
        return n
    return fibonacci(n - 1) + fibonacci(n - 2)

print(f"Fibonacci(10): {fibonacci(10)}")"#;

const CPP_TEMPLATE: &str = r#"// Welcome to C++!
#include <iostream>
using namespace std;

int fibonacci(int n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

int main() {
    cout << "Hello, World!" << endl;
    cout << "Fibonacci(10): " << fibonacci(10) << endl;
    return 0;
}"#;

const JAVA_TEMPLATE: &str = r#"// Welcome to Java!
public class Main {
    public static int fibonacci(int n) {
        if (n <= 1) return n;
        return fibonacci(n - 1) + fibonacci(n - 2);
    }

    public static void main(String[] args) {
        System.out.println("Hello, World!");
        System.out.println("Fibonacci(10): " + fibonacci(10));
    }
}"#;
