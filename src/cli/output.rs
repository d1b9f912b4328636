//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the deep-research CLI.
//! Logs go to stderr through tracing; everything here is user-facing.

use owo_colors::OwoColorize;
use std::path::Path;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the run banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n  {} {}\n",
                "Deep Research".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("\n  Deep Research v{}\n", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print a failure that ends the run (stderr)
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("{} {}", "Error:".red().bold(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print where the output was written
    pub fn saved(&self, path: &Path) {
        let path = path.display().to_string();
        if self.colored {
            println!(
                "\n  {} {} {}",
                "✓".green().bold(),
                "saved to".dimmed(),
                path.bright_white()
            );
        } else {
            println!("\n  [SAVED] {}", path);
        }
    }

    /// Print a rendered report or answer verbatim
    pub fn document(&self, body: &str) {
        println!("\n{}\n", body);
    }

    /// Configuration failure with remediation steps (stderr)
    pub fn configuration_error(&self, reason: &str) {
        if self.colored {
            eprintln!("\n  {}", "Configuration Error".red().bold().underline());
        } else {
            eprintln!("\n  === Configuration Error ===");
        }
        eprintln!("  {}\n", reason);
        eprintln!("  To fix this, do one of the following:");
        eprintln!("    - export GEMINI_KEY=<key>   (Google Gemini)");
        eprintln!("    - export OPENAI_KEY=<key>   (OpenAI or a compatible endpoint via OPENAI_ENDPOINT)");
        eprintln!("    - add a [provider] section to research.toml (type = \"ollama\" needs no key)");
        eprintln!("    - export FIRECRAWL_KEY=<key> for web search");
        eprintln!("\n  Keys may also be placed in a .env file in the working directory.");
    }
}
