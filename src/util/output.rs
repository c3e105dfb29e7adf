use std::io::{self, Write};

use console::style;

pub fn success(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).green());
}

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}

pub fn heading(message: &str) -> String {
    style(message).bold().to_string()
}
