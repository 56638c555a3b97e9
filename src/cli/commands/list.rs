//! List command - catalog of indexed classes and methods.

use super::load_index;
use crate::catalog::catalog;
use crate::config::Settings;
use crate::io::ExitCode;

pub fn run(settings: &Settings) -> ExitCode {
    let index = match load_index(settings) {
        Ok(index) => index,
        Err(code) => return code,
    };

    for entry in catalog(&index) {
        println!("{entry}");
    }
    ExitCode::Success
}
