//! Print the OpenAPI document as JSON.
//!
//! With no argument the document goes to stdout; a single path argument
//! writes it to that file instead.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use city_locator::doc::ApiDoc;
use color_eyre::eyre::{Context, Result, eyre};
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    run(env::args_os())
}

fn run(mut args: impl Iterator<Item = OsString>) -> Result<()> {
    let _program = args.next();
    let target = args.next().map(PathBuf::from);
    if let Some(extra) = args.next() {
        return Err(eyre!(
            "unexpected extra argument: {}; expected at most an output path",
            extra.to_string_lossy()
        ));
    }

    let document = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to serialise OpenAPI document")?;
    match target {
        Some(path) => fs::write(&path, document)
            .with_context(|| format!("failed to write OpenAPI document to {path:?}")),
        None => {
            println!("{document}");
            Ok(())
        }
    }
}
