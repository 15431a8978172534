//! Process-entry helpers.
//!
//! Nothing else in the crate reads process state; callers that want the
//! executable's name or argv opt in through these functions.

use std::path::Path;

/// File stem of `argv[0]`, e.g. `MyCommand` for `C:\bin\MyCommand.exe`.
pub fn command_name() -> Option<String> {
    let argv0 = std::env::args_os().next()?;
    command_name_from(argv0)
}

pub fn command_name_from(argv0: impl AsRef<Path>) -> Option<String> {
    let argv0 = argv0.as_ref();
    // `Path` only understands `\` on Windows hosts.
    let last = argv0
        .to_string_lossy()
        .rsplit(['/', '\\'])
        .next()
        .map(str::to_string)?;
    Path::new(&last)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}

/// Process arguments with the program name removed.
pub fn args() -> Vec<String> {
    trim_program_name(
        std::env::args_os()
            .map(|a| a.to_string_lossy().into_owned())
            .collect(),
    )
}

fn trim_program_name(mut args: Vec<String>) -> Vec<String> {
    if !args.is_empty() {
        args.remove(0);
    }
    args
}
