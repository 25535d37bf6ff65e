//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use adherence_cli::CliError;

fn main() {
    match adherence_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    }
}

#[expect(clippy::print_stderr, reason = "failures are reported on stderr")]
fn report(err: &CliError) {
    eprintln!("adherence: {err}");
}
