use std::process::ExitCode;

fn main() -> ExitCode {
    match proposal_search::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
